use crate::error::{Error, Result};
use crate::types::{Encoding, KeyFormat, RequestSpec, MIN_KEY_BITS};
use rcgen::{CertificateParams, Ia5String, KeyPair, RemoteKeyPair, SanType, SignatureAlgorithm};
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sha2::Sha256;

/// Builds a signed PKCS#10 request from a [`RequestSpec`].
///
/// A fresh RSA key of `spec.key_bits()` is generated unless one is supplied
/// with [`CsrBuilder::with_key`].
pub struct CsrBuilder {
    spec: RequestSpec,
    key: Option<RsaPrivateKey>,
}

impl CsrBuilder {
    pub fn new(spec: RequestSpec) -> Self {
        Self { spec, key: None }
    }

    pub fn with_key(mut self, key: RsaPrivateKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn build(self) -> Result<GeneratedArtifact> {
        let private_key = match self.key {
            Some(key) => {
                check_key_bits(key_bits(&key))?;
                key
            }
            None => generate_key(self.spec.key_bits())?,
        };
        let key_pair = signing_key_pair(&private_key)?;

        let mut params = CertificateParams::default();
        params.distinguished_name = self.spec.to_rcgen_name()?;
        params.subject_alt_names = dns_san_entries(self.spec.dns_names())?;

        log::debug!(
            "Signing request for {} with subjectAltName {}",
            self.spec.common_name(),
            self.spec.subject_alt_name_value()
        );

        // rcgen wraps the SAN extension in a PKCS#9 extensionRequest attribute
        // and emits a version 0 request signed with sha256WithRSAEncryption.
        let csr = params
            .serialize_request(&key_pair)
            .map_err(|e| Error::Sign(e.to_string()))?;
        let csr_pem = csr.pem().map_err(|e| Error::Pem(e.to_string()))?;
        let csr_der = csr.der().to_vec();

        Ok(GeneratedArtifact {
            private_key,
            csr_der,
            csr_pem,
        })
    }
}

/// Generates an RSA key with a modulus of `bits`.
///
/// Sizes below 1024 bits are refused; anything the `rsa` crate can generate
/// above that is accepted.
pub fn generate_key(bits: u32) -> Result<RsaPrivateKey> {
    check_key_bits(bits)?;
    log::debug!("Generating RSA {} bit key", bits);

    let mut rng = rand::thread_rng();
    RsaPrivateKey::new(&mut rng, bits as usize)
        .map_err(|e| Error::KeyGen(format!("Failed to generate RSA {} bit key: {}", bits, e)))
}

fn check_key_bits(bits: u32) -> Result<()> {
    if bits < MIN_KEY_BITS {
        return Err(Error::KeyGen(format!(
            "Unsupported RSA key size {} (must be at least {} bits)",
            bits, MIN_KEY_BITS
        )));
    }
    Ok(())
}

fn key_bits(key: &RsaPrivateKey) -> u32 {
    (key.size() * 8) as u32
}

/// Signs with the `rsa` crate on rcgen's behalf, so the request can be
/// signed with keys of any size, not just the ones ring accepts.
struct RsaSigner {
    signing_key: SigningKey<Sha256>,
    // PKCS#1 RSAPublicKey, rcgen wraps it into the SubjectPublicKeyInfo
    public_key: Vec<u8>,
}

impl RemoteKeyPair for RsaSigner {
    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn sign(&self, msg: &[u8]) -> std::result::Result<Vec<u8>, rcgen::Error> {
        self.signing_key
            .try_sign(msg)
            .map(|signature| signature.to_vec())
            .map_err(|e| {
                log::debug!("RSA signing failed: {}", e);
                rcgen::Error::RemoteKeyError
            })
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        &rcgen::PKCS_RSA_SHA256
    }
}

fn signing_key_pair(key: &RsaPrivateKey) -> Result<KeyPair> {
    let public_key = key
        .to_public_key()
        .to_pkcs1_der()
        .map_err(|e| Error::Pem(e.to_string()))?
        .as_bytes()
        .to_vec();

    let signer = RsaSigner {
        signing_key: SigningKey::<Sha256>::new(key.clone()),
        public_key,
    };

    KeyPair::from_remote(Box::new(signer))
        .map_err(|e| Error::KeyGen(format!("Signer rejected RSA key: {}", e)))
}

fn dns_san_entries(dns_names: &[String]) -> Result<Vec<SanType>> {
    dns_names
        .iter()
        .map(|name| {
            Ia5String::try_from(name.clone())
                .map(SanType::DnsName)
                .map_err(|e| Error::DnsName(format!("Invalid DNS name '{}': {}", name, e)))
        })
        .collect()
}

/// A generated key together with the request signed by it.
pub struct GeneratedArtifact {
    private_key: RsaPrivateKey,
    csr_der: Vec<u8>,
    csr_pem: String,
}

impl GeneratedArtifact {
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn key_bits(&self) -> u32 {
        key_bits(&self.private_key)
    }

    pub fn csr_der(&self) -> &[u8] {
        &self.csr_der
    }

    pub fn csr_pem(&self) -> &str {
        &self.csr_pem
    }

    pub fn key_bytes(&self, format: KeyFormat, encoding: Encoding) -> Result<Vec<u8>> {
        let bytes = match (format, encoding) {
            (KeyFormat::Pkcs1, Encoding::Pem) => self
                .private_key
                .to_pkcs1_pem(LineEnding::LF)
                .map_err(|e| Error::Pem(e.to_string()))?
                .as_bytes()
                .to_vec(),
            (KeyFormat::Pkcs1, Encoding::Der) => self
                .private_key
                .to_pkcs1_der()
                .map_err(|e| Error::Pem(e.to_string()))?
                .as_bytes()
                .to_vec(),
            (KeyFormat::Pkcs8, Encoding::Pem) => self
                .private_key
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| Error::Pem(e.to_string()))?
                .as_bytes()
                .to_vec(),
            (KeyFormat::Pkcs8, Encoding::Der) => self
                .private_key
                .to_pkcs8_der()
                .map_err(|e| Error::Pem(e.to_string()))?
                .as_bytes()
                .to_vec(),
        };
        Ok(bytes)
    }

    pub fn csr_bytes(&self, encoding: Encoding) -> Vec<u8> {
        match encoding {
            Encoding::Pem => self.csr_pem.as_bytes().to_vec(),
            Encoding::Der => self.csr_der.clone(),
        }
    }
}
