use crate::error::{Error, Result};
use crate::types::{subject_alt_name_value, AttributeCode, SubjectField};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;

const CSR_PEM_LABEL: &str = "CERTIFICATE REQUEST";
const OID_SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";

/// The parts of a decoded signing request this tool cares about.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub version: u32,
    pub subject: String,
    pub subject_fields: Vec<SubjectField>,
    pub dns_names: Vec<String>,
    pub attribute_oids: Vec<String>,
    pub signature_algorithm: String,
    pub public_key_algorithm: String,
    pub public_key_bits: Option<usize>,
    pub public_key_der: Vec<u8>,
    pub signature_valid: bool,
}

impl ParsedRequest {
    pub fn subject_alt_name_value(&self) -> String {
        subject_alt_name_value(&self.dns_names)
    }
}

pub fn parse_request_pem(pem: &str) -> Result<ParsedRequest> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(pem.as_bytes())
        .map_err(|e| Error::Pem(format!("Failed to parse PEM: {}", e)))?;

    if pem.label != CSR_PEM_LABEL {
        return Err(Error::Pem(format!(
            "Expected '{}' PEM block, found '{}'",
            CSR_PEM_LABEL, pem.label
        )));
    }

    parse_request_der(&pem.contents)
}

pub fn parse_request_der(der: &[u8]) -> Result<ParsedRequest> {
    let (_, csr) = X509CertificationRequest::from_der(der)?;
    let info = &csr.certification_request_info;

    let mut subject_fields = Vec::new();
    for attr in info.subject.iter_attributes() {
        let oid = attr.attr_type().to_id_string();
        match AttributeCode::from_oid(&oid) {
            Some(code) => subject_fields.push(SubjectField::new(code, attr.as_str()?)),
            None => log::debug!("Ignoring subject attribute {}", oid),
        }
    }

    let subject = subject_fields
        .iter()
        .map(|f| format!("{}={}", f.code, f.value))
        .collect::<Vec<_>>()
        .join(", ");

    let mut dns_names = Vec::new();
    if let Some(extensions) = csr.requested_extensions() {
        for ext in extensions {
            if let ParsedExtension::SubjectAlternativeName(san) = ext {
                for name in &san.general_names {
                    if let GeneralName::DNSName(dns) = name {
                        dns_names.push(dns.to_string());
                    }
                }
            }
        }
    }

    let attribute_oids = info
        .attributes()
        .iter()
        .map(|attr| attr.oid.to_id_string())
        .collect();

    let signature_algorithm = match csr.signature_algorithm.algorithm.to_id_string().as_str() {
        OID_SHA256_WITH_RSA => "sha256WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption".to_string(),
        other => other.to_string(),
    };

    let (public_key_algorithm, public_key_bits) = match info.subject_pki.parsed() {
        Ok(PublicKey::RSA(rsa)) => ("RSA".to_string(), Some(rsa.key_size())),
        Ok(PublicKey::EC(_)) => ("ECDSA".to_string(), None),
        _ => ("Unknown".to_string(), None),
    };

    // ring only verifies RSA moduli of 2048 to 8192 bits.
    let signature_valid = csr.verify_signature().is_ok() || verify_rsa_sha256(&csr);

    Ok(ParsedRequest {
        version: info.version.0,
        subject,
        subject_fields,
        dns_names,
        attribute_oids,
        signature_algorithm,
        public_key_algorithm,
        public_key_bits,
        public_key_der: info.subject_pki.raw.to_vec(),
        signature_valid,
    })
}

fn verify_rsa_sha256(csr: &X509CertificationRequest) -> bool {
    if csr.signature_algorithm.algorithm.to_id_string() != OID_SHA256_WITH_RSA {
        return false;
    }

    let info = &csr.certification_request_info;
    let public_key = match RsaPublicKey::from_public_key_der(info.subject_pki.raw) {
        Ok(key) => key,
        Err(e) => {
            log::debug!("Cannot decode RSA public key: {}", e);
            return false;
        }
    };
    let signature = match Signature::try_from(&csr.signature_value.data[..]) {
        Ok(signature) => signature,
        Err(_) => return false,
    };

    VerifyingKey::<Sha256>::new(public_key)
        .verify(info.raw, &signature)
        .is_ok()
}

#[cfg(feature = "cli")]
pub fn display_request(request: &ParsedRequest) -> String {
    use colored::Colorize;

    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Certificate Signing Request".bold().cyan()));
    output.push_str(&format!("{}\n", "=".repeat(80)));
    output.push_str(&format!(
        "  {}: {}\n",
        "Version".bold().yellow(),
        request.version
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Subject".bold().yellow(),
        request.subject
    ));

    let pk_info = match request.public_key_bits {
        Some(bits) => format!("{} ({} bits)", request.public_key_algorithm, bits),
        None => request.public_key_algorithm.clone(),
    };
    output.push_str(&format!(
        "  {}: {}\n",
        "Public Key".bold().yellow(),
        pk_info.dimmed()
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Signature Algorithm".bold().yellow(),
        request.signature_algorithm.dimmed()
    ));

    let status = if request.signature_valid {
        "Valid".green()
    } else {
        "Invalid".red()
    };
    output.push_str(&format!("  {}: {}\n", "Signature".bold().yellow(), status));

    if !request.dns_names.is_empty() {
        output.push_str(&format!(
            "  {}:\n",
            "Subject Alternative Names".bold().yellow()
        ));
        for name in &request.dns_names {
            output.push_str(&format!("    - {}\n", format!("DNS:{}", name).cyan()));
        }
    }

    output.push_str(&format!("{}\n", "=".repeat(80)));
    output
}
