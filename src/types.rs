use crate::error::{Error, Result};
use rcgen::{DnType, DnValue, Ia5String, PrintableString};

pub const DEFAULT_KEY_BITS: u32 = 2048;

/// Smallest RSA modulus accepted for a request key.
pub const MIN_KEY_BITS: u32 = 1024;

const OID_EMAIL_ADDRESS: [u64; 7] = [1, 2, 840, 113549, 1, 9, 1];

/// Attribute types allowed in the request subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCode {
    Country,
    CommonName,
    Organization,
    OrganizationalUnit,
    State,
    Locality,
    EmailAddress,
}

impl AttributeCode {
    pub fn short_name(&self) -> &'static str {
        match self {
            AttributeCode::Country => "C",
            AttributeCode::CommonName => "CN",
            AttributeCode::Organization => "O",
            AttributeCode::OrganizationalUnit => "OU",
            AttributeCode::State => "ST",
            AttributeCode::Locality => "L",
            AttributeCode::EmailAddress => "emailAddress",
        }
    }

    pub fn oid(&self) -> &'static str {
        match self {
            AttributeCode::Country => "2.5.4.6",
            AttributeCode::CommonName => "2.5.4.3",
            AttributeCode::Organization => "2.5.4.10",
            AttributeCode::OrganizationalUnit => "2.5.4.11",
            AttributeCode::State => "2.5.4.8",
            AttributeCode::Locality => "2.5.4.7",
            AttributeCode::EmailAddress => "1.2.840.113549.1.9.1",
        }
    }

    pub fn from_oid(oid: &str) -> Option<Self> {
        ALL_ATTRIBUTE_CODES.iter().copied().find(|code| code.oid() == oid)
    }

    pub fn to_rcgen(&self) -> DnType {
        match self {
            AttributeCode::Country => DnType::CountryName,
            AttributeCode::CommonName => DnType::CommonName,
            AttributeCode::Organization => DnType::OrganizationName,
            AttributeCode::OrganizationalUnit => DnType::OrganizationalUnitName,
            AttributeCode::State => DnType::StateOrProvinceName,
            AttributeCode::Locality => DnType::LocalityName,
            AttributeCode::EmailAddress => DnType::CustomDnType(OID_EMAIL_ADDRESS.to_vec()),
        }
    }

    /// Encodes `value` with the ASN.1 string type OpenSSL uses for this attribute.
    pub fn to_rcgen_value(&self, value: &str) -> Result<DnValue> {
        let encoded = match self {
            AttributeCode::Country => {
                PrintableString::try_from(value.to_string()).map(DnValue::PrintableString)
            }
            AttributeCode::EmailAddress => {
                Ia5String::try_from(value.to_string()).map(DnValue::Ia5String)
            }
            _ => Ok(DnValue::Utf8String(value.to_string())),
        };

        encoded.map_err(|e| {
            Error::InvalidInput(format!(
                "Cannot encode {}='{}': {}",
                self.short_name(),
                value,
                e
            ))
        })
    }
}

const ALL_ATTRIBUTE_CODES: [AttributeCode; 7] = [
    AttributeCode::Country,
    AttributeCode::CommonName,
    AttributeCode::Organization,
    AttributeCode::OrganizationalUnit,
    AttributeCode::State,
    AttributeCode::Locality,
    AttributeCode::EmailAddress,
];

impl std::fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectField {
    pub code: AttributeCode,
    pub value: String,
}

impl SubjectField {
    pub fn new(code: AttributeCode, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }
}

/// Everything needed to build one signing request.
///
/// Produced by [`crate::identity::resolve`]; the first DNS name is always the
/// common name and the name list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    common_name: String,
    dns_names: Vec<String>,
    subject_fields: Vec<SubjectField>,
    key_bits: u32,
    add_www: bool,
}

impl RequestSpec {
    pub(crate) fn new(
        dns_names: Vec<String>,
        subject_fields: Vec<SubjectField>,
        add_www: bool,
    ) -> Result<Self> {
        let common_name = dns_names
            .first()
            .filter(|name| !name.is_empty())
            .cloned()
            .ok_or(crate::error::ConfigError::MissingDnsName)?;

        Ok(Self {
            common_name,
            dns_names,
            subject_fields,
            key_bits: DEFAULT_KEY_BITS,
            add_www,
        })
    }

    pub fn with_key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    pub fn dns_names(&self) -> &[String] {
        &self.dns_names
    }

    pub fn subject_fields(&self) -> &[SubjectField] {
        &self.subject_fields
    }

    pub fn key_bits(&self) -> u32 {
        self.key_bits
    }

    pub fn add_www(&self) -> bool {
        self.add_www
    }

    /// The subjectAltName value in OpenSSL config notation, e.g. `DNS:a.com, DNS:www.a.com`.
    pub fn subject_alt_name_value(&self) -> String {
        subject_alt_name_value(&self.dns_names)
    }

    pub fn to_rcgen_name(&self) -> Result<rcgen::DistinguishedName> {
        let mut dn = rcgen::DistinguishedName::new();
        for field in &self.subject_fields {
            dn.push(field.code.to_rcgen(), field.code.to_rcgen_value(&field.value)?);
        }
        Ok(dn)
    }
}

pub fn subject_alt_name_value<S: AsRef<str>>(dns_names: &[S]) -> String {
    dns_names
        .iter()
        .map(|name| format!("DNS:{}", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    /// `RSA PRIVATE KEY`
    #[default]
    Pkcs1,
    /// `PRIVATE KEY`
    Pkcs8,
}

impl std::str::FromStr for KeyFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pkcs1" | "rsa" => Ok(KeyFormat::Pkcs1),
            "pkcs8" => Ok(KeyFormat::Pkcs8),
            _ => Err(Error::InvalidInput(format!("Unknown key format: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Pem,
    Der,
}

impl std::str::FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pem" => Ok(Encoding::Pem),
            "der" => Ok(Encoding::Der),
            _ => Err(Error::InvalidInput(format!("Unknown encoding: {}", s))),
        }
    }
}
