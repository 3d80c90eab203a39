//! Identity configuration file.
//!
//! The file is a YAML mapping holding the organizational subject fields that
//! every generated request shares:
//!
//! ```yaml
//! country: US
//! state: California
//! locality: San Francisco
//! organization: Example Inc.
//! orgunit: Operations
//! email: hostmaster@example.com   # optional
//! ```

use crate::error::{ConfigError, Error, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/gen-csr.conf";

/// The configuration exactly as read from disk; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConfig {
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub orgunit: Option<String>,
    pub email: Option<String>,
}

/// A configuration with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub country: String,
    pub state: String,
    pub locality: String,
    pub organization: String,
    pub orgunit: String,
    pub email: Option<String>,
}

impl RawConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::Config(ConfigError::NotFound(path.to_path_buf())),
            _ => Error::Config(ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Config(ConfigError::Parse { reason, .. }) => {
                Error::Config(ConfigError::Parse {
                    path: path.to_path_buf(),
                    reason,
                })
            }
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            Error::Config(ConfigError::Parse {
                path: PathBuf::new(),
                reason: e.to_string(),
            })
        })
    }

    /// Checks required fields in the order country, state, locality,
    /// organization, orgunit and reports the first one missing.
    pub fn validate(&self) -> std::result::Result<Identity, ConfigError> {
        fn required(value: &Option<String>, name: &'static str) -> std::result::Result<String, ConfigError> {
            value.clone().ok_or(ConfigError::MissingField(name))
        }

        Ok(Identity {
            country: required(&self.country, "country")?,
            state: required(&self.state, "state")?,
            locality: required(&self.locality, "locality")?,
            organization: required(&self.organization, "organization")?,
            orgunit: required(&self.orgunit, "orgunit")?,
            email: self.email.clone(),
        })
    }
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = "\
country: US
state: California
locality: San Francisco
organization: Example Inc.
orgunit: Operations
email: hostmaster@example.com
";

    #[test]
    fn test_parse_full_config() {
        let raw = RawConfig::from_yaml_str(FULL).unwrap();
        let identity = raw.validate().unwrap();
        assert_eq!(identity.country, "US");
        assert_eq!(identity.orgunit, "Operations");
        assert_eq!(identity.email.as_deref(), Some("hostmaster@example.com"));
    }

    #[test]
    fn test_email_is_optional() {
        let raw = RawConfig::from_yaml_str(
            "country: US\nstate: CA\nlocality: SF\norganization: Acme\norgunit: Eng\n",
        )
        .unwrap();
        assert_eq!(raw.validate().unwrap().email, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = RawConfig::from_yaml_str(&format!("{}keysize: 4096\n", FULL)).unwrap();
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let raw = RawConfig::from_yaml_str("organization: Acme\n").unwrap();
        assert_eq!(raw.validate(), Err(ConfigError::MissingField("country")));

        let raw = RawConfig::from_yaml_str("country: US\nstate: CA\nlocality: SF\n").unwrap();
        assert_eq!(raw.validate(), Err(ConfigError::MissingField("organization")));
    }

    #[test]
    fn test_null_value_counts_as_missing() {
        let raw = RawConfig::from_yaml_str(
            "country: US\nstate:\nlocality: SF\norganization: Acme\norgunit: Eng\n",
        )
        .unwrap();
        assert_eq!(raw.validate(), Err(ConfigError::MissingField("state")));
    }

    #[test]
    fn test_empty_document() {
        let raw = RawConfig::from_yaml_str("").unwrap();
        assert_eq!(raw, RawConfig::default());
        assert_eq!(raw.validate(), Err(ConfigError::MissingField("country")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.conf");
        match RawConfig::load(&path) {
            Err(Error::Config(ConfigError::NotFound(p))) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let raw = RawConfig::load(file.path()).unwrap();
        assert_eq!(raw.locality.as_deref(), Some("San Francisco"));
    }

    #[test]
    fn test_load_malformed_file_names_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"- just\n- a list\n").unwrap();
        match RawConfig::load(file.path()) {
            Err(Error::Config(ConfigError::Parse { path, .. })) => {
                assert_eq!(path, file.path())
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/csr"), PathBuf::from("/tmp/csr"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/csr"), home.join("csr"));
        }
    }
}
