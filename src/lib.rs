//! gen-csr - RSA keys and PKCS#10 certificate signing requests
//!
//! Given a set of DNS names and an identity configuration (country, state,
//! locality, organization, organizational unit and an optional email
//! address), this crate:
//!
//! - Resolves the request: the first name becomes the common name and every
//!   name is listed as a DNS subject alternative name, optionally with
//!   `www.` variants added
//! - Generates an RSA key and a SHA-256 signed request carrying the SAN
//!   extension in a PKCS#9 extensionRequest attribute
//! - Writes `<name>-<timestamp>.key` and `<name>-<timestamp>.csr` to an
//!   output directory
//!
//! # Examples
//!
//! ```no_run
//! use gen_csr::config::RawConfig;
//! use gen_csr::csr::CsrBuilder;
//! use gen_csr::identity::resolve;
//! use gen_csr::output::{prepare_output_dir, timestamp_now, write_csr, write_key, OutputPaths};
//! use gen_csr::types::{Encoding, KeyFormat};
//! use std::path::Path;
//!
//! let config = RawConfig::load("/etc/gen-csr.conf").unwrap();
//! let spec = resolve(vec!["example.com".to_string()], true, &config)
//!     .unwrap()
//!     .with_key_bits(4096);
//!
//! let dir = Path::new("csr");
//! prepare_output_dir(dir).unwrap();
//! let paths = OutputPaths::new(dir, spec.common_name(), &timestamp_now());
//!
//! let artifact = CsrBuilder::new(spec).build().unwrap();
//! write_key(&artifact, &paths.key, KeyFormat::Pkcs1, Encoding::Pem).unwrap();
//! write_csr(&artifact, &paths.csr, Encoding::Pem).unwrap();
//! ```

pub mod config;
pub mod csr;
pub mod error;
pub mod identity;
pub mod inspect;
pub mod output;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod test_support;

pub use error::{ConfigError, Error, Result};

pub use config::{Identity, RawConfig};
pub use csr::{CsrBuilder, GeneratedArtifact};
pub use identity::resolve;
pub use inspect::{parse_request_der, parse_request_pem, ParsedRequest};
pub use output::OutputPaths;
pub use types::{AttributeCode, Encoding, KeyFormat, RequestSpec, SubjectField};
