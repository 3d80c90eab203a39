use crate::config::RawConfig;
use crate::csr::{CsrBuilder, GeneratedArtifact};
use crate::types::RequestSpec;
use rsa::RsaPrivateKey;
use std::sync::OnceLock;

/// One 2048 bit key per test binary; generating a key per test is too slow.
pub(crate) fn shared_key() -> RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| crate::csr::generate_key(2048).unwrap())
        .clone()
}

pub(crate) fn test_config() -> RawConfig {
    RawConfig {
        country: Some("US".to_string()),
        state: Some("CA".to_string()),
        locality: Some("SF".to_string()),
        organization: Some("Acme".to_string()),
        orgunit: Some("Eng".to_string()),
        email: None,
    }
}

pub(crate) fn build_with_shared_key(spec: &RequestSpec) -> GeneratedArtifact {
    CsrBuilder::new(spec.clone())
        .with_key(shared_key())
        .build()
        .unwrap()
}
