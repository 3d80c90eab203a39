use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Output-path '{}' points to a file", .0.display())]
    OutputPathNotDirectory(PathBuf),

    #[error("Could not setup output-directory '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Key generation error: {0}")]
    KeyGen(String),

    #[error("Signing error: {0}")]
    Sign(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("DNS name error: {0}")]
    DnsName(String),

    #[error("PEM encoding error: {0}")]
    Pem(String),

    #[error("X509 parsing error: {0}")]
    X509Parse(String),
}

/// Problems with the identity configuration or the requested names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing DNS name: option '--name DNSNAME' must be provided at least once")]
    MissingDnsName,

    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("Config-file '{}' does not exist. Specify a config-file with -c option.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not parse config-file '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl From<rcgen::Error> for Error {
    fn from(err: rcgen::Error) -> Self {
        Error::Sign(err.to_string())
    }
}

impl From<rsa::Error> for Error {
    fn from(err: rsa::Error) -> Self {
        Error::KeyGen(err.to_string())
    }
}

impl From<x509_parser::error::X509Error> for Error {
    fn from(err: x509_parser::error::X509Error) -> Self {
        Error::X509Parse(err.to_string())
    }
}

impl From<x509_parser::nom::Err<x509_parser::error::X509Error>> for Error {
    fn from(err: x509_parser::nom::Err<x509_parser::error::X509Error>) -> Self {
        Error::X509Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
