//! Output directory setup and artifact file writing.

use crate::csr::GeneratedArtifact;
use crate::error::{Error, Result};
use crate::types::{Encoding, KeyFormat};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "~/csr";

/// Minute resolution, e.g. `2026-10-15T14:03`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

const OUTPUT_DIR_MODE: u32 = 0o750;
const KEY_FILE_MODE: u32 = 0o600;
const CSR_FILE_MODE: u32 = 0o644;

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub key: PathBuf,
    pub csr: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl AsRef<Path>, common_name: &str, timestamp: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            key: dir.join(format!("{}-{}.key", common_name, timestamp)),
            csr: dir.join(format!("{}-{}.csr", common_name, timestamp)),
        }
    }
}

/// Makes sure `path` is a usable output directory.
///
/// A missing directory is created together with its parents and restricted
/// to 0750. An existing directory is used as it is.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::OutputPathNotDirectory(path.to_path_buf()));
        }
        log::debug!("Using existing output directory {}", path.display());
        return Ok(());
    }

    log::debug!("Creating output directory {}", path.display());
    fs::create_dir_all(path).map_err(|source| Error::OutputDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    restrict_dir_permissions(path)
}

#[cfg(unix)]
fn restrict_dir_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(OUTPUT_DIR_MODE)).map_err(|source| {
        Error::OutputDirectory {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

pub fn write_key(
    artifact: &GeneratedArtifact,
    path: &Path,
    format: KeyFormat,
    encoding: Encoding,
) -> Result<()> {
    write_file(path, &artifact.key_bytes(format, encoding)?, KEY_FILE_MODE)?;
    log::info!("Wrote key: {}", path.display());
    Ok(())
}

pub fn write_csr(artifact: &GeneratedArtifact, path: &Path, encoding: Encoding) -> Result<()> {
    write_file(path, &artifact.csr_bytes(encoding), CSR_FILE_MODE)?;
    log::info!("Wrote CSR: {}", path.display());
    Ok(())
}

/// Truncates and rewrites `path`; the handle is closed when it goes out of scope.
#[cfg_attr(not(unix), allow(unused_variables))]
fn write_file(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(())
}
