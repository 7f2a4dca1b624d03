//! Content hashing for installed files.

use crate::config::InstallConfig;
use crate::error::{InstallError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| InstallError::io_with_path(e, path))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; InstallConfig::HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| InstallError::io_with_path(e, path))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check whether two files have identical content.
///
/// Sizes are compared first so differing files rarely need hashing.
pub fn files_identical(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool> {
    let (a, b) = (a.as_ref(), b.as_ref());
    let len_a = a
        .metadata()
        .map_err(|e| InstallError::io_with_path(e, a))?
        .len();
    let len_b = b
        .metadata()
        .map_err(|e| InstallError::io_with_path(e, b))?
        .len();

    if len_a != len_b {
        return Ok(false);
    }

    Ok(sha256_file(a)? == sha256_file(b)?)
}
