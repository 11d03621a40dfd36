//! Content-identity hashing.
//!
//! File identity is the SHA-256 of the raw bytes. Files stream through the
//! hasher in fixed-size chunks to bound memory; the digest is identical to a
//! single-pass hash over the full content.

use std::io::Read;
use std::path::Path;

use sha2::Digest;
use tracing::debug;

use crate::core::types::Sha256;
use crate::error::{MaldexError, Result};
use crate::io::{open_checked, IoLimits};

/// Chunk size for streaming file hashes (128 KiB).
pub const CHUNK_SIZE: usize = 128 * 1024;

/// Computes the SHA-256 digest of the given data and returns it as a hex string.
pub fn sha256_digest(data: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes the SHA-256 content identity of a file via a chunked streaming read.
pub fn sha256_file<P: AsRef<Path>>(path: P, limits: &IoLimits) -> Result<Sha256> {
    let path = path.as_ref();
    let mut file = open_checked(path, limits)?;
    let mut hasher = sha2::Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| MaldexError::file_access(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hex::encode(hasher.finalize());
    debug!(path = %path.display(), sha256 = %digest, "hashed file content");
    Sha256::new(digest)
}
