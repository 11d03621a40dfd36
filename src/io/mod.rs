//! Bounded file access for hashing and extraction.
//!
//! File reads are local, sequential and blocking. A size ceiling is checked
//! at open so neither the streaming hash nor the in-memory extraction text
//! can be fed an unbounded input.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{MaldexError, Result};

/// Resource limits for file access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoLimits {
    /// The absolute maximum file size that can be opened.
    pub max_file_size: u64,
}

impl Default for IoLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Open a file after checking its size against the configured ceiling.
pub fn open_checked(path: &Path, limits: &IoLimits) -> Result<File> {
    let file = File::open(path).map_err(|e| MaldexError::file_access(path, e))?;
    let metadata = file.metadata().map_err(|e| MaldexError::file_access(path, e))?;
    let size = metadata.len();

    debug!(path = %path.display(), size, "opening file");

    if size > limits.max_file_size {
        return Err(MaldexError::FileTooLarge {
            path: path.to_path_buf(),
            found: size,
            limit: limits.max_file_size,
        });
    }
    Ok(file)
}

/// Read a file's full content as text for extraction.
///
/// Decoding is lossy so the scan is total even for scripts with stray
/// non-UTF-8 bytes; content identity always comes from the raw bytes, not
/// from this text.
pub fn read_text(path: &Path, limits: &IoLimits) -> Result<String> {
    let mut file = open_checked(path, limits)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| MaldexError::file_access(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
