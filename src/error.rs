//! Error types for maldex operations.
//!
//! All validation failures surface at construction time and carry the field
//! name, the offending value, and the violated constraint; nothing is
//! recovered internally.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for maldex operations.
#[derive(Debug, Error)]
pub enum MaldexError {
    /// A scalar or structured field failed its grammar or range constraint.
    #[error("invalid {field} {value:?}: expected {constraint}")]
    Validation {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// The designated source could not be read for hashing or extraction.
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source exceeds the configured size ceiling.
    #[error("{} is too large: {found} bytes (limit {limit})", path.display())]
    FileTooLarge {
        path: PathBuf,
        found: u64,
        limit: u64,
    },

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MaldexError {
    pub(crate) fn validation(
        field: &'static str,
        value: impl Into<String>,
        constraint: &'static str,
    ) -> Self {
        MaldexError::Validation {
            field,
            value: value.into(),
            constraint,
        }
    }

    pub(crate) fn file_access(path: &std::path::Path, source: std::io::Error) -> Self {
        MaldexError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for maldex operations.
pub type Result<T> = std::result::Result<T, MaldexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = MaldexError::validation("risk_score", "15", "0 <= value <= 10");
        assert_eq!(
            err.to_string(),
            "invalid risk_score \"15\": expected 0 <= value <= 10"
        );
    }

    #[test]
    fn test_file_access_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MaldexError::file_access(std::path::Path::new("/tmp/missing.ps1"), io);
        assert!(err.to_string().contains("/tmp/missing.ps1"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_file_too_large_display() {
        let err = MaldexError::FileTooLarge {
            path: PathBuf::from("big.bin"),
            found: 200,
            limit: 100,
        };
        assert_eq!(
            err.to_string(),
            "big.bin is too large: 200 bytes (limit 100)"
        );
    }
}
