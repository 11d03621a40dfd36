//! Indicator extraction from raw file content.
//!
//! Extractors are pure: text in, deduplicated indicators out, no side
//! effects. Each recognized file kind registers one extractor; kinds without
//! one simply yield no indicators, which is a valid terminal state, not an
//! error.

pub mod powershell;

use std::path::Path;

pub use powershell::PowerShellExtractor;

use crate::core::indicator::Indicator;

/// Contract shared by all extraction rules: produce a deduplicated set of
/// indicators from raw text. Output preserves first-occurrence order so
/// results are deterministic.
pub trait IndicatorExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<Indicator>;
}

/// File kinds the extraction layer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    PowerShell,
    Other,
}

impl FileKind {
    /// Detect the kind from the file extension.
    pub fn of<P: AsRef<Path>>(path: P) -> FileKind {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("ps1") | Some("psm1") => FileKind::PowerShell,
            _ => FileKind::Other,
        }
    }

    /// The extraction rule registered for this kind, if any.
    pub fn extractor(&self) -> Option<&'static dyn IndicatorExtractor> {
        match self {
            FileKind::PowerShell => Some(&PowerShellExtractor),
            FileKind::Other => None,
        }
    }
}
