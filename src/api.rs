//! High-level catalog assembly.
//!
//! Walks a directory tree, turns every recognized script file into a
//! [`ToolFile`], and assembles the result into a [`Tool`]. Any file error
//! aborts the assembly; deciding whether to skip a failing file is the
//! caller's business, never this crate's.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::file::ToolFile;
use crate::core::risk::RiskScore;
use crate::core::tool::Tool;
use crate::error::{MaldexError, Result};
use crate::extract::FileKind;
use crate::io::IoLimits;

/// Declared metadata for a tool under assembly.
#[derive(Debug, Clone, Default)]
pub struct ToolInfo {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    /// Declared base risk score for the tool itself.
    pub risk_score: RiskScore,
    /// When set, each file gets `<base>/<relative path>` as its source URL.
    pub file_url_base: Option<String>,
}

impl ToolInfo {
    pub fn named(name: impl Into<String>) -> Self {
        ToolInfo {
            name: name.into(),
            ..ToolInfo::default()
        }
    }
}

/// Parse every recognized file under `root` and assemble a [`Tool`].
///
/// Files are visited in lexicographic path order so assembly is
/// deterministic. Files with no registered extractor kind are skipped
/// entirely (they are not part of the tool's catalog entry).
pub fn parse_tool_from_dir<P: AsRef<Path>>(root: P, info: ToolInfo) -> Result<Tool> {
    parse_tool_from_dir_with_limits(root, info, &IoLimits::default())
}

/// Like [`parse_tool_from_dir`] with an explicit size ceiling.
pub fn parse_tool_from_dir_with_limits<P: AsRef<Path>>(
    root: P,
    info: ToolInfo,
    limits: &IoLimits,
) -> Result<Tool> {
    let root = root.as_ref();
    let mut paths = Vec::new();
    walk(root, &mut paths)?;
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        if FileKind::of(&path) == FileKind::Other {
            continue;
        }
        let url = match &info.file_url_base {
            Some(base) => Some(file_url(base, root, &path)),
            None => None,
        };
        files.push(ToolFile::parse_with_limits(&path, url.as_deref(), limits)?);
    }

    info!(
        tool = %info.name,
        root = %root.display(),
        files = files.len(),
        "assembled tool from directory"
    );

    let mut builder = Tool::builder()
        .with_name(info.name)
        .with_risk_score(info.risk_score);
    if let Some(url) = info.url {
        builder = builder.with_url(url);
    }
    if let Some(description) = info.description {
        builder = builder.with_description(description);
    }
    if let Some(version) = info.version {
        builder = builder.with_version(version);
    }
    if !files.is_empty() {
        builder = builder.with_files(files);
    }
    builder.build()
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| MaldexError::file_access(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MaldexError::file_access(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

// Per-file source URL: base + '/'-joined relative path.
fn file_url(base: &str, root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), rel.join("/"))
}
