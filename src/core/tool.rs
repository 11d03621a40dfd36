//! The root entity: a malicious tool aggregating files.
//!
//! A tool owns its files (insertion order preserved) and derives its risk
//! score from the declared base and the files' already-final scores, with
//! the same algorithm a file applies over its indicators. A hosted tool with
//! no files (name and URL only) is valid.

use serde::{Deserialize, Serialize};

use crate::core::file::ToolFile;
use crate::core::risk::{aggregate_risk, RiskScore};
use crate::core::types::Url;
use crate::error::{MaldexError, Result};

/// A malicious tool with its files and derived risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ToolRecord")]
pub struct Tool {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<ToolFile>>,
    risk_score: RiskScore,
}

impl Tool {
    /// Creates a new builder.
    pub fn builder() -> ToolBuilder {
        ToolBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn files(&self) -> Option<&[ToolFile]> {
        self.files.as_deref()
    }

    pub fn file_count(&self) -> usize {
        self.files.as_ref().map_or(0, |f| f.len())
    }

    /// Total indicator count across all files.
    pub fn indicator_count(&self) -> usize {
        self.files
            .iter()
            .flatten()
            .map(|file| file.indicator_count())
            .sum()
    }

    /// The final, derived risk score.
    pub fn risk_score(&self) -> RiskScore {
        self.risk_score
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MaldexError::Serialization(e.to_string()))
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| MaldexError::Serialization(e.to_string()))
    }
}

/// Builder for [`Tool`]. The risk score accepted here is the *declared
/// base*; the final score is always derived in [`ToolBuilder::build`].
#[derive(Debug, Default)]
pub struct ToolBuilder {
    name: Option<String>,
    url: Option<String>,
    description: Option<String>,
    version: Option<String>,
    files: Option<Vec<ToolFile>>,
    risk_score: RiskScore,
}

impl ToolBuilder {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_files(mut self, files: Vec<ToolFile>) -> Self {
        self.files = Some(files);
        self
    }

    /// Sets the declared risk score (the aggregation base).
    pub fn with_risk_score(mut self, risk_score: RiskScore) -> Self {
        self.risk_score = risk_score;
        self
    }

    /// Validates all fields and derives the final risk score.
    pub fn build(self) -> Result<Tool> {
        let name = self
            .name
            .ok_or_else(|| MaldexError::validation("name", "", "field is required"))?;
        let url = self.url.map(Url::new).transpose()?;

        let risk_score = aggregate_risk(
            self.risk_score,
            self.files.iter().flatten().map(|file| file.risk_score()),
        );

        Ok(Tool {
            name,
            url,
            description: self.description,
            version: self.version,
            files: self.files,
            risk_score,
        })
    }
}

/// Decode shape; see the note on `ToolFileRecord`.
#[derive(Deserialize)]
struct ToolRecord {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    files: Option<Vec<ToolFile>>,
    #[serde(default)]
    risk_score: RiskScore,
}

impl TryFrom<ToolRecord> for Tool {
    type Error = MaldexError;

    fn try_from(record: ToolRecord) -> Result<Tool> {
        Ok(Tool {
            name: record.name,
            url: record.url.map(Url::new).transpose()?,
            description: record.description,
            version: record.version,
            files: record.files,
            risk_score: record.risk_score,
        })
    }
}
