//! A single file belonging to a malicious tool.
//!
//! A file carries its content identity (SHA-256, mandatory) and zero or more
//! indicators. The file's risk score is derived at construction from the
//! declared base and the indicator scores, and cannot drift afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::indicator::Indicator;
use crate::core::risk::{aggregate_risk, RiskScore};
use crate::core::types::{Sha256, Url};
use crate::error::{MaldexError, Result};
use crate::extract::FileKind;
use crate::hashing;
use crate::io::{self, IoLimits};

/// A malicious tool file with its indicators and derived risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ToolFileRecord")]
pub struct ToolFile {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    sha256: Sha256,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicators: Option<Vec<Indicator>>,
    risk_score: RiskScore,
}

impl ToolFile {
    /// Creates a new builder for direct construction (e.g. synthetic entries
    /// with no indicators).
    pub fn builder() -> ToolFileBuilder {
        ToolFileBuilder::default()
    }

    /// Parse a file from disk: stream-hash its bytes for identity, run the
    /// extractor registered for its kind, and build the entity with declared
    /// risk score 0.
    pub fn parse<P: AsRef<Path>>(path: P, url: Option<&str>) -> Result<ToolFile> {
        Self::parse_with_limits(path, url, &IoLimits::default())
    }

    /// Like [`ToolFile::parse`] with an explicit size ceiling.
    pub fn parse_with_limits<P: AsRef<Path>>(
        path: P,
        url: Option<&str>,
        limits: &IoLimits,
    ) -> Result<ToolFile> {
        let path = path.as_ref();
        let sha256 = hashing::sha256_file(path, limits)?;

        let indicators = match FileKind::of(path).extractor() {
            Some(extractor) => {
                let text = io::read_text(path, limits)?;
                let found = extractor.extract(&text);
                if found.is_empty() {
                    debug!(path = %path.display(), "file yielded no indicators");
                    None
                } else {
                    Some(found)
                }
            }
            None => None,
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut builder = Self::builder().with_name(name).with_sha256(sha256.as_str());
        if let Some(url) = url {
            builder = builder.with_url(url);
        }
        if let Some(indicators) = indicators {
            builder = builder.with_indicators(indicators);
        }
        builder.build()
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

    pub fn sha256(&self) -> &Sha256 {
        &self.sha256
    }

    pub fn indicators(&self) -> Option<&[Indicator]> {
        self.indicators.as_deref()
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.as_ref().map_or(0, |i| i.len())
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

/// Builder for [`ToolFile`]. The risk score accepted here is the *declared
/// base*; the final score is always derived in [`ToolFileBuilder::build`].
#[derive(Debug, Default)]
pub struct ToolFileBuilder {
    name: Option<String>,
    url: Option<String>,
    description: Option<String>,
    sha256: Option<String>,
    indicators: Option<Vec<Indicator>>,
    risk_score: RiskScore,
}

impl ToolFileBuilder {
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

    pub fn with_sha256<S: Into<String>>(mut self, sha256: S) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }

    pub fn with_indicators(mut self, indicators: Vec<Indicator>) -> Self {
        self.indicators = Some(indicators);
        self
    }

    /// Sets the declared risk score (the aggregation base).
    pub fn with_risk_score(mut self, risk_score: RiskScore) -> Self {
        self.risk_score = risk_score;
        self
    }

    /// Validates all fields and derives the final risk score.
    pub fn build(self) -> Result<ToolFile> {
        let name = self
            .name
            .ok_or_else(|| MaldexError::validation("name", "", "field is required"))?;
        let sha256 = Sha256::new(
            self.sha256
                .ok_or_else(|| MaldexError::validation("sha256", "", "field is required"))?,
        )?;
        let url = self.url.map(Url::new).transpose()?;

        // Duplicate indicator values never coexist on a file; first
        // occurrence wins.
        let indicators = self.indicators.map(|list| {
            let mut seen = HashSet::new();
            list.into_iter()
                .filter(|i| seen.insert(i.clone()))
                .collect::<Vec<_>>()
        });

        let risk_score = aggregate_risk(
            self.risk_score,
            indicators
                .iter()
                .flatten()
                .map(|indicator| indicator.risk_score()),
        );

        Ok(ToolFile {
            name,
            url,
            description: self.description,
            sha256,
            indicators,
            risk_score,
        })
    }
}

/// Decode shape. Every scalar is re-validated through its smart constructor;
/// the stored risk score is the already-final derived value (range-checked),
/// since re-parsing from source is what re-runs aggregation.
#[derive(Deserialize)]
struct ToolFileRecord {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    sha256: String,
    #[serde(default)]
    indicators: Option<Vec<Indicator>>,
    #[serde(default)]
    risk_score: RiskScore,
}

impl TryFrom<ToolFileRecord> for ToolFile {
    type Error = MaldexError;

    fn try_from(record: ToolFileRecord) -> Result<ToolFile> {
        Ok(ToolFile {
            name: record.name,
            url: record.url.map(Url::new).transpose()?,
            description: record.description,
            sha256: Sha256::new(record.sha256)?,
            indicators: record.indicators,
            risk_score: record.risk_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::indicator::IndicatorKind;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn indicator(kind: IndicatorKind, value: &str, score: i64) -> Indicator {
        Indicator::new(kind, value, RiskScore::new(score).unwrap()).unwrap()
    }

    #[test]
    fn test_build_minimal() {
        let file = ToolFile::builder()
            .with_name("payload.bin")
            .with_sha256(EMPTY_SHA256)
            .build()
            .unwrap();
        assert_eq!(file.name(), "payload.bin");
        assert!(file.url().is_none());
        assert!(file.indicators().is_none());
        assert!(file.risk_score().is_zero());
    }

    #[test]
    fn test_build_requires_name_and_sha256() {
        assert!(ToolFile::builder().with_sha256(EMPTY_SHA256).build().is_err());
        assert!(ToolFile::builder().with_name("x").build().is_err());
        assert!(ToolFile::builder()
            .with_name("x")
            .with_sha256("short")
            .build()
            .is_err());
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let result = ToolFile::builder()
            .with_name("x")
            .with_sha256(EMPTY_SHA256)
            .with_url("not_a_url")
            .build();
        assert!(matches!(result, Err(MaldexError::Validation { .. })));
    }

    #[test]
    fn test_indicator_scores_elevate_file_score() {
        let file = ToolFile::builder()
            .with_name("x")
            .with_sha256(EMPTY_SHA256)
            .with_risk_score(RiskScore::new(5).unwrap())
            .with_indicators(vec![
                indicator(IndicatorKind::Keyword, "a", 7),
                indicator(IndicatorKind::Keyword, "b", 7),
                indicator(IndicatorKind::Keyword, "c", 7),
            ])
            .build()
            .unwrap();
        assert_eq!(file.risk_score().value(), 6.0);
    }

    #[test]
    fn test_low_indicator_scores_never_lower_declared() {
        let file = ToolFile::builder()
            .with_name("x")
            .with_sha256(EMPTY_SHA256)
            .with_risk_score(RiskScore::new(5).unwrap())
            .with_indicators(vec![
                indicator(IndicatorKind::Keyword, "a", 3),
                indicator(IndicatorKind::Keyword, "b", 4),
                indicator(IndicatorKind::Keyword, "c", 5),
            ])
            .build()
            .unwrap();
        assert_eq!(file.risk_score().value(), 5.0);
    }

    #[test]
    fn test_build_dedups_indicators_by_value() {
        let file = ToolFile::builder()
            .with_name("x")
            .with_sha256(EMPTY_SHA256)
            .with_indicators(vec![
                Indicator::function("Foo"),
                Indicator::function("Bar"),
                Indicator::function("Foo"),
            ])
            .build()
            .unwrap();
        assert_eq!(file.indicator_count(), 2);
    }

    #[test]
    fn test_json_shape_and_round_trip() {
        let file = ToolFile::builder()
            .with_name("Invoke-Mimikatz.ps1")
            .with_url("http://example.com/Invoke-Mimikatz.ps1")
            .with_sha256(EMPTY_SHA256)
            .with_indicators(vec![Indicator::function("Invoke-Mimikatz")])
            .build()
            .unwrap();

        let json = file.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Invoke-Mimikatz.ps1");
        assert_eq!(value["sha256"], EMPTY_SHA256);
        assert_eq!(value["indicators"][0]["type"], "function");
        // Absent optionals are omitted entirely.
        assert!(value.get("description").is_none());

        let back = ToolFile::from_json_str(&json).unwrap();
        assert_eq!(back, file);
        assert_eq!(back.to_json_string().unwrap(), json);
    }

    #[test]
    fn test_decode_revalidates_scalars() {
        let bad_sha = r#"{"name":"x","sha256":"nope","risk_score":0}"#;
        assert!(ToolFile::from_json_str(bad_sha).is_err());

        let bad_url = format!(
            r#"{{"name":"x","url":"not_a_url","sha256":"{}","risk_score":0}}"#,
            EMPTY_SHA256
        );
        assert!(ToolFile::from_json_str(&bad_url).is_err());

        let bad_score = format!(r#"{{"name":"x","sha256":"{}","risk_score":42}}"#, EMPTY_SHA256);
        assert!(ToolFile::from_json_str(&bad_score).is_err());
    }
}
