//! Atomic typed evidence: hashes, addresses, domains, URLs, emails,
//! function names, publisher strings, keywords.
//!
//! Indicator kinds form a closed tagged union so the kind set stays
//! exhaustively matchable; the canonical string form of a kind is used only
//! at the serialization boundary. Two indicators are equal iff their values
//! are equal, and the variant tag participates, so a `function` and a
//! `keyword` with the same text never collapse in a set. The risk score
//! stays out of identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::core::risk::RiskScore;
use crate::core::types::{Domain, EmailAddress, Md5, Sha1, Sha256, Url};
use crate::error::{MaldexError, Result};

/// Indicator kinds with their canonical serialized forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "hash")]
    Hash,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
    #[serde(rename = "domain")]
    Domain,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "publisher")]
    Publisher,
    #[serde(rename = "keyword")]
    Keyword,
}

impl IndicatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Hash => "hash",
            IndicatorKind::Md5 => "MD5",
            IndicatorKind::Sha256 => "SHA256",
            IndicatorKind::Sha1 => "SHA1",
            IndicatorKind::Ipv4 => "IPv4",
            IndicatorKind::Ipv6 => "IPv6",
            IndicatorKind::Domain => "domain",
            IndicatorKind::Url => "url",
            IndicatorKind::Function => "function",
            IndicatorKind::Email => "email",
            IndicatorKind::Publisher => "publisher",
            IndicatorKind::Keyword => "keyword",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific indicator payload.
///
/// Hash digests, domains, URLs and emails wrap validated scalars; addresses
/// use the std types (candidate text is validated by std parsing); the
/// `hash`, `function`, `publisher` and `keyword` kinds carry plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorValue {
    Hash(String),
    Md5(Md5),
    Sha256(Sha256),
    Sha1(Sha1),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Domain(Domain),
    Url(Url),
    Function(String),
    Email(EmailAddress),
    Publisher(String),
    Keyword(String),
}

impl IndicatorValue {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorValue::Hash(_) => IndicatorKind::Hash,
            IndicatorValue::Md5(_) => IndicatorKind::Md5,
            IndicatorValue::Sha256(_) => IndicatorKind::Sha256,
            IndicatorValue::Sha1(_) => IndicatorKind::Sha1,
            IndicatorValue::Ipv4(_) => IndicatorKind::Ipv4,
            IndicatorValue::Ipv6(_) => IndicatorKind::Ipv6,
            IndicatorValue::Domain(_) => IndicatorKind::Domain,
            IndicatorValue::Url(_) => IndicatorKind::Url,
            IndicatorValue::Function(_) => IndicatorKind::Function,
            IndicatorValue::Email(_) => IndicatorKind::Email,
            IndicatorValue::Publisher(_) => IndicatorKind::Publisher,
            IndicatorValue::Keyword(_) => IndicatorKind::Keyword,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Hash(s)
            | IndicatorValue::Function(s)
            | IndicatorValue::Publisher(s)
            | IndicatorValue::Keyword(s) => f.write_str(s),
            IndicatorValue::Md5(v) => write!(f, "{}", v),
            IndicatorValue::Sha256(v) => write!(f, "{}", v),
            IndicatorValue::Sha1(v) => write!(f, "{}", v),
            IndicatorValue::Ipv4(v) => write!(f, "{}", v),
            IndicatorValue::Ipv6(v) => write!(f, "{}", v),
            IndicatorValue::Domain(v) => write!(f, "{}", v),
            IndicatorValue::Url(v) => write!(f, "{}", v),
            IndicatorValue::Email(v) => write!(f, "{}", v),
        }
    }
}

/// A single piece of typed evidence with its own severity.
///
/// Immutable after construction: the risk score, once set, cannot be
/// corrected later except by constructing a new indicator.
#[derive(Debug, Clone)]
pub struct Indicator {
    value: IndicatorValue,
    risk_score: RiskScore,
}

impl Indicator {
    /// Construct an indicator of the given kind from raw text.
    ///
    /// Validation is kind-specific: hashes/domains/URLs/emails go through
    /// their grammar, addresses through std parsing. Plain-string kinds
    /// never fail.
    pub fn new(kind: IndicatorKind, value: &str, risk_score: RiskScore) -> Result<Self> {
        let value = match kind {
            IndicatorKind::Hash => IndicatorValue::Hash(value.to_string()),
            IndicatorKind::Md5 => IndicatorValue::Md5(Md5::new(value)?),
            IndicatorKind::Sha256 => IndicatorValue::Sha256(Sha256::new(value)?),
            IndicatorKind::Sha1 => IndicatorValue::Sha1(Sha1::new(value)?),
            IndicatorKind::Ipv4 => IndicatorValue::Ipv4(value.parse().map_err(|_| {
                MaldexError::validation("value", value, "IPv4 address")
            })?),
            IndicatorKind::Ipv6 => IndicatorValue::Ipv6(value.parse().map_err(|_| {
                MaldexError::validation("value", value, "IPv6 address")
            })?),
            IndicatorKind::Domain => IndicatorValue::Domain(Domain::new(value)?),
            IndicatorKind::Url => IndicatorValue::Url(Url::new(value)?),
            IndicatorKind::Function => IndicatorValue::Function(value.to_string()),
            IndicatorKind::Email => IndicatorValue::Email(EmailAddress::new(value)?),
            IndicatorKind::Publisher => IndicatorValue::Publisher(value.to_string()),
            IndicatorKind::Keyword => IndicatorValue::Keyword(value.to_string()),
        };
        Ok(Indicator { value, risk_score })
    }

    /// Function-name indicator with default severity.
    pub fn function(name: impl Into<String>) -> Self {
        Indicator {
            value: IndicatorValue::Function(name.into()),
            risk_score: RiskScore::ZERO,
        }
    }

    /// Keyword indicator with default severity.
    pub fn keyword(word: impl Into<String>) -> Self {
        Indicator {
            value: IndicatorValue::Keyword(word.into()),
            risk_score: RiskScore::ZERO,
        }
    }

    /// Publisher-string indicator with default severity.
    pub fn publisher(name: impl Into<String>) -> Self {
        Indicator {
            value: IndicatorValue::Publisher(name.into()),
            risk_score: RiskScore::ZERO,
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        self.value.kind()
    }

    pub fn value(&self) -> &IndicatorValue {
        &self.value
    }

    /// Canonical text form of the value (the serialized representation).
    pub fn value_str(&self) -> String {
        self.value.to_string()
    }

    pub fn risk_score(&self) -> RiskScore {
        self.risk_score
    }
}

impl PartialEq for Indicator {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Indicator {}

impl Hash for Indicator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value)
    }
}

/// Wire form: `{value, type, risk_score}` with `type` in canonical string
/// form. Decoding re-runs the kind-specific validation.
#[derive(Serialize, Deserialize)]
struct IndicatorRecord {
    value: String,
    #[serde(rename = "type")]
    kind: IndicatorKind,
    #[serde(default)]
    risk_score: RiskScore,
}

impl Serialize for Indicator {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        IndicatorRecord {
            value: self.value_str(),
            kind: self.kind(),
            risk_score: self.risk_score,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Indicator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = IndicatorRecord::deserialize(deserializer)?;
        Indicator::new(record.kind, &record.value, record.risk_score)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_kind_specific_validation() {
        assert!(Indicator::new(IndicatorKind::Ipv4, "8.8.8.8", RiskScore::ZERO).is_ok());
        assert!(Indicator::new(IndicatorKind::Ipv4, "999.8.8.8", RiskScore::ZERO).is_err());
        assert!(Indicator::new(IndicatorKind::Ipv6, "2001:db8::1", RiskScore::ZERO).is_ok());
        assert!(Indicator::new(IndicatorKind::Ipv6, "2001:db8::zz", RiskScore::ZERO).is_err());
        assert!(Indicator::new(IndicatorKind::Domain, "evil.example.com", RiskScore::ZERO).is_ok());
        assert!(Indicator::new(IndicatorKind::Url, "not_a_url", RiskScore::ZERO).is_err());
        assert!(Indicator::new(
            IndicatorKind::Md5,
            "d41d8cd98f00b204e9800998ecf8427e",
            RiskScore::ZERO
        )
        .is_ok());
        assert!(Indicator::new(IndicatorKind::Md5, "nope", RiskScore::ZERO).is_err());
    }

    #[test]
    fn test_equality_ignores_risk_score() {
        let a = Indicator::new(IndicatorKind::Keyword, "mimikatz", RiskScore::ZERO).unwrap();
        let b = Indicator::new(IndicatorKind::Keyword, "mimikatz", RiskScore::new(9).unwrap())
            .unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_kind_participates_in_identity() {
        let function = Indicator::function("foo");
        let keyword = Indicator::keyword("foo");
        assert_ne!(function, keyword);

        let mut set = HashSet::new();
        set.insert(function);
        assert!(set.insert(keyword));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let ind = Indicator::new(
            IndicatorKind::Ipv4,
            "8.8.8.8",
            RiskScore::new(3).unwrap(),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::to_value(&ind).unwrap();
        assert_eq!(json["value"], "8.8.8.8");
        assert_eq!(json["type"], "IPv4");
        assert_eq!(json["risk_score"], 3.0);
    }

    #[test]
    fn test_round_trip_revalidates() {
        let ind = Indicator::new(IndicatorKind::Email, "Eve <eve@example.org>", RiskScore::ZERO)
            .unwrap();
        let json = serde_json::to_string(&ind).unwrap();
        let back: Indicator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ind);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);

        // A tampered record fails kind-specific validation on decode.
        let bad = r#"{"value":"not-hex","type":"SHA256","risk_score":0}"#;
        assert!(serde_json::from_str::<Indicator>(bad).is_err());
    }

    #[test]
    fn test_risk_score_defaults_to_zero_on_decode() {
        let raw = r#"{"value":"Invoke-Mimikatz","type":"function"}"#;
        let ind: Indicator = serde_json::from_str(raw).unwrap();
        assert!(ind.risk_score().is_zero());
    }

    #[test]
    fn test_canonical_kind_strings() {
        let cases = [
            (IndicatorKind::Hash, "hash"),
            (IndicatorKind::Md5, "MD5"),
            (IndicatorKind::Sha256, "SHA256"),
            (IndicatorKind::Sha1, "SHA1"),
            (IndicatorKind::Ipv4, "IPv4"),
            (IndicatorKind::Ipv6, "IPv6"),
            (IndicatorKind::Domain, "domain"),
            (IndicatorKind::Url, "url"),
            (IndicatorKind::Function, "function"),
            (IndicatorKind::Email, "email"),
            (IndicatorKind::Publisher, "publisher"),
            (IndicatorKind::Keyword, "keyword"),
        ];
        for (kind, expected) in cases {
            assert_eq!(kind.as_str(), expected);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(expected.to_string())
            );
        }
    }
}
