//! Validated string scalars used at the trust boundary of every entity.
//!
//! Each type's invariant is "any live instance satisfies its grammar":
//! validation happens exactly once, at construction, and the value is
//! immutable afterwards. Patterns are intentionally conservative and
//! precompiled; prefer token validation (e.g. `std::net` address parsing)
//! after candidate extraction where appropriate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::error::{MaldexError, Result};

static RE_MD5: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{32}$").expect("valid md5 regex"));
static RE_SHA1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{40}$").expect("valid sha1 regex"));
static RE_SHA256: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").expect("valid sha256 regex"));
// Hostname labels, RFC 1123-ish: 1-63 alphanumerics/hyphens, optional
// trailing dot. Length and string-boundary hyphen checks happen in code
// since the regex crate has no lookaround.
static RE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9-]{1,63}(\.[A-Za-z0-9-]{1,63})*\.?$").expect("valid domain regex")
});
// http/https URLs; simple and robust.
static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^https?://[^\s'"<>]+$"#).expect("valid url regex"));
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email regex")
});

fn check(field: &'static str, value: String, re: &Regex, constraint: &'static str) -> Result<String> {
    if re.is_match(&value) {
        Ok(value)
    } else {
        Err(MaldexError::validation(field, value, constraint))
    }
}

/// A validated MD5 hash string (32 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Md5(String);

impl Md5 {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        check("md5", value.into(), &RE_MD5, "32 hex characters").map(Md5)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated SHA-1 hash string (40 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sha1(String);

impl Sha1 {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        check("sha1", value.into(), &RE_SHA1, "40 hex characters").map(Sha1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated SHA-256 hash string (64 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sha256(String);

impl Sha256 {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        check("sha256", value.into(), &RE_SHA256, "64 hex characters").map(Sha256)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated domain name.
///
/// Grammar: labels of 1-63 alphanumerics/hyphens, total length at most 255,
/// optional trailing dot, and the string neither starts nor ends with a
/// hyphen. Interior label-edge hyphens are accepted for compatibility with
/// the wider hostname grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let ok = (1..=255).contains(&value.len())
            && !value.starts_with('-')
            && !value.ends_with('-')
            && RE_DOMAIN.is_match(&value);
        if ok {
            Ok(Domain(value))
        } else {
            Err(MaldexError::validation(
                "domain",
                value,
                "hostname of 1-63 char labels, <= 255 chars total",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated http/https URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Url(String);

impl Url {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        check("url", value.into(), &RE_URL, "http(s)://... URL").map(Url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An email address with an optional display name.
///
/// Accepts `addr@host.tld` or `Name <addr@host.tld>`; only the address part
/// is grammar-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    name: Option<String>,
    email: String,
}

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref().trim();
        let (name, addr) = match (raw.find('<'), raw.ends_with('>')) {
            (Some(open), true) => {
                let name = raw[..open].trim();
                let addr = raw[open + 1..raw.len() - 1].trim();
                ((!name.is_empty()).then(|| name.to_string()), addr)
            }
            (None, _) => (None, raw),
            _ => {
                return Err(MaldexError::validation(
                    "email",
                    raw,
                    "addr@host or Name <addr@host>",
                ))
            }
        };
        if !RE_EMAIL.is_match(addr) {
            return Err(MaldexError::validation(
                "email",
                raw,
                "addr@host or Name <addr@host>",
            ));
        }
        Ok(EmailAddress {
            name,
            email: addr.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

impl fmt::Display for Md5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
