//! PowerShell function-declaration extraction.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::indicator::Indicator;
use crate::extract::IndicatorExtractor;

// Case-sensitive and loose: scans for declaration-shaped text rather than
// parsing the language. The name class admits the empty name.
static RE_PS_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s*([a-zA-Z_-]*)\s*\{").expect("valid function regex"));

/// Extracts a `function` indicator for every function declared in a script.
pub struct PowerShellExtractor;

impl IndicatorExtractor for PowerShellExtractor {
    fn extract(&self, text: &str) -> Vec<Indicator> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for captures in RE_PS_FUNCTION.captures_iter(text) {
            let name = captures[1].to_string();
            if seen.insert(name.clone()) {
                out.push(Indicator::function(name));
            }
        }

        debug!(count = out.len(), "extracted function declarations");
        out
    }
}
