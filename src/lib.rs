//! Maldex: typed modeling and risk scoring of malicious-tool artifacts for
//! threat-intelligence cataloging.
//!
//! A *tool* contains zero or more *files*, each of which contains zero or
//! more *indicators* (hashes, IPs, domains, URLs, emails, keywords, function
//! names, publisher strings). Every level carries a risk score in `[0, 10]`
//! that reflects both its own declared severity and the severity of
//! everything it contains: children scoring strictly above the declared base
//! pull the final score up, children at or below it never lower it.
//!
//! Untrusted data is validated exactly once, at construction; all entities
//! are immutable value objects afterwards and safe to share across threads
//! read-only.
//!
//! ```no_run
//! use maldex::{ToolFile, Tool};
//!
//! # fn main() -> maldex::Result<()> {
//! let file = ToolFile::parse("Invoke-Mimikatz.ps1", Some("https://example.com/raw/Invoke-Mimikatz.ps1"))?;
//! let tool = Tool::builder()
//!     .with_name("PowerSploit")
//!     .with_files(vec![file])
//!     .build()?;
//! println!("{}", tool.to_json_string()?);
//! # Ok(())
//! # }
//! ```

/// High-level directory-to-tool assembly
pub mod api;
/// Core data types module
pub mod core;
/// Error types
pub mod error;
/// Indicator extraction from raw content
pub mod extract;
/// Content-identity hashing
pub mod hashing;
/// Bounded file access
pub mod io;
/// Tracing setup
pub mod logging;

pub use crate::api::{parse_tool_from_dir, ToolInfo};
pub use crate::core::file::{ToolFile, ToolFileBuilder};
pub use crate::core::indicator::{Indicator, IndicatorKind, IndicatorValue};
pub use crate::core::risk::{aggregate_risk, RiskScore};
pub use crate::core::tool::{Tool, ToolBuilder};
pub use crate::core::types::{Domain, EmailAddress, Md5, Sha1, Sha256, Url};
pub use crate::error::{MaldexError, Result};
pub use crate::extract::{FileKind, IndicatorExtractor, PowerShellExtractor};
