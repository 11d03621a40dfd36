//! Core data types for the maldex catalog model.
//!
//! This module contains the fundamental types of the system: validated
//! scalars, indicators, and the file/tool entities they roll up into.

pub mod file;
pub mod indicator;
pub mod risk;
pub mod tool;
pub mod types;
