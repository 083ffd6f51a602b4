//! Error types for inistore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using IniError
pub type Result<T> = std::result::Result<T, IniError>;

/// Unified error type for inistore operations
#[derive(Debug, Error)]
pub enum IniError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Section does not exist: {0:?}")]
    MissingSection(String),

    #[error("Key does not exist: {section}->{key}")]
    MissingKey { section: String, key: String },

    #[error("Section already loaded: {0}")]
    DuplicateSection(String),

    // -------------------------------------------------------------------------
    // Conversion Errors (typed adapters only)
    // -------------------------------------------------------------------------
    #[error("Invalid value for {section}->{key}: {value:?} ({reason})")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl IniError {
    /// True for the per-call lookup failures (`MissingSection`, `MissingKey`)
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::MissingSection(_) | Self::MissingKey { .. })
    }
}
