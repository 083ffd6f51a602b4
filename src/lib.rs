//! # inistore
//!
//! A format-preserving INI configuration store with:
//! - Tolerant line-oriented parsing of `[Section]` and `key = value` lines
//! - A two-tier store separating loaded values from staged edits
//! - Rewrites that replace only changed values, keeping comments and layout
//! - Load and dirty notifications for dependent components
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Zones (typed adapters)                     │
//! │              get_unsigned / get_bool / stage_int             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Store                                │
//! │            loaded tier  |  pending tier  (RwLock)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Engine.load │          │ Engine.save │
//!   │  (parse)    │          │ (rewrite)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!      file.ini  ───────────►  file.ini.tmp ──rename──► file.ini
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod parser;
pub mod store;
pub mod engine;
pub mod zone;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IniError, Result};
pub use config::Config;
pub use engine::{Engine, LoadStatus, SaveReport};
pub use store::Store;
pub use zone::{Zone, ZoneInt};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of inistore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
