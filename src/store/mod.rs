//! Store Module
//!
//! In-memory two-tier repository for configuration values.
//!
//! ## Responsibilities
//! - Hold the *loaded* tier (parsed from the file)
//! - Hold the *pending* tier (staged edits not yet written)
//! - Answer point lookups on either tier
//! - Notify subscribers when a file finished loading or an edit was staged
//!
//! ## Data Structure Choice
//! Both tiers live in one struct behind a single `RwLock`:
//! - `stage`, `clear` and the save pass's snapshot always see both tiers
//!   in the same state
//! - Values are stored as raw strings; typed parsing happens in `zone`

mod observers;
mod table;

use std::collections::HashMap;

pub use observers::{Callback, Observers};
pub use table::Store;

/// Key → value mapping for one section
pub type Entries = HashMap<String, String>;

/// Section → entries mapping for one tier
pub type SectionMap = HashMap<String, Entries>;
