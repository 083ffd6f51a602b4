//! Store implementation
//!
//! HashMap-based tiers with a single RwLock for concurrency.

use std::collections::hash_map::Entry;

use parking_lot::RwLock;

use crate::error::{IniError, Result};

use super::{Entries, Observers, SectionMap};

#[derive(Debug, Default)]
struct Tiers {
    /// Values parsed from the file
    loaded: SectionMap,

    /// Edits staged since the last clear
    pending: SectionMap,
}

/// Two-tier configuration store
///
/// ## Concurrency:
/// - `tiers`: both tiers behind one RwLock, so readers always see a
///   consistent pair
/// - Observers are fired after the lock is released; callbacks may read
///   or stage
/// - All methods use `&self`; share with `Arc<Store>`
#[derive(Debug, Default)]
pub struct Store {
    tiers: RwLock<Tiers>,

    /// Fired by the engine once a load has populated the store
    file_loaded: Observers,

    /// Fired on every `stage()`
    dirty: Observers,
}

impl Store {
    /// Create a new empty Store
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Loaded Tier
    // =========================================================================

    /// Insert a whole section into the loaded tier.
    ///
    /// Returns `DuplicateSection` if the name is already loaded; the
    /// existing section is left untouched.
    pub fn add_section(&self, name: impl Into<String>, entries: Entries) -> Result<()> {
        let mut tiers = self.tiers.write();
        match tiers.loaded.entry(name.into()) {
            Entry::Occupied(existing) => Err(IniError::DuplicateSection(existing.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(entries);
                Ok(())
            }
        }
    }

    /// Look up a loaded value
    ///
    /// Returns:
    /// - `Ok(value)`: raw string as parsed
    /// - `Err(MissingSection)`: `section` is empty or was never loaded
    /// - `Err(MissingKey)`: section exists but has no such key
    pub fn get_value(&self, section: &str, key: &str) -> Result<String> {
        if section.is_empty() {
            return Err(IniError::MissingSection(String::new()));
        }

        let tiers = self.tiers.read();
        let entries = tiers
            .loaded
            .get(section)
            .ok_or_else(|| IniError::MissingSection(section.to_string()))?;

        entries.get(key).cloned().ok_or_else(|| IniError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    /// Whether a section is present in the loaded tier
    pub fn contains_section(&self, section: &str) -> bool {
        self.tiers.read().loaded.contains_key(section)
    }

    /// Number of loaded sections (including the implicit one)
    pub fn section_count(&self) -> usize {
        self.tiers.read().loaded.len()
    }

    /// Snapshot of the loaded tier
    pub fn all_loaded(&self) -> SectionMap {
        self.tiers.read().loaded.clone()
    }

    // =========================================================================
    // Pending Tier
    // =========================================================================

    /// Stage a change, replacing any earlier change for the same pair.
    ///
    /// Dirty subscribers fire on every call, even if the value is unchanged.
    pub fn stage(&self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!("Staging {}->{} = {:?}", section, key, value);

        {
            let mut tiers = self.tiers.write();
            tiers
                .pending
                .entry(section.to_string())
                .or_default()
                .insert(key.to_string(), value);
        }

        self.dirty.notify();
    }

    /// The staged value for exactly this pair, or `None` if nothing was staged
    pub fn get_pending_value(&self, section: &str, key: &str) -> Option<String> {
        self.tiers
            .read()
            .pending
            .get(section)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    /// Total number of staged pairs across all sections
    pub fn pending_count(&self) -> usize {
        self.tiers.read().pending.values().map(|e| e.len()).sum()
    }

    /// Snapshot of the pending tier
    pub fn all_pending(&self) -> SectionMap {
        self.tiers.read().pending.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replace both tiers with empty ones
    pub fn clear(&self) {
        *self.tiers.write() = Tiers::default();
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Subscribe to "file finished loading"
    pub fn on_file_loaded<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.file_loaded.subscribe(callback);
    }

    /// Subscribe to "a change was staged"
    pub fn on_dirty<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.dirty.subscribe(callback);
    }

    /// Fire the file-loaded subscribers
    pub(crate) fn notify_file_loaded(&self) {
        self.file_loaded.notify();
    }
}
