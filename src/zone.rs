//! Typed adapters
//!
//! A `Zone` reads and stages values for one section, converting the raw
//! strings held by the store into integers and booleans.

use std::num::IntErrorKind;
use std::sync::Arc;

use crate::error::{IniError, Result};
use crate::parser::IMPLICIT_SECTION;
use crate::store::Store;

/// Multiplier applied to an `"<n>s"` value (hundredths of a second)
pub const TICKS_PER_SECOND: u16 = 100;

/// An integer value that may or may not carry a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneInt {
    Signed(i16),
    Unsigned(u16),
}

/// Section-scoped view over a shared store
#[derive(Debug, Clone)]
pub struct Zone {
    store: Arc<Store>,
    section: String,
}

impl Zone {
    /// A zone bound to the implicit section
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_section(store, IMPLICIT_SECTION)
    }

    pub fn with_section(store: Arc<Store>, section: impl Into<String>) -> Self {
        Self {
            store,
            section: section.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Rebind to another section. An empty name is ignored.
    pub fn set_section(&mut self, section: impl Into<String>) {
        let section = section.into();
        if !section.is_empty() {
            self.section = section;
        }
    }

    /// Run `callback` after every successful load of the backing file, so
    /// the zone's consumer can re-read its values.
    pub fn on_loaded<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.on_file_loaded(callback);
    }

    // =========================================================================
    // Readers
    // =========================================================================

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.store.get_value(&self.section, key)
    }

    pub fn get_signed(&self, key: &str) -> Result<i16> {
        let raw = self.get_string(key)?;
        raw.parse::<i16>()
            .map_err(|e| self.invalid(key, &raw, e.to_string()))
    }

    /// Unsigned integer, or a whole number of seconds written as `"30s"`,
    /// which comes back in hundredths (`3000`).
    pub fn get_unsigned(&self, key: &str) -> Result<u16> {
        let raw = self.get_string(key)?;

        match seconds_digits(&raw) {
            Some(digits) => digits
                .parse::<u16>()
                .ok()
                .and_then(|secs| secs.checked_mul(TICKS_PER_SECOND))
                .ok_or_else(|| self.invalid(key, &raw, "duration out of range".to_string())),
            None => raw
                .parse::<u16>()
                .map_err(|e| self.invalid(key, &raw, e.to_string())),
        }
    }

    /// Non-zero unsigned integers and `true` are true; `0` and `false` are
    /// false (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let raw = self.get_string(key)?;

        match raw.parse::<u16>() {
            Ok(n) => Ok(n > 0),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => {
                Err(self.invalid(key, &raw, e.to_string()))
            }
            Err(_) if raw.eq_ignore_ascii_case("true") => Ok(true),
            Err(_) if raw.eq_ignore_ascii_case("false") => Ok(false),
            Err(_) => Err(self.invalid(key, &raw, "expected a number, true or false".to_string())),
        }
    }

    /// True only if the value parses as a negative `i16`
    pub fn is_signed(&self, key: &str) -> bool {
        matches!(self.get_signed(key), Ok(n) if n < 0)
    }

    /// Negative values come back signed, everything else through
    /// `get_unsigned` (so `"30s"` works here too).
    pub fn get_int(&self, key: &str) -> Result<ZoneInt> {
        if self.is_signed(key) {
            self.get_signed(key).map(ZoneInt::Signed)
        } else {
            self.get_unsigned(key).map(ZoneInt::Unsigned)
        }
    }

    // =========================================================================
    // Writers
    // =========================================================================

    pub fn stage_string(&self, key: &str, value: impl Into<String>) {
        self.store.stage(&self.section, key, value);
    }

    pub fn stage_int(&self, key: &str, value: u32) {
        self.store.stage(&self.section, key, value.to_string());
    }

    fn invalid(&self, key: &str, value: &str, reason: String) -> IniError {
        tracing::warn!(
            "Invalid value for {}->{}: {:?} ({})",
            self.section,
            key,
            value,
            reason
        );
        IniError::InvalidValue {
            section: self.section.clone(),
            key: key.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

/// Digits of a `^\d+s$` value
fn seconds_digits(raw: &str) -> Option<&str> {
    let digits = raw.strip_suffix('s')?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
