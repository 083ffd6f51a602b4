//! Configuration for inistore
//!
//! Centralized configuration with sensible defaults.

use std::ffi::OsString;
use std::path::PathBuf;

/// Main configuration for an Engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// The INI file that is loaded and rewritten.
    /// Must already exist for a save to succeed.
    pub path: PathBuf,

    /// Suffix appended to `path` to name the scratch file used during save
    ///   {path}{temp_suffix}   e.g. `system.ini.tmp`
    pub temp_suffix: String,

    // -------------------------------------------------------------------------
    // Save Configuration
    // -------------------------------------------------------------------------
    /// fsync the scratch file before it replaces the original
    pub sync_on_save: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./config.ini"),
            temp_suffix: ".tmp".to_string(),
            sync_on_save: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the sibling scratch file written during save
    pub fn scratch_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(&self.temp_suffix);
        PathBuf::from(name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the configuration file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the scratch file suffix
    pub fn temp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.temp_suffix = suffix.into();
        self
    }

    /// Enable or disable fsync of the scratch file
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
