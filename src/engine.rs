//! Engine Module
//!
//! Coordinates file I/O around the Store.
//!
//! ## Responsibilities
//! - Parse the configuration file into the loaded tier
//! - Rewrite the file with the pending tier, preserving everything else
//! - Swap the rewritten scratch file into place
//! - Fire the file-loaded notification

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{IniError, Result};
use crate::parser::{classify, Line, LineReader, RawLine, IMPLICIT_SECTION};
use crate::store::{Entries, SectionMap, Store};

/// Outcome of a successful `load()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was parsed into the store
    Loaded { sections: usize, entries: usize },

    /// No file at the configured path; the store is empty
    NotFound,
}

/// Outcome of a successful `save()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Lines written to the new file
    pub lines: usize,

    /// Lines whose value was replaced
    pub replaced: usize,
}

/// The configuration engine
///
/// ## Concurrency Model
///
/// - **Store**: shared via `Arc`, internally locked; adapters may stage
///   edits at any time
/// - **File passes** (load/save): serialized by `io_lock`
///   - Only ONE pass touches the file at a time
///   - Save works from a single snapshot of the pending tier
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Loaded and pending values
    store: Arc<Store>,

    /// Serializes load and save
    io_lock: Mutex<()>,
}

impl Engine {
    /// Open an engine with a fresh store
    pub fn open(config: Config) -> Self {
        Self::with_store(config, Arc::new(Store::new()))
    }

    /// Create an engine around an existing store
    pub fn with_store(config: Config, store: Arc<Store>) -> Self {
        Self {
            config,
            store,
            io_lock: Mutex::new(()),
        }
    }

    /// Open with default config for `path`
    pub fn open_path(path: impl Into<PathBuf>) -> Self {
        Self::open(Config::builder().path(path).build())
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Parse the file into the store.
    ///
    /// Steps:
    /// 1. Clear both tiers
    /// 2. Return `NotFound` if there is no file
    /// 3. Parse line by line, committing each section as the next header
    ///    is reached
    /// 4. Commit the last section and notify subscribers
    ///
    /// On error the store keeps whatever sections were committed before the
    /// failure, and subscribers are not notified.
    pub fn load(&self) -> Result<LoadStatus> {
        let status = {
            let _io_guard = self.io_lock.lock();
            let path = &self.config.path;

            self.store.clear();
            tracing::info!("Configuration file read at {}", path.display());

            if !path.exists() {
                tracing::warn!("Configuration file does not exist: {}", path.display());
                return Ok(LoadStatus::NotFound);
            }

            match self.load_internal(path) {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!("Failed to load {}: {}", path.display(), e);
                    return Err(e);
                }
            }
        };

        if let LoadStatus::Loaded { sections, entries } = status {
            tracing::info!(
                "Configuration file loaded: {} sections, {} entries",
                sections,
                entries
            );
        }

        self.store.notify_file_loaded();
        Ok(status)
    }

    /// Internal load (called with io_lock held)
    fn load_internal(&self, path: &Path) -> Result<LoadStatus> {
        let reader = BufReader::new(File::open(path)?);

        let mut section_name = IMPLICIT_SECTION.to_string();
        let mut entries = Entries::new();
        let mut section_count = 0;
        let mut entry_count = 0;

        for raw in LineReader::new(reader) {
            let raw = raw?;
            match classify(&raw.text) {
                Line::KeyValue(kv) => {
                    entries.insert(kv.key().to_string(), kv.value().to_string());
                }
                Line::Header(name) => {
                    let next = name.trim().to_string();
                    let finished = mem::take(&mut entries);
                    entry_count += finished.len();
                    self.store
                        .add_section(mem::replace(&mut section_name, next), finished)?;
                    section_count += 1;
                }
                Line::Other => {}
            }
        }

        entry_count += entries.len();
        self.store.add_section(section_name, entries)?;
        section_count += 1;

        Ok(LoadStatus::Loaded {
            sections: section_count,
            entries: entry_count,
        })
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Write the pending tier back into the file.
    ///
    /// Only values of keys that already exist in the file are replaced;
    /// staged keys with no matching line are dropped. The loaded tier is
    /// not updated, so call `load()` to see the saved values.
    ///
    /// If writing the scratch file fails, it is removed and the original is
    /// left untouched. The original is deleted before the scratch file is
    /// renamed over it; a crash between those two steps leaves only
    /// `<path><temp_suffix>`.
    pub fn save(&self) -> Result<SaveReport> {
        let _io_guard = self.io_lock.lock();
        let path = &self.config.path;

        tracing::info!("Saving modified configuration at {}", path.display());

        match self.save_internal(path) {
            Ok(report) => {
                tracing::info!(
                    "Configuration file written: {} lines, {} values replaced",
                    report.lines,
                    report.replaced
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Internal save (called with io_lock held)
    fn save_internal(&self, path: &Path) -> Result<SaveReport> {
        if !path.exists() {
            return Err(IniError::FileNotFound(path.to_path_buf()));
        }

        let scratch = self.config.scratch_path();
        let pending = self.store.all_pending();

        let report = match self.write_scratch(path, &scratch, &pending) {
            Ok(report) => report,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&scratch) {
                    if cleanup.kind() != ErrorKind::NotFound {
                        tracing::warn!(
                            "Failed to remove scratch file {}: {}",
                            scratch.display(),
                            cleanup
                        );
                    }
                }
                return Err(e);
            }
        };

        fs::remove_file(path)?;
        fs::rename(&scratch, path)?;

        Ok(report)
    }

    /// Stream the rewritten file into `scratch` and flush it to disk
    fn write_scratch(&self, path: &Path, scratch: &Path, pending: &SectionMap) -> Result<SaveReport> {
        let reader = BufReader::new(File::open(path)?);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(scratch)?;
        let mut writer = BufWriter::new(file);

        let mut report = SaveReport::default();
        let mut section_name = IMPLICIT_SECTION.to_string();

        for raw in LineReader::new(reader) {
            let raw = raw?;
            let line = rewrite_line(&raw, &mut section_name, pending, &mut report);
            writer.write_all(&line)?;
            writer.write_all(raw.terminator.as_bytes())?;
            report.lines += 1;
        }

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.config.sync_on_save {
            file.sync_all()?;
        }

        Ok(report)
    }

    // =========================================================================
    // Store Passthroughs
    // =========================================================================

    /// Look up a loaded value
    pub fn get_value(&self, section: &str, key: &str) -> Result<String> {
        self.store.get_value(section, key)
    }

    /// Stage a change for the next save
    pub fn stage(&self, section: &str, key: &str, value: impl Into<String>) {
        self.store.stage(section, key, value);
    }

    /// Subscribe to "file finished loading"
    pub fn on_file_loaded<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.on_file_loaded(callback);
    }

    /// Subscribe to "a change was staged"
    pub fn on_dirty<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.on_dirty(callback);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The shared store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// The configuration file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Decide what one line of the original becomes in the rewritten file.
///
/// Header lines update `section_name` with the untrimmed name. Lines that
/// are not replaced come back as their original bytes.
fn rewrite_line<'a>(
    raw: &'a RawLine,
    section_name: &mut String,
    pending: &SectionMap,
    report: &mut SaveReport,
) -> Cow<'a, [u8]> {
    let kv = match classify(&raw.text) {
        Line::Header(name) => {
            section_name.clear();
            section_name.push_str(name);
            return Cow::Borrowed(raw.bytes.as_slice());
        }
        Line::KeyValue(kv) => kv,
        Line::Other => return Cow::Borrowed(raw.bytes.as_slice()),
    };

    let Some(changes) = pending.get(section_name.as_str()) else {
        return Cow::Borrowed(raw.bytes.as_slice());
    };

    match changes.get(kv.key_raw()) {
        Some(new_value) => {
            tracing::debug!(
                "Replacing {}->{}: {:?} -> {:?}",
                section_name,
                kv.key_raw(),
                kv.value_raw(),
                new_value
            );
            report.replaced += 1;
            Cow::Owned(raw.splice(kv.value_span(), &kv.padded_value(new_value)))
        }
        None => Cow::Borrowed(raw.bytes.as_slice()),
    }
}
