//! Tests for Engine::load
//!
//! These tests verify:
//! - Parsing sections and key/value pairs into the loaded tier
//! - The implicit "none" section
//! - Tolerance of comments, blanks and malformed lines
//! - Reload semantics (no merging between loads)
//! - Missing files and aborted loads
//! - File-loaded notifications

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inistore::config::Config;
use inistore::engine::{Engine, LoadStatus};
use inistore::store::SectionMap;
use inistore::IniError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine(contents: &str) -> (TempDir, PathBuf, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("system.ini");
    fs::write(&path, contents).unwrap();

    let config = Config::builder().path(&path).sync_on_save(false).build();
    let engine = Engine::open(config);
    (temp_dir, path, engine)
}

fn section_map(sections: &[(&str, &[(&str, &str)])]) -> SectionMap {
    sections
        .iter()
        .map(|(name, pairs)| {
            let entries: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (name.to_string(), entries)
        })
        .collect()
}

fn count_loaded(engine: &Engine) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    engine.on_file_loaded(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

// =============================================================================
// Basic Parsing Tests
// =============================================================================

#[test]
fn test_load_scenario_file() {
    let (_temp, _path, engine) = setup_engine(
        "[Network]\n\
         ip = 192.168.1.1\n\
         [Timeouts]\n\
         connect = 30s\n",
    );

    let status = engine.load().unwrap();

    assert_eq!(
        status,
        LoadStatus::Loaded {
            sections: 3,
            entries: 2
        }
    );
    assert_eq!(
        engine.store().all_loaded(),
        section_map(&[
            ("none", &[]),
            ("Network", &[("ip", "192.168.1.1")]),
            ("Timeouts", &[("connect", "30s")]),
        ])
    );
    assert_eq!(engine.get_value("Timeouts", "connect").unwrap(), "30s");
}

#[test]
fn test_load_keys_before_first_header() {
    let (_temp, _path, engine) = setup_engine(
        "device = lobby\n\
         [Audio]\n\
         volume = 10\n",
    );

    engine.load().unwrap();

    assert_eq!(engine.get_value("none", "device").unwrap(), "lobby");
    assert_eq!(engine.get_value("Audio", "volume").unwrap(), "10");
}

#[test]
fn test_load_file_without_headers() {
    let (_temp, _path, engine) = setup_engine("a = 1\nb = 2\n");

    let status = engine.load().unwrap();

    assert_eq!(
        status,
        LoadStatus::Loaded {
            sections: 1,
            entries: 2
        }
    );
    assert_eq!(engine.get_value("none", "b").unwrap(), "2");
}

#[test]
fn test_load_empty_file() {
    let (_temp, _path, engine) = setup_engine("");

    engine.load().unwrap();

    assert_eq!(engine.store().all_loaded(), section_map(&[("none", &[])]));
}

#[test]
fn test_load_trims_keys_values_and_section_names() {
    let (_temp, _path, engine) = setup_engine(
        "[ Main Zone ]\n\
         \t  source   =   HDMI 1   ; input\n",
    );

    engine.load().unwrap();

    assert_eq!(engine.get_value("Main Zone", "source").unwrap(), "HDMI 1");
}

#[test]
fn test_load_strips_inline_comments() {
    let (_temp, _path, engine) = setup_engine("[Audio]\nvolume = 10 ; default level\n");

    engine.load().unwrap();

    assert_eq!(engine.get_value("Audio", "volume").unwrap(), "10");
}

#[test]
fn test_load_value_with_equals() {
    let (_temp, _path, engine) = setup_engine("[Web]\nurl = http://host/?a=b\n");

    engine.load().unwrap();

    assert_eq!(engine.get_value("Web", "url").unwrap(), "http://host/?a=b");
}

#[test]
fn test_load_empty_value() {
    let (_temp, _path, engine) = setup_engine("[Web]\nproxy =\n");

    engine.load().unwrap();

    assert_eq!(engine.get_value("Web", "proxy").unwrap(), "");
}

#[test]
fn test_load_duplicate_key_last_wins() {
    let (_temp, _path, engine) = setup_engine(
        "[Audio]\n\
         volume = 10\n\
         volume = 20\n",
    );

    let status = engine.load().unwrap();

    assert_eq!(engine.get_value("Audio", "volume").unwrap(), "20");
    assert_eq!(
        status,
        LoadStatus::Loaded {
            sections: 2,
            entries: 1
        }
    );
}

#[test]
fn test_load_ignores_comments_blanks_and_malformed_lines() {
    let (_temp, _path, engine) = setup_engine(
        "; header comment\n\
         \n\
         [Audio]\n\
         ; volume = 99\n\
         this line has no separator\n\
         [bad-header]\n\
         volume = 10\n",
    );

    engine.load().unwrap();

    assert_eq!(
        engine.store().all_loaded(),
        section_map(&[("none", &[]), ("Audio", &[("volume", "10")])])
    );
}

#[test]
fn test_load_header_with_trailing_comment() {
    let (_temp, _path, engine) = setup_engine("[Net] ; mode=dhcp\nip = 1.2.3.4\n");

    engine.load().unwrap();

    assert_eq!(engine.get_value("Net", "ip").unwrap(), "1.2.3.4");
    assert!(matches!(
        engine.get_value("none", "[Net] ; mode"),
        Err(IniError::MissingKey { .. })
    ));
}

#[test]
fn test_load_crlf_file() {
    let (_temp, _path, engine) = setup_engine("[Audio]\r\nvolume = 10\r\nmute = 0\r\n");

    engine.load().unwrap();

    assert_eq!(engine.get_value("Audio", "volume").unwrap(), "10");
    assert_eq!(engine.get_value("Audio", "mute").unwrap(), "0");
}

// =============================================================================
// Reload Tests
// =============================================================================

#[test]
fn test_reload_replaces_previous_contents() {
    let (_temp, path, engine) = setup_engine("[Old]\nkey = 1\n");
    engine.load().unwrap();
    assert!(engine.store().contains_section("Old"));

    fs::write(&path, "[New]\nkey = 2\n").unwrap();
    engine.load().unwrap();

    assert!(!engine.store().contains_section("Old"));
    assert_eq!(engine.get_value("New", "key").unwrap(), "2");
}

#[test]
fn test_load_twice_same_file() {
    let (_temp, _path, engine) = setup_engine("[A]\nx = 1\n");

    engine.load().unwrap();
    engine.load().unwrap();

    assert_eq!(engine.store().section_count(), 2);
}

#[test]
fn test_load_discards_pending_changes() {
    let (_temp, _path, engine) = setup_engine("[A]\nx = 1\n");
    engine.load().unwrap();
    engine.stage("A", "x", "2");

    engine.load().unwrap();

    assert_eq!(engine.store().get_pending_value("A", "x"), None);
}

// =============================================================================
// Missing File / Failure Tests
// =============================================================================

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path().join("absent.ini"));
    let loaded = count_loaded(&engine);

    let status = engine.load().unwrap();

    assert_eq!(status, LoadStatus::NotFound);
    assert_eq!(engine.store().section_count(), 0);
    assert_eq!(loaded.load(Ordering::SeqCst), 0);
}

#[test]
fn test_load_missing_file_still_clears_store() {
    let (_temp, path, engine) = setup_engine("[A]\nx = 1\n");
    engine.load().unwrap();

    fs::remove_file(&path).unwrap();
    let status = engine.load().unwrap();

    assert_eq!(status, LoadStatus::NotFound);
    assert_eq!(engine.store().section_count(), 0);
}

#[test]
fn test_load_duplicate_section_aborts() {
    let (_temp, _path, engine) = setup_engine(
        "[A]\n\
         x = 1\n\
         [B]\n\
         y = 2\n\
         [A]\n\
         z = 3\n",
    );
    let loaded = count_loaded(&engine);

    let result = engine.load();

    assert!(matches!(result, Err(IniError::DuplicateSection(name)) if name == "A"));
    // Sections committed before the failure remain
    assert_eq!(engine.get_value("A", "x").unwrap(), "1");
    assert_eq!(engine.get_value("B", "y").unwrap(), "2");
    assert_eq!(loaded.load(Ordering::SeqCst), 0);
}

#[test]
fn test_load_explicit_none_header_conflicts_with_implicit_section() {
    let (_temp, _path, engine) = setup_engine("[none]\nx = 1\n");

    let result = engine.load();

    assert!(matches!(result, Err(IniError::DuplicateSection(name)) if name == "none"));
}

#[test]
fn test_load_tolerates_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("latin1.ini");
    fs::write(&path, b"; r\xe9glages\n[A]\nname = Z\xfcrich\ncity = Bern ; \xe9t\xe9\n").unwrap();
    let engine = Engine::open_path(&path);
    let loaded = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loaded);
    engine.on_file_loaded(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let status = engine.load().unwrap();

    assert_eq!(status, LoadStatus::Loaded { sections: 2, entries: 2 });
    assert_eq!(engine.get_value("A", "name").unwrap(), "Z\u{FFFD}rich");
    assert_eq!(engine.get_value("A", "city").unwrap(), "Bern");
    assert_eq!(loaded.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Notification Tests
// =============================================================================

#[test]
fn test_load_fires_file_loaded_once() {
    let (_temp, _path, engine) = setup_engine("[A]\nx = 1\n");
    let loaded = count_loaded(&engine);

    engine.load().unwrap();
    assert_eq!(loaded.load(Ordering::SeqCst), 1);

    engine.load().unwrap();
    assert_eq!(loaded.load(Ordering::SeqCst), 2);
}

#[test]
fn test_file_loaded_sees_populated_store() {
    let (_temp, _path, engine) = setup_engine("[A]\nx = 1\n");
    let store = Arc::clone(engine.store());
    let seen = Arc::new(parking_lot::Mutex::new(None));

    let slot = Arc::clone(&seen);
    engine.on_file_loaded(move || {
        *slot.lock() = store.get_value("A", "x").ok();
    });

    engine.load().unwrap();

    assert_eq!(*seen.lock(), Some("1".to_string()));
}

#[test]
fn test_shared_store_between_engines() {
    let (_temp, path, engine) = setup_engine("[A]\nx = 1\n");
    engine.load().unwrap();

    let other = Engine::with_store(Config::builder().path(&path).build(), Arc::clone(engine.store()));

    assert_eq!(other.get_value("A", "x").unwrap(), "1");
}
