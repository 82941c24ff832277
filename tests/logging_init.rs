//! Integration test for logging initialization
//!
//! The rolling file layer writes through a background worker owned by the
//! guard `init_logging` returns; this checks a line actually reaches the
//! file while the guard is held.

use std::fs;

use sigo::config::LoggingConfig;
use sigo::utils::logging::init_logging;

#[test]
fn file_layer_writes_while_guard_is_held() {
    let dir = std::env::temp_dir().join(format!("sigo-logging-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let config = LoggingConfig {
        level: "info".to_string(),
        file_path: dir.to_string_lossy().into_owned(),
        max_file_size: "10MB".to_string(),
        max_files: 5,
    };

    let guard = init_logging(&config).unwrap();
    tracing::info!("rolling file smoke line");
    // Dropping the guard flushes and stops the background writer
    drop(guard);

    let wrote = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            fs::read_to_string(entry.path())
                .map(|contents| contents.contains("rolling file smoke line"))
                .unwrap_or(false)
        });
    fs::remove_dir_all(&dir).ok();

    assert!(wrote, "expected the rolling log file to contain the line");
}
