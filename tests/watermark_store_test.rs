//! Integration tests for the file watermark store
//!
//! The state file is the only thing that survives between runs; these tests
//! check its on-disk format and that bad state is never read as "no state".

use almanac::core::state::{FileWatermarkStore, StateManager, Watermark, WatermarkStore};
use almanac::domain::{StorageError, UtcDay};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;

fn day(s: &str) -> UtcDay {
    UtcDay::from_str(s).unwrap()
}

#[tokio::test]
async fn test_state_file_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let store = FileWatermarkStore::new(&path);

    store.save(&Watermark::new(day("2024-03-12"))).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["last_exported_day"], "2024-03-12");
    assert_eq!(json["days_exported_count"], 0);
    assert!(json["updated_at"].is_string());
}

#[tokio::test]
async fn test_state_survives_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let manager = StateManager::new(Arc::new(FileWatermarkStore::new(&path)));
    let w1 = manager.checkpoint_day(None, day("2024-03-11")).await.unwrap();
    manager.checkpoint_day(Some(&w1), day("2024-03-12")).await.unwrap();

    let reopened = StateManager::new(Arc::new(FileWatermarkStore::new(&path)));
    let watermark = reopened.load_watermark().await.unwrap().unwrap();
    assert_eq!(watermark.last_exported_day, day("2024-03-12"));
    assert_eq!(watermark.days_exported_count, 2);
    assert!(!path.with_file_name("state.json.tmp").exists());
}

#[test_case(""; "empty file")]
#[test_case("not json"; "garbage")]
#[test_case(r#"{"version":1,"last_exported_day":"2024-02-30","updated_at":"2024-03-01T00:00:00Z"}"#; "impossible date")]
#[test_case(r#"{"version":7,"last_exported_day":"2024-03-01","updated_at":"2024-03-01T00:00:00Z"}"#; "unknown version")]
#[test_case(r#"{"version":1,"updated_at":"2024-03-01T00:00:00Z"}"#; "missing day")]
#[tokio::test]
async fn test_bad_state_is_an_error(contents: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, contents).unwrap();

    let result = FileWatermarkStore::new(&path).load().await;
    assert!(matches!(result, Err(StorageError::Corrupt { .. })));
}

#[tokio::test]
async fn test_unwritable_location_is_write_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();

    let store = FileWatermarkStore::new(blocker.join("state.json"));
    let result = store.save(&Watermark::new(day("2024-03-12"))).await;
    assert!(matches!(result, Err(StorageError::WriteFailed { .. })));
}
