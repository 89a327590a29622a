//! QA tests for persisted stores.
//!
//! These tests verify that saved items and memories survive a restart and
//! that damaged files degrade to empty stores.
//! Run with: `cargo test -p gift-core --test qa_persistence`

use std::fs;

use gift_core::capture::{capture_async, export_file_name, export_png};
use gift_core::store::{SAVED_ITEMS_KEY, MEMORIES_KEY};
use gift_core::{
    FailingRasterizer, FileStorage, GiftSession, HeadlessGift, ManualClock, MemoryPage,
    MemoryStorage, PngRasterizer, Screen, SessionConfig, SessionError, SessionEvent,
    StorageBackend, TestHarness,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn file_session(dir: &TempDir) -> GiftSession<FileStorage, ManualClock> {
    let config = SessionConfig::new(dir.path());
    GiftSession::new(
        FileStorage::new(dir.path()),
        ManualClock::new(1_700_000_000_000),
        &config,
    )
}

// =============================================================================
// TEST 1: Saves survive a reopen
// =============================================================================

#[test]
fn test_reload_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let (message, memory) = {
        let mut session = file_session(&temp_dir);
        let message = session
            .save_message(Screen::LoveMessage, "You are my favorite person")
            .expect("Failed to save message");
        let memory = session
            .record_memory(MemoryPage::HeartWall, "data:image/png;base64,AA==", "wall")
            .expect("Failed to record memory");
        (message, memory)
    };

    assert!(temp_dir.path().join(format!("{SAVED_ITEMS_KEY}.json")).exists());
    assert!(temp_dir.path().join(format!("{MEMORIES_KEY}.json")).exists());

    let reopened = file_session(&temp_dir);
    assert_eq!(reopened.saved_items().list(), vec![message]);
    assert_eq!(reopened.memories().list(), vec![memory]);
}

// =============================================================================
// TEST 2: Corrupt files read as empty and are replaced on the next save
// =============================================================================

#[test]
fn test_corrupt_file_reads_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp_dir.path().join(format!("{SAVED_ITEMS_KEY}.json")),
        "{ not json",
    )
    .unwrap();

    let mut session = file_session(&temp_dir);
    assert!(session.saved_items().is_empty());

    session.save_message(Screen::Song, "fresh start").unwrap();
    assert_eq!(session.saved_items().len(), 1);
}

// =============================================================================
// TEST 3: A list of the wrong shape also reads as empty
// =============================================================================

#[test]
fn test_wrong_shape_reads_empty() {
    let storage = MemoryStorage::new();
    storage.set(MEMORIES_KEY, r#"[{"id": 3}]"#).unwrap();
    let harness = TestHarness::with_storage(storage, SessionConfig::new("unused"));
    harness.assert_counts(0, 0);
}

// =============================================================================
// TEST 4: Quota failures surface as errors and keep existing data
// =============================================================================

#[test]
fn test_quota_failure_is_reported() {
    let storage = MemoryStorage::with_quota(512);
    let mut harness = TestHarness::with_storage(storage, SessionConfig::new("unused"));
    harness.session.save_message(Screen::LoveMessage, "small").unwrap();

    let huge = format!("data:image/png;base64,{}", "A".repeat(4_096));
    let result = harness.session.save_screenshot(Screen::LoveMessage, huge);
    assert!(matches!(result, Err(SessionError::Store(_))));
    harness.assert_counts(1, 0);
}

// =============================================================================
// TEST 5: The heart wall capture lands in the memory store on disk
// =============================================================================

#[test]
fn test_headless_play_persists_memory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    {
        let mut gift = HeadlessGift::from_session(file_session(&temp_dir), PngRasterizer::default());
        gift.go(Screen::PresentSelection).unwrap();
        gift.go(Screen::Letter).unwrap();
        let report = gift.play().unwrap();
        assert!(report.completed);
    }

    let reopened = file_session(&temp_dir);
    let memory = reopened
        .memories()
        .for_page(MemoryPage::HeartWall)
        .expect("heart wall memory should be stored");
    assert_eq!(memory.title, "💖 Heart Wall");
    assert!(memory.id.starts_with("heart-wall-"));
}

// =============================================================================
// TEST 6: A failing rasterizer still completes the wall and records nothing
// =============================================================================

#[test]
fn test_failed_capture_records_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut gift = HeadlessGift::from_session(file_session(&temp_dir), FailingRasterizer);
    gift.go(Screen::PresentSelection).unwrap();
    gift.go(Screen::Letter).unwrap();
    let report = gift.play().expect("a failed capture should not fail the run");
    assert!(report.completed);
    assert_eq!(report.placed, 24);
    assert!(report.captured);
    assert!(report.memory.is_none());
    assert!(gift.memories().is_empty());
}

// =============================================================================
// TEST 7: Async capture and export write a readable PNG
// =============================================================================

#[tokio::test]
async fn test_capture_and_export() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut harness = TestHarness::new();
    harness.open_letter();
    harness.session.start_letter().unwrap();
    let events = harness.run_for(Duration::from_secs(60), Duration::from_millis(500));

    let snapshot = events
        .into_iter()
        .find_map(|e| match e {
            SessionEvent::CaptureReady { snapshot, .. } => Some(snapshot),
            _ => None,
        })
        .expect("capture should be requested");

    let data_url = capture_async(Arc::new(PngRasterizer::default()), snapshot)
        .await
        .expect("capture should succeed");
    let saved = harness
        .session
        .save_screenshot(Screen::Letter, data_url.clone())
        .unwrap();

    let path = export_png(
        temp_dir.path(),
        &export_file_name("letter", saved.timestamp),
        &data_url,
    )
    .unwrap();
    assert!(path.ends_with(format!("anime-gift-letter-{}.png", saved.timestamp)));
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
