//! QA tests for the capped memory stores.
//!
//! Covers eviction at the cap, per-page dedup, deletion and clearing.
//! Run with: `cargo test -p gift-core --test qa_memory_store`

use gift_core::store::{
    CappedStore, PhotoMemory, PhotoMemoryDraft, SavedItemDraft, StorePolicy, MEMORIES_CAP,
    SAVED_ITEMS_CAP,
};
use gift_core::{ManualClock, MemoryPage, MemoryStorage, Screen, StorageBackend};

fn clock() -> ManualClock {
    ManualClock::new(1_700_000_000_000)
}

// =============================================================================
// TEST 1: Saved items evict the oldest past the cap
// =============================================================================

#[test]
fn test_saved_items_cap() {
    let clock = clock();
    let mut store = CappedStore::saved_items(MemoryStorage::new(), clock.clone());

    let mut first_id = String::new();
    for i in 0..=SAVED_ITEMS_CAP {
        let item = store
            .save(SavedItemDraft::message(Screen::LoveMessage, format!("note {i}")))
            .expect("save should succeed");
        if i == 0 {
            first_id = item.id;
        }
        clock.advance(5);
    }

    let list = store.list();
    assert_eq!(list.len(), 50);
    assert_eq!(list[0].data, "note 50");
    assert_eq!(list[49].data, "note 1");
    assert!(store.get(&first_id).is_none(), "oldest item should be evicted");
}

// =============================================================================
// TEST 2: Saved items keep duplicates for the same page
// =============================================================================

#[test]
fn test_saved_items_no_page_dedup() {
    let clock = clock();
    let mut store = CappedStore::saved_items(MemoryStorage::new(), clock.clone());
    store
        .save(SavedItemDraft::screenshot(Screen::Song, "data:a"))
        .unwrap();
    clock.advance(1);
    store
        .save(SavedItemDraft::screenshot(Screen::Song, "data:b"))
        .unwrap();
    assert_eq!(store.len(), 2);
}

// =============================================================================
// TEST 3: Memories keep one entry per page
// =============================================================================

#[test]
fn test_memories_dedup_by_page() {
    let clock = clock();
    let mut store = CappedStore::photo_memories(MemoryStorage::new(), clock.clone());

    let first = store
        .save(PhotoMemoryDraft::new(MemoryPage::HeartWall, "data:1", "wall"))
        .unwrap();
    clock.advance(100);
    store
        .save(PhotoMemoryDraft::new(MemoryPage::Song, "data:2", "song"))
        .unwrap();
    clock.advance(100);
    let second = store
        .save(PhotoMemoryDraft::new(MemoryPage::HeartWall, "data:3", "wall again"))
        .unwrap();

    let list = store.list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, second.id);
    assert_eq!(list[1].page_id, MemoryPage::Song);
    assert!(store.get(&first.id).is_none());
    assert_eq!(
        store.for_page(MemoryPage::HeartWall).map(|m| m.data_url),
        Some("data:3".to_string())
    );
}

// =============================================================================
// TEST 4: Memories are capped at ten
// =============================================================================

#[test]
fn test_memories_cap() {
    let clock = clock();
    // Only five pages exist, so lift the dedup to reach the cap
    let policy = StorePolicy {
        dedup_by_page: false,
        ..StorePolicy::MEMORIES
    };
    let mut store: CappedStore<PhotoMemory, _, _> =
        CappedStore::with_policy(MemoryStorage::new(), clock.clone(), policy);
    for i in 0..11 {
        store
            .save(PhotoMemoryDraft::new(MemoryPage::Song, format!("data:{i}"), "t"))
            .unwrap();
        clock.advance(1);
    }
    let list = store.list();
    assert_eq!(list.len(), MEMORIES_CAP);
    assert_eq!(list[0].data_url, "data:10");
    assert_eq!(list[9].data_url, "data:1");
}

#[test]
fn test_memories_one_per_page_across_rounds() {
    let clock = clock();
    let mut store = CappedStore::photo_memories(MemoryStorage::new(), clock.clone());
    let pages = [
        MemoryPage::Song,
        MemoryPage::Letter,
        MemoryPage::HeartWall,
        MemoryPage::LoveMessage,
        MemoryPage::Pictures,
    ];
    for _ in 0..4 {
        for page in pages {
            store.save(PhotoMemoryDraft::new(page, "data:x", "t")).unwrap();
            clock.advance(1);
        }
    }
    assert_eq!(store.len(), pages.len());
    assert_eq!(store.list()[0].page_id, MemoryPage::Pictures);
}

// =============================================================================
// TEST 5: Delete reports whether anything was removed
// =============================================================================

#[test]
fn test_delete() {
    let mut store = CappedStore::saved_items(MemoryStorage::new(), clock());
    let item = store
        .save(SavedItemDraft::message(Screen::LoveMessage, "keep me"))
        .unwrap();

    assert!(!store.delete("does-not-exist"));
    assert_eq!(store.len(), 1);
    assert!(store.delete(&item.id));
    assert!(store.is_empty());
    assert!(!store.delete(&item.id));
}

// =============================================================================
// TEST 6: Clear removes the key entirely
// =============================================================================

#[test]
fn test_clear() {
    let storage = MemoryStorage::new();
    let mut store = CappedStore::saved_items(storage.clone(), clock());
    store
        .save(SavedItemDraft::message(Screen::Home, "x"))
        .unwrap();
    store.clear();
    assert!(store.is_empty());
    assert_eq!(storage.get("anime-gift-saved-items").unwrap(), None);
}

// =============================================================================
// TEST 7: The two stores never touch each other's key
// =============================================================================

#[test]
fn test_stores_are_independent() {
    let storage = MemoryStorage::new();
    let clock = clock();
    let mut saved = CappedStore::saved_items(storage.clone(), clock.clone());
    let mut memories = CappedStore::photo_memories(storage.clone(), clock);

    saved
        .save(SavedItemDraft::message(Screen::LoveMessage, "m"))
        .unwrap();
    memories
        .save(PhotoMemoryDraft::new(MemoryPage::Letter, "data:l", "letter"))
        .unwrap();
    saved.clear();

    assert!(saved.is_empty());
    assert_eq!(memories.len(), 1);
}

// =============================================================================
// TEST 8: Timestamps stay strictly decreasing down the list
// =============================================================================

#[test]
fn test_ordering_with_frozen_clock() {
    let mut store = CappedStore::saved_items(MemoryStorage::new(), clock());
    for i in 0..20 {
        store
            .save(SavedItemDraft::message(Screen::Song, i.to_string()))
            .unwrap();
    }
    let list = store.list();
    assert!(list.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

    let mut ids: Vec<_> = list.iter().map(|i| i.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

// =============================================================================
// TEST 9: A clock that goes backwards does not reorder the list
// =============================================================================

#[test]
fn test_clock_going_backwards() {
    let clock = clock();
    let mut store = CappedStore::saved_items(MemoryStorage::new(), clock.clone());
    let a = store
        .save(SavedItemDraft::message(Screen::Song, "a"))
        .unwrap();
    clock.set(1_000);
    let b = store
        .save(SavedItemDraft::message(Screen::Song, "b"))
        .unwrap();
    assert!(b.timestamp > a.timestamp);
    assert_eq!(store.list()[0].id, b.id);
}
