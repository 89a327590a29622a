//! Capped, persisted memory stores.
//!
//! Two independent lists share one shape and eviction rule: newest first,
//! truncated to a fixed cap on every save.
//!
//! - **Saved items** (cap 50): screenshots and messages the recipient chose
//!   to keep. Pure ring buffer.
//! - **Photo memories** (cap 10): automatic captures, at most one per page;
//!   saving a page's memory replaces the previous one.
//!
//! Reads never fail: unreadable or corrupt state is treated as empty. Writes
//! report failure through [`StoreError`] so the caller can show a notice.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;
use crate::screen::Screen;
use crate::storage::{StorageBackend, StorageError};

/// Storage key of the saved-items list.
pub const SAVED_ITEMS_KEY: &str = "anime-gift-saved-items";

/// Storage key of the photo-memories list.
pub const MEMORIES_KEY: &str = "anime-gift-memories";

/// Maximum number of saved items kept.
pub const SAVED_ITEMS_CAP: usize = 50;

/// Maximum number of photo memories kept.
pub const MEMORIES_CAP: usize = 10;

/// Errors from store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Eviction and dedup rules of one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    pub key: &'static str,
    pub cap: usize,
    /// Keep at most one entry per page.
    pub dedup_by_page: bool,
}

impl StorePolicy {
    pub const SAVED_ITEMS: StorePolicy = StorePolicy {
        key: SAVED_ITEMS_KEY,
        cap: SAVED_ITEMS_CAP,
        dedup_by_page: false,
    };

    pub const MEMORIES: StorePolicy = StorePolicy {
        key: MEMORIES_KEY,
        cap: MEMORIES_CAP,
        dedup_by_page: true,
    };
}

/// A persisted entry with a generated id and timestamp.
pub trait StoreEntry: Clone + Serialize + DeserializeOwned {
    /// The caller-supplied part of an entry.
    type Draft;
    /// The page an entry belongs to.
    type Page: Copy + PartialEq + fmt::Display;

    fn id(&self) -> &str;
    fn timestamp(&self) -> i64;
    fn page(&self) -> Self::Page;
    fn draft_page(draft: &Self::Draft) -> Self::Page;
    fn make_id(draft: &Self::Draft, timestamp: i64) -> String;
    fn from_draft(draft: Self::Draft, id: String, timestamp: i64) -> Self;
}

// =============================================================================
// Saved items
// =============================================================================

/// Kind of a saved item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavedKind {
    Screenshot,
    Message,
}

/// A screenshot or message the recipient chose to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SavedKind,
    /// PNG data URL for screenshots, the text for messages.
    pub data: String,
    pub timestamp: i64,
    pub page_id: Screen,
}

/// A saved item before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedItemDraft {
    pub kind: SavedKind,
    pub data: String,
    pub page_id: Screen,
}

impl SavedItemDraft {
    pub fn message(page_id: Screen, text: impl Into<String>) -> Self {
        Self {
            kind: SavedKind::Message,
            data: text.into(),
            page_id,
        }
    }

    pub fn screenshot(page_id: Screen, data_url: impl Into<String>) -> Self {
        Self {
            kind: SavedKind::Screenshot,
            data: data_url.into(),
            page_id,
        }
    }
}

impl StoreEntry for SavedItem {
    type Draft = SavedItemDraft;
    type Page = Screen;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn page(&self) -> Screen {
        self.page_id
    }

    fn draft_page(draft: &SavedItemDraft) -> Screen {
        draft.page_id
    }

    fn make_id(_draft: &SavedItemDraft, timestamp: i64) -> String {
        timestamp.to_string()
    }

    fn from_draft(draft: SavedItemDraft, id: String, timestamp: i64) -> Self {
        Self {
            id,
            kind: draft.kind,
            data: draft.data,
            timestamp,
            page_id: draft.page_id,
        }
    }
}

/// Gallery filter over saved items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Screenshots,
    Messages,
}

impl ItemFilter {
    pub const ALL: [ItemFilter; 3] = [ItemFilter::All, ItemFilter::Screenshots, ItemFilter::Messages];

    pub fn matches(self, item: &SavedItem) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Screenshots => item.kind == SavedKind::Screenshot,
            ItemFilter::Messages => item.kind == SavedKind::Message,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemFilter::All => "All",
            ItemFilter::Screenshots => "Pictures",
            ItemFilter::Messages => "Messages",
        }
    }

    /// The next tab, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ItemFilter::All => ItemFilter::Screenshots,
            ItemFilter::Screenshots => ItemFilter::Messages,
            ItemFilter::Messages => ItemFilter::All,
        }
    }
}

// =============================================================================
// Photo memories
// =============================================================================

/// Pages that record automatic photo memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryPage {
    Song,
    Letter,
    HeartWall,
    LoveMessage,
    Pictures,
}

impl MemoryPage {
    pub fn id(self) -> &'static str {
        match self {
            MemoryPage::Song => "song",
            MemoryPage::Letter => "letter",
            MemoryPage::HeartWall => "heart-wall",
            MemoryPage::LoveMessage => "love-message",
            MemoryPage::Pictures => "pictures",
        }
    }

    /// Caption used for automatic captures.
    pub fn default_title(self) -> &'static str {
        match self {
            MemoryPage::Song => "🎵 Our Song",
            MemoryPage::Letter => "💌 The Letter",
            MemoryPage::HeartWall => "💖 Heart Wall",
            MemoryPage::LoveMessage => "💕 Love Message",
            MemoryPage::Pictures => "📸 I Love You",
        }
    }
}

impl fmt::Display for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// An automatic capture of a finished page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMemory {
    pub id: String,
    pub page_id: MemoryPage,
    pub data_url: String,
    pub timestamp: i64,
    pub title: String,
}

/// A photo memory before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMemoryDraft {
    pub page_id: MemoryPage,
    pub data_url: String,
    pub title: String,
}

impl PhotoMemoryDraft {
    pub fn new(page_id: MemoryPage, data_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            page_id,
            data_url: data_url.into(),
            title: title.into(),
        }
    }
}

impl StoreEntry for PhotoMemory {
    type Draft = PhotoMemoryDraft;
    type Page = MemoryPage;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn page(&self) -> MemoryPage {
        self.page_id
    }

    fn draft_page(draft: &PhotoMemoryDraft) -> MemoryPage {
        draft.page_id
    }

    fn make_id(draft: &PhotoMemoryDraft, timestamp: i64) -> String {
        format!("{}-{timestamp}", draft.page_id)
    }

    fn from_draft(draft: PhotoMemoryDraft, id: String, timestamp: i64) -> Self {
        Self {
            id,
            page_id: draft.page_id,
            data_url: draft.data_url,
            timestamp,
            title: draft.title,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// A newest-first list persisted under one storage key.
pub struct CappedStore<E, S, C> {
    storage: S,
    clock: C,
    policy: StorePolicy,
    last_issued: i64,
    _entry: PhantomData<fn() -> E>,
}

/// The saved-items store.
pub type SavedItems<S, C> = CappedStore<SavedItem, S, C>;

/// The photo-memories store.
pub type PhotoMemories<S, C> = CappedStore<PhotoMemory, S, C>;

impl<S: StorageBackend, C: Clock> CappedStore<SavedItem, S, C> {
    pub fn saved_items(storage: S, clock: C) -> Self {
        Self::with_policy(storage, clock, StorePolicy::SAVED_ITEMS)
    }

    /// Items matching a gallery filter, newest first.
    pub fn filtered(&self, filter: ItemFilter) -> Vec<SavedItem> {
        self.list()
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect()
    }
}

impl<S: StorageBackend, C: Clock> CappedStore<PhotoMemory, S, C> {
    pub fn photo_memories(storage: S, clock: C) -> Self {
        Self::with_policy(storage, clock, StorePolicy::MEMORIES)
    }

    /// The memory recorded for `page`, if any.
    pub fn for_page(&self, page: MemoryPage) -> Option<PhotoMemory> {
        self.list().into_iter().find(|m| m.page_id == page)
    }
}

impl<E: StoreEntry, S: StorageBackend, C: Clock> CappedStore<E, S, C> {
    pub fn with_policy(storage: S, clock: C, policy: StorePolicy) -> Self {
        Self {
            storage,
            clock,
            policy,
            last_issued: i64::MIN,
            _entry: PhantomData,
        }
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current entries, newest first. Any read or parse failure yields an
    /// empty list.
    pub fn list(&self) -> Vec<E> {
        let raw = match self.storage.get(self.policy.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = self.policy.key, error = %e, "store read failed, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key = self.policy.key, error = %e, "corrupt store, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<E> {
        self.list().into_iter().find(|e| e.id() == id)
    }

    /// Store a new entry at the front of the list.
    ///
    /// The timestamp is the clock's time, bumped past the newest stored and
    /// last issued timestamps so ids stay unique and the list stays strictly
    /// ordered even if the clock repeats.
    pub fn save(&mut self, draft: E::Draft) -> Result<E, StoreError> {
        let mut entries = self.list();

        let newest = entries.first().map(|e| e.timestamp()).unwrap_or(i64::MIN);
        let timestamp = self
            .clock
            .now_ms()
            .max(newest.saturating_add(1))
            .max(self.last_issued.saturating_add(1));

        let page = E::draft_page(&draft);
        let id = E::make_id(&draft, timestamp);
        let entry = E::from_draft(draft, id, timestamp);

        if self.policy.dedup_by_page {
            entries.retain(|e| e.page() != page);
        }
        entries.insert(0, entry.clone());
        entries.truncate(self.policy.cap);

        self.write(&entries)?;
        self.last_issued = timestamp;
        tracing::info!(key = self.policy.key, id = entry.id(), %page, count = entries.len(), "saved entry");
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns whether one was removed and the
    /// result persisted.
    pub fn delete(&mut self, id: &str) -> bool {
        let mut entries = self.list();
        let Some(index) = entries.iter().position(|e| e.id() == id) else {
            return false;
        };
        entries.remove(index);

        match self.write(&entries) {
            Ok(()) => {
                tracing::info!(key = self.policy.key, id, "deleted entry");
                true
            }
            Err(e) => {
                tracing::warn!(key = self.policy.key, id, error = %e, "delete failed");
                false
            }
        }
    }

    /// Wipe the store.
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(self.policy.key) {
            tracing::warn!(key = self.policy.key, error = %e, "clear failed");
        }
    }

    fn write(&self, entries: &[E]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)?;
        self.storage.set(self.policy.key, &json)?;
        Ok(())
    }
}
