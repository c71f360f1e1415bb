//! Persistence port for reading progress.
//!
//! Markers are handed to the store as plain integers under a caller-supplied
//! document id. How ids are derived and where values end up is up to the
//! store.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::progress::ProgressMarker;

/// Which integer of a progress marker is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    /// Global character offset of a whole-file document.
    GlobalOffset,
    /// Page number of a paged document.
    PageIndex,
    /// Character offset inside the stored page.
    PageOffset,
}

/// A key-value store of integers per document.
pub trait PreferenceStore: Send + Sync {
    /// The stored value, if any.
    fn get_int(&self, doc_id: &str, key: ProgressKey) -> Option<i64>;

    /// Store `value`, replacing any previous one.
    fn set_int(&self, doc_id: &str, key: ProgressKey, value: i64);
}

/// In-process [`PreferenceStore`].
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<(String, ProgressKey), i64>>,
}

impl MemoryPreferenceStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_int(&self, doc_id: &str, key: ProgressKey) -> Option<i64> {
        self.values.lock().get(&(doc_id.to_owned(), key)).copied()
    }

    fn set_int(&self, doc_id: &str, key: ProgressKey, value: i64) {
        self.values.lock().insert((doc_id.to_owned(), key), value);
    }
}

/// Write `marker` under `doc_id`.
///
/// A paged marker writes both the page and the in-page offset; a global one
/// writes only the global offset, so a document that changes mode keeps both
/// positions.
pub fn save_marker(store: &dyn PreferenceStore, doc_id: &str, marker: ProgressMarker) {
    match marker {
        ProgressMarker::Global { offset } => store.set_int(doc_id, ProgressKey::GlobalOffset, to_stored(offset)),
        ProgressMarker::Paged { page, offset } => {
            store.set_int(doc_id, ProgressKey::PageIndex, to_stored(page));
            store.set_int(doc_id, ProgressKey::PageOffset, to_stored(offset));
        }
    }
}

/// Stored global offset of `doc_id`; missing or negative values read as 0.
#[must_use]
pub fn load_global(store: &dyn PreferenceStore, doc_id: &str) -> ProgressMarker {
    ProgressMarker::Global {
        offset: from_stored(store.get_int(doc_id, ProgressKey::GlobalOffset)),
    }
}

/// Stored paged position of `doc_id`, with the page clamped into
/// `0..page_count`. The in-page offset is clamped later, against the text of
/// the page once it is loaded.
#[must_use]
pub fn load_paged(store: &dyn PreferenceStore, doc_id: &str, page_count: usize) -> ProgressMarker {
    let page = from_stored(store.get_int(doc_id, ProgressKey::PageIndex));
    ProgressMarker::Paged {
        page: crate::progress::clamp_page(page, page_count),
        offset: from_stored(store.get_int(doc_id, ProgressKey::PageOffset)),
    }
}

fn to_stored(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_stored(value: Option<i64>) -> usize {
    value.map_or(0, |v| usize::try_from(v.max(0)).unwrap_or(usize::MAX))
}
