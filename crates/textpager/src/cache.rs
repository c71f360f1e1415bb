//! Bounded LRU cache of decoded pages.

use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use tracing::debug;

/// Number of pages kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Decoded pages keyed by page number, evicting the least recently used.
///
/// Both [`PageCache::get`] and [`PageCache::put`] refresh recency;
/// [`PageCache::contains`] does not.
#[derive(Debug)]
pub struct PageCache {
    pages: LruCache<usize, Arc<str>>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PageCache {
    /// A cache holding at most `capacity` pages (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pages: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Text of `page`, marking it most recently used.
    pub fn get(&mut self, page: usize) -> Option<Arc<str>> {
        self.pages.get(&page).cloned()
    }

    /// Store `text` for `page`, replacing any previous text.
    pub fn put(&mut self, page: usize, text: Arc<str>) {
        match self.pages.push(page, text) {
            Some((evicted, _)) if evicted != page => {
                debug!(evicted, inserted = page, "page evicted from cache");
            }
            _ => {}
        }
    }

    /// Whether `page` is cached.
    #[must_use]
    pub fn contains(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }

    /// Number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Maximum number of cached pages.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pages.cap().get()
    }

    /// Drop every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Cached page numbers, most recently used first.
    #[must_use]
    pub fn pages(&self) -> Vec<usize> {
        self.pages.iter().map(|(&page, _)| page).collect()
    }
}
