//! The reading session: opens documents, serves pages, and tracks progress.
//!
//! Blocking work never runs under the session lock. Each operation is split
//! into three steps:
//!
//! 1. a `begin`/`request` call on the session that snapshots what the work
//!    needs into a task,
//! 2. `run` on the task, on whatever thread the caller chooses,
//! 3. a `complete` call that applies the result only if it still belongs to
//!    the current document.
//!
//! Every [`Session::begin_open`] and [`Session::close`] increments a
//! generation counter. Completions carrying an older generation are
//! discarded, so a slow open of a previous document can never overwrite the
//! current one.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    cache::PageCache,
    charset::Charset,
    error::Result,
    loader::{DocumentLoader, OpenOutcome, Opened, PagedFile},
    options::ReaderOptions,
    page_index::PageRange,
    page_reader::{DecodedPage, read_page},
    progress::ProgressMarker,
    source::DocumentSource,
    state::{Action, DocumentInfo, ReaderState},
    store::{self, PreferenceStore},
};

/// A reading session over one document at a time.
pub struct Session {
    loader: DocumentLoader,
    store: Option<Arc<dyn PreferenceStore>>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: ReaderState,
    source: Option<Arc<dyn DocumentSource>>,
    paged: Option<PagedFile>,
    cache: PageCache,
}

impl Inner {
    fn dispatch(&mut self, action: Action) {
        self.state = std::mem::take(&mut self.state).reduce(action);
    }

    fn doc_id(&self) -> Option<&str> {
        self.state.document.as_ref().map(|doc| doc.id.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Session")
            .field("options", self.loader.options())
            .field("state", &inner.state)
            .field("cached_pages", &inner.cache.pages())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A session that does not persist progress.
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            loader: DocumentLoader::new(options),
            store: None,
            inner: Mutex::new(Inner {
                state: ReaderState::default(),
                source: None,
                paged: None,
                cache: PageCache::new(options.page_cache_capacity),
            }),
        }
    }

    /// A session that restores and saves progress through `store`.
    #[must_use]
    pub fn with_store(options: ReaderOptions, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new(options)
        }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        self.loader.options()
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.inner.lock().state.clone()
    }

    /// Start opening `source` under the stable id `doc_id`.
    ///
    /// Any open still in flight is superseded, and the page cache is cleared.
    pub fn begin_open(&self, doc_id: impl Into<String>, source: Arc<dyn DocumentSource>) -> OpenTask {
        let mut inner = self.inner.lock();
        let generation = inner.state.generation + 1;
        inner.cache.clear();
        inner.paged = None;
        inner.source = Some(Arc::clone(&source));
        inner.dispatch(Action::OpenStarted {
            generation,
            document: DocumentInfo {
                id: doc_id.into(),
                display_name: source.display_name(),
            },
        });
        debug!(generation, "open started");
        OpenTask {
            generation,
            loader: self.loader,
            source,
        }
    }

    /// Apply the result of an [`OpenTask`].
    ///
    /// Returns `Ok(None)` when the task was superseded by a later open or a
    /// close; its result, success or failure, is dropped.
    ///
    /// # Errors
    ///
    /// The open failed. The failure is also recorded in the state.
    pub fn complete_open(&self, completion: OpenCompletion) -> Result<Option<OpenOutcome>> {
        // The store is consulted without holding the session lock.
        let Some(doc_id) = self.current_doc_id(completion.generation) else {
            return Ok(None);
        };
        let result = completion.result.map(|opened| {
            let progress = self.stored_progress(&doc_id, &opened);
            (opened, progress)
        });

        let mut inner = self.inner.lock();
        if !Self::is_current(&inner, completion.generation) {
            return Ok(None);
        }
        let (opened, progress) = match result {
            Ok(pair) => pair,
            Err(err) => {
                inner.dispatch(Action::OpenFailed {
                    generation: completion.generation,
                    message: err.user_message(),
                    charset_name: err.charset_name().map(str::to_owned),
                });
                return Err(err);
            }
        };

        let outcome = opened.outcome();
        if let Opened::Paged(paged) = opened {
            inner.paged = Some(paged);
        }
        inner.dispatch(Action::Opened {
            generation: completion.generation,
            outcome: outcome.clone(),
            progress,
        });
        Ok(Some(outcome))
    }

    fn is_current(inner: &Inner, generation: u64) -> bool {
        let current = inner.state.generation;
        if generation != current {
            warn!(stale = generation, current, "discarding superseded open");
        }
        generation == current
    }

    fn current_doc_id(&self, generation: u64) -> Option<String> {
        let inner = self.inner.lock();
        Self::is_current(&inner, generation).then(|| inner.doc_id().unwrap_or_default().to_owned())
    }

    /// Open `source` on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`Session::complete_open`].
    pub fn open_blocking(&self, doc_id: impl Into<String>, source: Arc<dyn DocumentSource>) -> Result<Option<OpenOutcome>> {
        let completion = self.begin_open(doc_id, source).run();
        self.complete_open(completion)
    }

    /// A task loading `page`, or `None` if there is nothing to load: no paged
    /// document is open, `page` is out of range, or it is already cached.
    pub fn request_page(&self, page: usize) -> Option<PageTask> {
        let inner = self.inner.lock();
        Self::page_task(&inner, page)
    }

    fn page_task(inner: &Inner, page: usize) -> Option<PageTask> {
        let paged = inner.paged.as_ref()?;
        let range = paged.index.page_range(page)?;
        if inner.cache.contains(page) {
            return None;
        }
        Some(PageTask {
            generation: inner.state.generation,
            page,
            range,
            charset: paged.charset,
            source: Arc::clone(inner.source.as_ref()?),
        })
    }

    /// Apply the result of a [`PageTask`]. Returns whether the page was cached.
    ///
    /// Results for a superseded document are dropped, as are empty results
    /// for a non-empty byte range: those are read failures and the page
    /// stays unloaded so it can be requested again.
    pub fn complete_page(&self, completion: PageCompletion) -> bool {
        let mut inner = self.inner.lock();
        if completion.generation != inner.state.generation {
            warn!(
                page = completion.page.page,
                stale = completion.generation,
                current = inner.state.generation,
                "discarding page of superseded document"
            );
            return false;
        }
        if completion.page.text.is_empty() && !completion.range.is_empty() {
            warn!(page = completion.page.page, "page came back empty; not caching");
            return false;
        }
        inner.cache.put(completion.page.page, completion.page.text);
        true
    }

    /// Load `page` on the calling thread if needed and return its text.
    pub fn load_page_blocking(&self, page: usize) -> Option<Arc<str>> {
        if let Some(text) = self.page(page) {
            return Some(text);
        }
        let completion = self.request_page(page)?.run();
        self.complete_page(completion);
        self.page(page)
    }

    /// Cached text of `page`.
    pub fn page(&self, page: usize) -> Option<Arc<str>> {
        self.inner.lock().cache.get(page)
    }

    /// Cached page numbers, most recently used first.
    #[must_use]
    pub fn cached_pages(&self) -> Vec<usize> {
        self.inner.lock().cache.pages()
    }

    /// Tasks for the uncached pages within the prefetch radius of `center`,
    /// nearest first.
    #[must_use]
    pub fn prefetch(&self, center: usize) -> Vec<PageTask> {
        let radius = self.options().prefetch_radius;
        let inner = self.inner.lock();
        let mut pages = vec![center];
        for distance in 1..=radius {
            if let Some(before) = center.checked_sub(distance) {
                pages.push(before);
            }
            pages.push(center.saturating_add(distance));
        }
        pages
            .into_iter()
            .filter_map(|page| Self::page_task(&inner, page))
            .collect()
    }

    /// Record the reading position and persist it if a store is attached.
    pub fn save_progress(&self, marker: ProgressMarker) {
        let mut inner = self.inner.lock();
        if inner.state.document.is_none() {
            return;
        }
        inner.dispatch(Action::ProgressChanged(marker));
        let doc_id = inner.doc_id().map(str::to_owned);
        drop(inner);
        if let (Some(store), Some(doc_id)) = (&self.store, doc_id) {
            store::save_marker(store.as_ref(), &doc_id, marker);
        }
    }

    /// Mark the open document as a favorite, or not.
    pub fn set_favorite(&self, favorite: bool) {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.doc_id().map(str::to_owned) {
            inner.dispatch(Action::SetFavorite { id, favorite });
        }
    }

    /// Conceal or reveal the text.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.lock().dispatch(Action::SetHidden(hidden));
    }

    /// Flip whether the text is concealed.
    pub fn toggle_hidden(&self) {
        self.inner.lock().dispatch(Action::ToggleHidden);
    }

    /// Close the document, dropping its pages.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.cache.clear();
        inner.paged = None;
        inner.source = None;
        inner.dispatch(Action::Close);
    }

    fn stored_progress(&self, doc_id: &str, opened: &Opened) -> ProgressMarker {
        match opened {
            Opened::WholeFile(whole) => {
                let stored = self
                    .store
                    .as_deref()
                    .map_or(0, |store| store::load_global(store, doc_id).offset());
                ProgressMarker::Global {
                    offset: stored.min(whole.text.chars().count()),
                }
            }
            Opened::Paged(paged) => self.store.as_deref().map_or(
                ProgressMarker::Paged { page: 0, offset: 0 },
                |store| store::load_paged(store, doc_id, paged.index.page_count()),
            ),
        }
    }
}

/// The blocking part of an open.
pub struct OpenTask {
    generation: u64,
    loader: DocumentLoader,
    source: Arc<dyn DocumentSource>,
}

impl OpenTask {
    /// Token this task was started under.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sniff, decode or index the document.
    #[must_use]
    pub fn run(self) -> OpenCompletion {
        OpenCompletion {
            generation: self.generation,
            result: self.loader.open(self.source.as_ref()),
        }
    }
}

/// Result of [`OpenTask::run`], to hand to [`Session::complete_open`].
#[derive(Debug)]
pub struct OpenCompletion {
    generation: u64,
    result: Result<Opened>,
}

/// The blocking part of a page load.
pub struct PageTask {
    generation: u64,
    page: usize,
    range: PageRange,
    charset: Charset,
    source: Arc<dyn DocumentSource>,
}

impl PageTask {
    /// The page this task loads.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Read and decode the page.
    #[must_use]
    pub fn run(self) -> PageCompletion {
        let text = read_page(self.source.as_ref(), self.charset, self.range);
        PageCompletion {
            generation: self.generation,
            range: self.range,
            page: DecodedPage {
                page: self.page,
                text: Arc::from(text),
            },
        }
    }
}

/// Result of [`PageTask::run`], to hand to [`Session::complete_page`].
#[derive(Debug, Clone)]
pub struct PageCompletion {
    generation: u64,
    range: PageRange,
    page: DecodedPage,
}

impl PageCompletion {
    /// The decoded page.
    #[must_use]
    pub fn page(&self) -> &DecodedPage {
        &self.page
    }
}
