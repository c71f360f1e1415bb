//! Immutable reader state and the reducer that advances it.
//!
//! Every change goes through [`ReaderState::reduce`], which consumes the old
//! snapshot and returns the next one. Values that follow from other fields,
//! like whether the open document is a favorite, are computed on read and
//! never stored.

use std::{collections::BTreeSet, sync::Arc};

use crate::{loader::OpenOutcome, progress::ProgressMarker};

/// What the reader is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderMode {
    /// No document.
    #[default]
    Closed,
    /// A document is being sniffed or indexed.
    Opening,
    /// The whole text is in [`ReaderState::text`].
    WholeFile,
    /// Pages are loaded on demand.
    Paged,
    /// The open failed; see [`ReaderState::error_message`].
    Failed,
}

/// Identity of the open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Stable caller-supplied id; progress and favorites are keyed by it.
    pub id: String,
    /// Name shown to the reader.
    pub display_name: String,
}

/// A snapshot of the reading session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReaderState {
    /// Token of the current open; results carrying another token are stale.
    pub generation: u64,
    /// The open (or opening) document.
    pub document: Option<DocumentInfo>,
    /// Current mode.
    pub mode: ReaderMode,
    /// Decoded text in whole-file mode, empty otherwise.
    pub text: Arc<str>,
    /// Number of pages in paged mode, 0 otherwise.
    pub page_count: usize,
    /// Detected encoding name.
    pub charset_name: Option<String>,
    /// User-facing message of a failed open.
    pub error_message: Option<&'static str>,
    /// Ids of favorite documents.
    pub favorites: BTreeSet<String>,
    /// Whether the text is concealed from view.
    pub hidden: bool,
    /// Last known reading position of the open document.
    pub progress: Option<ProgressMarker>,
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A new open began and superseded every earlier one.
    OpenStarted {
        /// Token of the new open.
        generation: u64,
        /// The document being opened.
        document: DocumentInfo,
    },
    /// The open with `generation` succeeded.
    Opened {
        /// Token of the open.
        generation: u64,
        /// What was opened.
        outcome: OpenOutcome,
        /// Stored position, already clamped to the new content.
        progress: ProgressMarker,
    },
    /// The open with `generation` failed.
    OpenFailed {
        /// Token of the open.
        generation: u64,
        /// User-facing message.
        message: &'static str,
        /// Encoding name, if detection got that far.
        charset_name: Option<String>,
    },
    /// The reader scrolled to a new position.
    ProgressChanged(ProgressMarker),
    /// Add or remove a document from the favorites.
    SetFavorite {
        /// Document id.
        id: String,
        /// Whether it is a favorite.
        favorite: bool,
    },
    /// Conceal or reveal the text.
    SetHidden(bool),
    /// Flip [`ReaderState::hidden`].
    ToggleHidden,
    /// Forget the open document and invalidate work still in flight for it.
    Close,
}

impl ReaderState {
    /// Apply `action`. Results for a superseded generation leave the state
    /// unchanged.
    #[must_use]
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::OpenStarted { generation, document } => Self {
                generation,
                document: Some(document),
                mode: ReaderMode::Opening,
                text: Arc::from(""),
                page_count: 0,
                charset_name: None,
                error_message: None,
                progress: None,
                ..self
            },
            Action::Opened { generation, .. } | Action::OpenFailed { generation, .. }
                if generation != self.generation =>
            {
                self
            }
            Action::Opened { outcome, progress, .. } => match outcome {
                OpenOutcome::WholeFile { text, charset_name } => Self {
                    mode: ReaderMode::WholeFile,
                    text,
                    page_count: 0,
                    charset_name: Some(charset_name),
                    error_message: None,
                    progress: Some(progress),
                    ..self
                },
                OpenOutcome::Paged { page_count, charset_name } => Self {
                    mode: ReaderMode::Paged,
                    text: Arc::from(""),
                    page_count,
                    charset_name: Some(charset_name),
                    error_message: None,
                    progress: Some(progress),
                    ..self
                },
            },
            Action::OpenFailed { message, charset_name, .. } => Self {
                mode: ReaderMode::Failed,
                text: Arc::from(""),
                page_count: 0,
                charset_name,
                error_message: Some(message),
                progress: None,
                ..self
            },
            Action::ProgressChanged(marker) => Self {
                progress: Some(marker),
                ..self
            },
            Action::SetFavorite { id, favorite } => {
                let mut favorites = self.favorites;
                if favorite {
                    favorites.insert(id);
                } else {
                    favorites.remove(&id);
                }
                Self { favorites, ..self }
            }
            Action::SetHidden(hidden) => Self { hidden, ..self },
            Action::ToggleHidden => Self {
                hidden: !self.hidden,
                ..self
            },
            Action::Close => Self {
                generation: self.generation + 1,
                favorites: self.favorites,
                hidden: self.hidden,
                ..Self::default()
            },
        }
    }

    /// Whether the open document is a favorite.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|doc| self.favorites.contains(&doc.id))
    }

    /// Whether pages are loaded on demand.
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.mode == ReaderMode::Paged
    }

    /// The whole-file text, or nothing while hidden.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        if self.hidden { "" } else { &self.text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(generation: u64, id: &str) -> Action {
        Action::OpenStarted {
            generation,
            document: DocumentInfo {
                id: id.into(),
                display_name: format!("{id}.txt"),
            },
        }
    }

    fn whole(generation: u64, text: &str) -> Action {
        Action::Opened {
            generation,
            outcome: OpenOutcome::WholeFile {
                text: Arc::from(text),
                charset_name: "UTF-8".into(),
            },
            progress: ProgressMarker::Global { offset: 0 },
        }
    }

    #[test]
    fn open_flow() {
        let state = ReaderState::default().reduce(started(1, "a"));
        assert_eq!(state.mode, ReaderMode::Opening);

        let state = state.reduce(whole(1, "hello"));
        assert_eq!(state.mode, ReaderMode::WholeFile);
        assert_eq!(&*state.text, "hello");
        assert_eq!(state.charset_name.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn stale_results_are_ignored() {
        let state = ReaderState::default().reduce(started(1, "a")).reduce(started(2, "b"));
        let after = state.clone().reduce(whole(1, "from a"));
        assert_eq!(after, state);

        let after = state.clone().reduce(Action::OpenFailed {
            generation: 1,
            message: "read failed",
            charset_name: None,
        });
        assert_eq!(after, state);
    }

    #[test]
    fn failure_clears_content() {
        let state = ReaderState::default()
            .reduce(started(1, "a"))
            .reduce(Action::OpenFailed {
                generation: 1,
                message: "not plain text",
                charset_name: Some("GBK".into()),
            });
        assert_eq!(state.mode, ReaderMode::Failed);
        assert_eq!(state.error_message, Some("not plain text"));
        assert_eq!(state.charset_name.as_deref(), Some("GBK"));
        assert!(state.text.is_empty());
    }

    #[test]
    fn favorite_is_derived_from_current_document() {
        let state = ReaderState::default()
            .reduce(Action::SetFavorite {
                id: "b".into(),
                favorite: true,
            })
            .reduce(started(1, "a"));
        assert!(!state.is_favorite());

        let state = state.reduce(started(2, "b"));
        assert!(state.is_favorite());

        let state = state.reduce(Action::SetFavorite {
            id: "b".into(),
            favorite: false,
        });
        assert!(!state.is_favorite());
    }

    #[test]
    fn hidden_conceals_text() {
        let state = ReaderState::default().reduce(started(1, "a")).reduce(whole(1, "secret"));
        assert_eq!(state.visible_text(), "secret");
        let state = state.reduce(Action::ToggleHidden);
        assert_eq!(state.visible_text(), "");
        let state = state.reduce(Action::SetHidden(false));
        assert_eq!(state.visible_text(), "secret");
    }

    #[test]
    fn close_invalidates_generation_and_keeps_favorites() {
        let state = ReaderState::default()
            .reduce(Action::SetFavorite {
                id: "a".into(),
                favorite: true,
            })
            .reduce(started(3, "a"))
            .reduce(whole(3, "x"))
            .reduce(Action::Close);
        assert_eq!(state.generation, 4);
        assert_eq!(state.mode, ReaderMode::Closed);
        assert!(state.document.is_none());
        assert!(state.favorites.contains("a"));
    }
}
