//! Encoding detection, streaming page indexing and random-access page
//! decoding for text documents of any size.
//!
//! Small documents are decoded whole. Large documents, and documents whose
//! length is unknown, are sniffed from a leading sample, indexed into
//! newline-aligned pages in one pass, and decoded page by page on demand.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use textpager::{MemorySource, OpenOutcome, ReaderOptions, Session};
//!
//! let session = Session::new(ReaderOptions {
//!     page_target_bytes: 3,
//!     ..Default::default()
//! });
//! let source = MemorySource::new("notes.txt", b"hello\nworld".to_vec()).without_length();
//! let outcome = session.open_blocking("notes", Arc::new(source)).unwrap();
//! assert!(matches!(outcome, Some(OpenOutcome::Paged { page_count: 2, .. })));
//! assert_eq!(session.load_page_blocking(1).as_deref(), Some("world"));
//! ```

mod binary;
mod cache;
mod charset;
mod error;
mod loader;
mod options;
mod page_index;
mod page_reader;
mod progress;
mod session;
mod sniff;
mod source;
mod state;
mod store;

pub mod quality;

#[cfg(test)]
mod tests;

pub use binary::{BinaryGuard, is_binary};
pub use cache::PageCache;
pub use charset::{Bom, Charset};
pub use error::{DocumentError, Result};
pub use loader::{
    DocumentLoader, LoadResult, OpenOutcome, Opened, PagedFile, PagedOpenResult, WholeFile, open_document,
    read_capped, read_sample,
};
pub use options::ReaderOptions;
pub use page_index::{PageIndex, PageIndexBuilder, PageRange};
pub use page_reader::{DecodedPage, read_page, try_read_page};
pub use progress::{
    LineLayout, ProgressMarker, ScrollTarget, TextLines, capture_global, capture_paged, clamp_page,
    find_line_range, restore_global, restore_paged,
};
pub use session::{OpenCompletion, OpenTask, PageCompletion, PageTask, Session};
pub use sniff::{CharsetSniffer, CodecCandidate, Decoded, Detection, detect, detect_sample};
pub use source::{ByteSource, DocumentSource, FileSource, MemorySource};
pub use state::{Action, DocumentInfo, ReaderMode, ReaderState};
pub use store::{MemoryPreferenceStore, PreferenceStore, ProgressKey, load_global, load_paged, save_marker};
