//! The open pipeline: whole-file decode for small documents, sampling and
//! page indexing for everything else.
//!
//! ```text
//!   length < threshold ──► capped read ──► decode ──► WholeFile
//!          │                    │
//!          │               TooLarge
//!          ▼                    ▼
//!   unknown / large ──► sample ──► detect ──► index ──► Paged
//! ```

use std::{
    io::{self, Read},
    sync::Arc,
};

use tracing::{debug, info};

use crate::{
    charset::Charset,
    error::{DocumentError, Result},
    options::ReaderOptions,
    page_index::{PageIndex, PageIndexBuilder},
    sniff::{CharsetSniffer, Detection},
    source::DocumentSource,
};

/// A document decoded in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WholeFile {
    /// The decoded text.
    pub text: Arc<str>,
    /// The detected encoding; `None` for an empty document.
    pub charset: Option<Charset>,
}

/// A document prepared for paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedFile {
    /// Encoding detected from the leading sample.
    pub charset: Charset,
    /// Page boundaries.
    pub index: PageIndex,
}

/// The result of a successful open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// Small enough to keep in memory.
    WholeFile(WholeFile),
    /// Read page by page.
    Paged(PagedFile),
}

impl Opened {
    /// The summary handed to the presentation layer.
    #[must_use]
    pub fn outcome(&self) -> OpenOutcome {
        match self {
            Self::WholeFile(whole) => OpenOutcome::WholeFile {
                text: Arc::clone(&whole.text),
                charset_name: whole.charset.map_or_else(String::new, |c| c.name().to_owned()),
            },
            Self::Paged(paged) => OpenOutcome::Paged {
                page_count: paged.index.page_count(),
                charset_name: paged.charset.name().to_owned(),
            },
        }
    }
}

/// What the presentation layer learns about an opened document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The whole text, and the encoding name (empty for an empty document).
    WholeFile {
        /// Decoded text.
        text: Arc<str>,
        /// Encoding name.
        charset_name: String,
    },
    /// The number of pages and the encoding name.
    Paged {
        /// Number of pages.
        page_count: usize,
        /// Encoding name.
        charset_name: String,
    },
}

/// `{text, charset_name, error_message}` of a whole-file load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadResult {
    /// Decoded text; `None` on failure.
    pub text: Option<Arc<str>>,
    /// Encoding name, when one was determined.
    pub charset_name: Option<String>,
    /// User-facing failure message.
    pub error_message: Option<&'static str>,
}

impl From<&Result<WholeFile>> for LoadResult {
    fn from(result: &Result<WholeFile>) -> Self {
        match result {
            Ok(whole) => Self {
                text: Some(Arc::clone(&whole.text)),
                charset_name: Some(whole.charset.map_or_else(String::new, |c| c.name().to_owned())),
                error_message: None,
            },
            Err(err) => Self {
                text: None,
                charset_name: err.charset_name().map(str::to_owned),
                error_message: Some(err.user_message()),
            },
        }
    }
}

/// `{page_count, charset_name, error_message}` of a paged open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagedOpenResult {
    /// Number of pages; 0 on failure.
    pub page_count: usize,
    /// Encoding name, when one was determined.
    pub charset_name: Option<String>,
    /// User-facing failure message.
    pub error_message: Option<&'static str>,
}

impl From<&Result<PagedFile>> for PagedOpenResult {
    fn from(result: &Result<PagedFile>) -> Self {
        match result {
            Ok(paged) => Self {
                page_count: paged.index.page_count(),
                charset_name: Some(paged.charset.name().to_owned()),
                error_message: None,
            },
            Err(err) => Self {
                page_count: 0,
                charset_name: err.charset_name().map(str::to_owned),
                error_message: Some(err.user_message()),
            },
        }
    }
}

/// Opens documents according to a set of [`ReaderOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLoader {
    options: ReaderOptions,
    sniffer: CharsetSniffer,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl DocumentLoader {
    /// A loader using `options`.
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            options,
            sniffer: CharsetSniffer::from_options(&options),
        }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Whether a document of `length` bytes is paged. Unknown lengths are.
    #[must_use]
    pub fn is_paged(&self, length: Option<u64>) -> bool {
        length.is_none_or(|len| len >= self.options.whole_file_threshold)
    }

    /// Open `source`, choosing whole-file or paged mode from its length.
    ///
    /// A whole-file read that runs past the threshold (the reported length
    /// was wrong) falls back to paged mode.
    ///
    /// # Errors
    ///
    /// Any fatal [`DocumentError`].
    pub fn open(&self, source: &dyn DocumentSource) -> Result<Opened> {
        let length = source.length();
        let opened = if self.is_paged(length) {
            self.open_paged(source).map(Opened::Paged)?
        } else {
            match self.load_whole(source) {
                Ok(whole) => Opened::WholeFile(whole),
                Err(err @ DocumentError::TooLarge { .. }) => {
                    debug!(document = %source.display_name(), error = %err, "falling back to paged mode");
                    Opened::Paged(self.open_paged(source)?)
                }
                Err(err) => return Err(err),
            }
        };
        match &opened {
            Opened::WholeFile(whole) => info!(
                document = %source.display_name(),
                charset = whole.charset.map_or("", Charset::name),
                bytes = whole.text.len(),
                "opened whole file"
            ),
            Opened::Paged(paged) => info!(
                document = %source.display_name(),
                charset = %paged.charset,
                pages = paged.index.page_count(),
                bytes = paged.index.file_size(),
                "opened paged"
            ),
        }
        Ok(opened)
    }

    /// Read and decode the whole document.
    ///
    /// An empty document decodes to empty text without an encoding.
    ///
    /// # Errors
    ///
    /// [`DocumentError::TooLarge`] when the document is longer than the
    /// whole-file threshold, otherwise read and detection failures.
    pub fn load_whole(&self, source: &dyn DocumentSource) -> Result<WholeFile> {
        let bytes = read_capped(source, self.options.whole_file_threshold)?;
        if bytes.is_empty() {
            return Ok(WholeFile {
                text: Arc::from(""),
                charset: None,
            });
        }
        let decoded = self.sniffer.decode(&bytes)?;
        Ok(WholeFile {
            text: Arc::from(decoded.text),
            charset: Some(decoded.detection.charset),
        })
    }

    /// Detect the encoding of a paged document from its leading sample.
    ///
    /// # Errors
    ///
    /// Read and detection failures.
    pub fn detect_paged(&self, source: &dyn DocumentSource) -> Result<Detection> {
        let sample = read_sample(source, self.options.sample_bytes)?;
        self.sniffer.detect_sample(&sample)
    }

    /// Detect the encoding and build the page index.
    ///
    /// # Errors
    ///
    /// Read and detection failures.
    pub fn open_paged(&self, source: &dyn DocumentSource) -> Result<PagedFile> {
        let charset = self.detect_paged(source)?.charset;
        let index = PageIndexBuilder::build(source.open()?, charset, self.options.page_target_bytes)?;
        Ok(PagedFile { charset, index })
    }
}

/// [`DocumentLoader::open`] with `options`.
///
/// # Errors
///
/// Any fatal [`DocumentError`].
pub fn open_document(source: &dyn DocumentSource, options: &ReaderOptions) -> Result<Opened> {
    DocumentLoader::new(*options).open(source)
}

/// Read the whole document, failing once more than `limit` bytes arrive.
///
/// # Errors
///
/// [`DocumentError::TooLarge`] or [`DocumentError::ReadFailed`].
pub fn read_capped(source: &dyn DocumentSource, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    source
        .open()?
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Err(DocumentError::TooLarge { limit });
    }
    Ok(bytes)
}

/// Read at most `max` leading bytes.
///
/// # Errors
///
/// Whatever opening or reading the source reports.
pub fn read_sample(source: &dyn DocumentSource, max: usize) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(max.min(64 * 1024));
    source.open()?.take(max as u64).read_to_end(&mut sample)?;
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn small_options() -> ReaderOptions {
        ReaderOptions {
            whole_file_threshold: 64,
            sample_bytes: 16,
            page_target_bytes: 8,
            ..ReaderOptions::default()
        }
    }

    #[test]
    fn threshold_is_inclusive_for_paging() {
        let loader = DocumentLoader::new(small_options());
        assert!(!loader.is_paged(Some(63)));
        assert!(loader.is_paged(Some(64)));
        assert!(loader.is_paged(None));
    }

    #[test]
    fn small_document_opens_whole() {
        let source = MemorySource::new("a.txt", b"hello\nworld".to_vec());
        let opened = open_document(&source, &small_options()).unwrap();
        assert_eq!(
            opened.outcome(),
            OpenOutcome::WholeFile {
                text: Arc::from("hello\nworld"),
                charset_name: "UTF-8".into(),
            }
        );
    }

    #[test]
    fn unknown_length_pages() {
        let source = MemorySource::new("a.txt", b"hello\nworld".to_vec()).without_length();
        let Opened::Paged(paged) = open_document(&source, &small_options()).unwrap() else {
            panic!("expected paged mode");
        };
        assert_eq!(paged.charset, Charset::UTF_8);
        assert_eq!(paged.index.file_size(), 11);
    }

    #[test]
    fn underreported_length_falls_back_to_paging() {
        struct Liar(MemorySource);

        impl DocumentSource for Liar {
            fn open(&self) -> io::Result<Box<dyn crate::source::ByteSource>> {
                self.0.open()
            }

            fn length(&self) -> Option<u64> {
                Some(1)
            }

            fn display_name(&self) -> String {
                self.0.display_name()
            }
        }

        let text = "line of text\n".repeat(10);
        let source = Liar(MemorySource::new("big.txt", text.into_bytes()));
        let opened = open_document(&source, &small_options()).unwrap();
        assert!(matches!(opened, Opened::Paged(_)));
    }

    #[test]
    fn capped_read_reports_too_large() {
        let source = MemorySource::new("x", vec![b'a'; 10]);
        assert_eq!(read_capped(&source, 10).unwrap().len(), 10);
        assert!(matches!(
            read_capped(&source, 9),
            Err(DocumentError::TooLarge { limit: 9 })
        ));
    }

    #[test]
    fn sample_is_bounded() {
        let source = MemorySource::new("x", vec![b'a'; 100]);
        assert_eq!(read_sample(&source, 16).unwrap().len(), 16);
        assert_eq!(read_sample(&source, 1_000).unwrap().len(), 100);
    }

    #[test]
    fn empty_whole_file_has_empty_charset() {
        let source = MemorySource::new("empty.txt", Vec::<u8>::new());
        let result = DocumentLoader::default().load_whole(&source);
        assert_eq!(
            LoadResult::from(&result),
            LoadResult {
                text: Some(Arc::from("")),
                charset_name: Some(String::new()),
                error_message: None,
            }
        );
    }

    #[test]
    fn empty_paged_document_is_one_empty_page() {
        let source = MemorySource::new("empty.txt", Vec::<u8>::new()).without_length();
        let result = DocumentLoader::default().open_paged(&source);
        let summary = PagedOpenResult::from(&result);
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.error_message, None);
        assert_eq!(result.unwrap().index.page_range(0).map(|r| r.len()), Some(0));
    }

    #[test]
    fn binary_document_reports_message() {
        let source = MemorySource::new("a.bin", vec![0x01u8; 32]);
        let result = DocumentLoader::default().load_whole(&source);
        let summary = LoadResult::from(&result);
        assert_eq!(summary.text, None);
        assert_eq!(summary.error_message, Some("not plain text"));
    }
}
