//! The handle through which document bytes are read.
//!
//! Permission checks and platform file pickers live outside this crate. All a
//! document has to offer is a way to open a fresh seekable byte stream, its
//! length if known, and a name to show.

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek},
    path::{Path, PathBuf},
    sync::Arc,
};

/// A readable, seekable byte stream over a document.
pub trait ByteSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> ByteSource for T {}

/// An openable document.
///
/// Every call to [`DocumentSource::open`] yields an independent stream, so a
/// page read and an index build never share a cursor.
pub trait DocumentSource: Send + Sync {
    /// Open a new stream positioned at the start of the document.
    ///
    /// # Errors
    ///
    /// Whatever the underlying storage reports.
    fn open(&self) -> io::Result<Box<dyn ByteSource>>;

    /// Document length in bytes, if the storage reports one.
    fn length(&self) -> Option<u64>;

    /// Name shown to the reader.
    fn display_name(&self) -> String;
}

/// A document on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Refer to the file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn ByteSource>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }

    fn length(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().filter(|m| m.is_file()).map(|m| m.len())
    }

    fn display_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |name| name.to_string_lossy().into_owned())
    }
}

/// A document held in memory.
///
/// The reported length can be withheld to model storage that cannot tell how
/// big a document is.
#[derive(Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
    report_length: bool,
}

impl MemorySource {
    /// A named in-memory document that reports its length.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            report_length: true,
        }
    }

    /// Stop reporting the length, as if the storage did not know it.
    #[must_use]
    pub fn without_length(mut self) -> Self {
        self.report_length = false;
        self
    }

    /// The document bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("report_length", &self.report_length)
            .finish()
    }
}

impl DocumentSource for MemorySource {
    fn open(&self) -> io::Result<Box<dyn ByteSource>> {
        Ok(Box::new(Cursor::new(SharedBytes(Arc::clone(&self.bytes)))))
    }

    fn length(&self) -> Option<u64> {
        self.report_length.then_some(self.bytes.len() as u64)
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
