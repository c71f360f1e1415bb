use std::io;

use thiserror::Error;

use crate::charset::Charset;

/// Crate-wide result alias.
pub type Result<T, E = DocumentError> = core::result::Result<T, E>;

/// Everything that can go wrong while opening a document.
///
/// Only [`DocumentError::TooLarge`] is recoverable: the open pipeline reacts
/// to it by falling back to paged mode. Every other variant ends the open and
/// is reported through [`DocumentError::user_message`].
///
/// Failures while reading a single page are not represented here; a page that
/// cannot be read decodes to an empty string instead.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// I/O failed while sampling, reading or indexing the document.
    #[error("read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// The document exceeded the whole-file byte cap.
    #[error("file too large (more than {limit} bytes)")]
    TooLarge {
        /// The cap that was exceeded.
        limit: u64,
    },

    /// The byte sample does not look like text.
    #[error("not plain text")]
    BinaryContent,

    /// No candidate encoding decoded the bytes without errors.
    #[error("cannot identify encoding")]
    UnidentifiableEncoding,

    /// The best strict decode still scored under the quality threshold.
    #[error("not plain text ({charset} scored {score:.3})")]
    LowQuality {
        /// The best-scoring candidate.
        charset: Charset,
        /// Its quality score.
        score: f32,
    },
}

impl DocumentError {
    /// Whether the error ends the open operation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TooLarge { .. })
    }

    /// The short message shown to the reader.
    ///
    /// Low-quality decodes are reported exactly like binary content.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ReadFailed(_) => "read failed",
            Self::TooLarge { .. } => "file too large",
            Self::BinaryContent | Self::LowQuality { .. } => "not plain text",
            Self::UnidentifiableEncoding => "cannot identify encoding",
        }
    }

    /// Name of the charset associated with the failure, if any.
    #[must_use]
    pub fn charset_name(&self) -> Option<&'static str> {
        match self {
            Self::LowQuality { charset, .. } => Some(charset.name()),
            _ => None,
        }
    }
}

impl From<io::Error> for DocumentError {
    fn from(err: io::Error) -> Self {
        Self::ReadFailed(err)
    }
}
