//! Random-access decoding of a single page.

use std::{
    io::{self, Read, Seek, SeekFrom},
    sync::Arc,
};

use tracing::warn;

use crate::{charset::Charset, page_index::PageRange, source::DocumentSource};

/// A page number paired with its decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    /// Zero-based page number.
    pub page: usize,
    /// Decoded text; malformed input shows up as U+FFFD.
    pub text: Arc<str>,
}

/// Read and decode the bytes of `range`.
///
/// Decoding is lenient: malformed or unmappable sequences become U+FFFD
/// instead of failing. A byte-order mark is stripped only on the page that
/// starts at offset 0, and only when it matches `charset`. If the stream ends
/// early, the bytes that were read are decoded.
///
/// I/O failures are logged and produce an empty string. Callers must not
/// treat an empty result for a non-empty range as a loaded page.
#[must_use]
pub fn read_page(source: &dyn DocumentSource, charset: Charset, range: PageRange) -> String {
    match try_read_page(source, charset, range) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                document = %source.display_name(),
                start = range.start,
                end = range.end,
                error = %err,
                "page read failed"
            );
            String::new()
        }
    }
}

/// [`read_page`] without the error-to-empty conversion.
///
/// # Errors
///
/// Failures opening, seeking or reading the document.
pub fn try_read_page(source: &dyn DocumentSource, charset: Charset, range: PageRange) -> io::Result<String> {
    if range.is_empty() {
        return Ok(String::new());
    }
    let mut stream = source.open()?;
    stream.seek(SeekFrom::Start(range.start))?;

    let mut bytes = Vec::with_capacity(usize::try_from(range.len()).unwrap_or(0));
    stream.take(range.len()).read_to_end(&mut bytes)?;

    let body = if range.start == 0 {
        charset.strip_bom(&bytes)
    } else {
        &bytes
    };
    Ok(charset.decode_lossy(body).into_owned())
}
