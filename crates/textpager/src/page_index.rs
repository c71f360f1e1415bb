//! Byte-offset page boundaries built in one streaming pass.
//!
//! Overview
//! - A document is split into pages of roughly `target` bytes. Once a page has
//!   reached the target size the builder arms, and the first newline after
//!   that point ends the page: the next page starts right after the newline.
//!   Pages therefore never split a line, and a document without newlines is a
//!   single page however large it is.
//! - For UTF-16 documents the input is consumed as 2-byte code units and the
//!   newline is the code unit `0x000A` in the document's byte order, so every
//!   boundary falls on a code-unit boundary. A lone byte at the end of a fed
//!   chunk is carried over and paired with the first byte of the next chunk.
//! - For every other encoding the newline is the byte `0x0A`. This holds for
//!   UTF-8 and the supported legacy encodings, none of which use `0x0A` inside
//!   a multi-byte sequence.
//!
//! The builder keeps O(1) state besides the offsets it has found, and its
//! result does not depend on how the input is chunked.

use std::io::{self, Read};

use bstr::ByteSlice;
use tracing::debug;

use crate::charset::Charset;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// A half-open byte interval `[start, end)` of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    /// First byte of the page.
    pub start: u64,
    /// One past the last byte of the page.
    pub end: u64,
}

impl PageRange {
    /// Number of bytes in the page.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the page holds no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Start offsets of every page, plus the document size.
///
/// Invariants: `offsets[0] == 0`, offsets strictly increase, every offset is
/// below `file_size` unless the document is empty, and the last page runs to
/// `file_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndex {
    offsets: Vec<u64>,
    file_size: u64,
}

impl PageIndex {
    /// Start offset of each page.
    #[must_use]
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Total document size in bytes.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of pages; at least one.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.offsets.len()
    }

    /// Byte range of `page`, or `None` past the last page.
    #[must_use]
    pub fn page_range(&self, page: usize) -> Option<PageRange> {
        let start = *self.offsets.get(page)?;
        let end = self.offsets.get(page + 1).copied().unwrap_or(self.file_size);
        Some(PageRange { start, end })
    }

    /// The page containing byte `offset`; offsets past the end map to the
    /// last page.
    #[must_use]
    pub fn page_of_byte(&self, offset: u64) -> usize {
        self.offsets.partition_point(|&start| start <= offset).saturating_sub(1)
    }

    /// Iterate over every page range in order.
    pub fn ranges(&self) -> impl Iterator<Item = PageRange> + '_ {
        (0..self.page_count()).filter_map(|page| self.page_range(page))
    }
}

/// Push-based page index builder.
///
/// # Examples
///
/// ```rust
/// use textpager::{Charset, PageIndexBuilder};
///
/// let mut builder = PageIndexBuilder::new(Charset::UTF_8, 3);
/// builder.feed(b"hel");
/// builder.feed(b"lo\nworld");
/// let index = builder.finish();
/// assert_eq!(index.offsets(), &[0, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct PageIndexBuilder {
    newline_unit: Option<[u8; 2]>,
    target: u64,
    offsets: Vec<u64>,
    /// Bytes consumed so far, including a carried byte.
    position: u64,
    /// Bytes since the last boundary.
    page_bytes: u64,
    armed: bool,
    carry: Option<u8>,
}

impl PageIndexBuilder {
    /// Start an index for a document in `charset`, aiming for pages of
    /// `target_page_bytes`.
    #[must_use]
    pub fn new(charset: Charset, target_page_bytes: u64) -> Self {
        Self {
            newline_unit: charset.utf16_newline(),
            target: target_page_bytes,
            offsets: vec![0],
            position: 0,
            page_bytes: 0,
            armed: false,
            carry: None,
        }
    }

    /// Consume the next chunk of the document.
    pub fn feed(&mut self, chunk: &[u8]) {
        match self.newline_unit {
            Some(newline) => self.feed_units(newline, chunk),
            None => self.feed_bytes(chunk),
        }
    }

    /// Finish the pass and produce the index.
    #[must_use]
    pub fn finish(mut self) -> PageIndex {
        if self.carry.take().is_some() {
            self.position += 1;
        }
        let file_size = self.position;
        let mut offsets = self.offsets;
        offsets.sort_unstable();
        offsets.dedup();
        offsets.retain(|&offset| offset < file_size);
        if offsets.is_empty() {
            offsets.push(0);
        }
        PageIndex { offsets, file_size }
    }

    /// Read `reader` to the end and index it.
    ///
    /// # Errors
    ///
    /// Any read error other than [`io::ErrorKind::Interrupted`].
    pub fn build<R: Read>(mut reader: R, charset: Charset, target_page_bytes: u64) -> io::Result<PageIndex> {
        let mut builder = Self::new(charset, target_page_bytes);
        let mut buf = vec![0u8; READ_BUFFER_BYTES];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => builder.feed(&buf[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        let index = builder.finish();
        debug!(
            pages = index.page_count(),
            bytes = index.file_size(),
            %charset,
            "page index built"
        );
        Ok(index)
    }

    fn feed_bytes(&mut self, mut rest: &[u8]) {
        while !rest.is_empty() {
            // Byte `k` of `rest` brings the page to `page_bytes + k + 1` bytes,
            // so newlines at or after `armed_from` may end the page.
            let armed_from = usize::try_from(self.target.saturating_sub(self.page_bytes + 1))
                .unwrap_or(usize::MAX)
                .min(rest.len());
            if let Some(found) = rest[armed_from..].find_byte(b'\n') {
                let consumed = armed_from + found + 1;
                self.position += consumed as u64;
                self.commit();
                rest = &rest[consumed..];
            } else {
                self.position += rest.len() as u64;
                self.page_bytes += rest.len() as u64;
                return;
            }
        }
    }

    fn feed_units(&mut self, newline: [u8; 2], mut bytes: &[u8]) {
        if let Some(first) = self.carry.take() {
            let Some((&second, tail)) = bytes.split_first() else {
                self.carry = Some(first);
                return;
            };
            self.unit(newline, [first, second]);
            bytes = tail;
        }
        let mut pairs = bytes.chunks_exact(2);
        for pair in &mut pairs {
            self.unit(newline, [pair[0], pair[1]]);
        }
        if let [last] = pairs.remainder() {
            self.carry = Some(*last);
        }
    }

    fn unit(&mut self, newline: [u8; 2], unit: [u8; 2]) {
        self.position += 2;
        self.page_bytes += 2;
        if self.page_bytes >= self.target {
            self.armed = true;
        }
        if self.armed && unit == newline {
            self.commit();
        }
    }

    fn commit(&mut self) {
        self.offsets.push(self.position);
        self.page_bytes = 0;
        self.armed = false;
    }
}
