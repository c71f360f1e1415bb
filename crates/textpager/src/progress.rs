//! Mapping between scroll positions and persistable reading progress.
//!
//! A reading position is stored as character offsets, never as pixels, so it
//! survives font and window changes. Whole-file documents store one global
//! offset; paged documents store the page number and an offset inside that
//! page. Offsets count `char`s of the decoded text.
//!
//! Stored markers may be stale (the file changed, or decodes differently), so
//! every restore clamps them into the bounds of the content at hand.

use std::ops::Range;

/// A persisted reading position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum ProgressMarker {
    /// Character offset into a whole-file document.
    Global {
        /// Offset of the first character of the top visible line.
        offset: usize,
    },
    /// Position inside one page of a paged document.
    Paged {
        /// Zero-based page number.
        page: usize,
        /// Offset of the top visible line inside the page.
        offset: usize,
    },
}

impl ProgressMarker {
    /// The character offset, global or in-page.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Global { offset } | Self::Paged { offset, .. } => offset,
        }
    }
}

/// Where to scroll so a restored position is at the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    /// Line containing the restored offset.
    pub line: usize,
    /// Character offset at which that line starts.
    pub line_start: usize,
    /// Vertical position of the line's top edge.
    pub y: f32,
}

/// The visual line structure of a laid-out text.
///
/// A renderer with soft wrapping implements this over its own layout; offsets
/// are character offsets into the laid-out text and lines are visual lines.
pub trait LineLayout {
    /// Length of the text in characters.
    fn text_len(&self) -> usize;

    /// Number of lines, at least one.
    fn line_count(&self) -> usize;

    /// The line containing character `offset`, for `offset` in
    /// `0..=text_len()`.
    fn line_for_offset(&self, offset: usize) -> usize;

    /// Character offset at which `line` starts.
    fn line_start(&self, line: usize) -> usize;

    /// Vertical position of the top of `line`.
    fn line_top(&self, line: usize) -> f32;

    /// The line displayed at vertical position `y`.
    fn line_at_y(&self, y: f32) -> usize;
}

/// Hard lines of a text, split after each `\n`, with a fixed line height.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLines {
    starts: Vec<usize>,
    text_len: usize,
    line_height: f32,
}

impl TextLines {
    /// Lay out `text` with lines `line_height` apart.
    #[must_use]
    pub fn new(text: &str, line_height: f32) -> Self {
        let mut starts = vec![0];
        let mut text_len = 0;
        for (i, c) in text.chars().enumerate() {
            text_len = i + 1;
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            text_len,
            line_height,
        }
    }
}

impl LineLayout for TextLines {
    fn text_len(&self) -> usize {
        self.text_len
    }

    fn line_count(&self) -> usize {
        self.starts.len()
    }

    fn line_for_offset(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).saturating_sub(1)
    }

    fn line_start(&self, line: usize) -> usize {
        self.starts
            .get(line)
            .or_else(|| self.starts.last())
            .copied()
            .unwrap_or(0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn line_top(&self, line: usize) -> f32 {
        line.min(self.line_count() - 1) as f32 * self.line_height
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn line_at_y(&self, y: f32) -> usize {
        let line = (y / self.line_height).floor();
        if line.is_nan() || line <= 0.0 {
            return 0;
        }
        // Saturating float-to-int cast keeps huge positions on the last line.
        (line as usize).min(self.line_count() - 1)
    }
}

/// Marker for a whole-file document scrolled to `scroll_y`.
#[must_use]
pub fn capture_global(layout: &impl LineLayout, scroll_y: f32) -> ProgressMarker {
    ProgressMarker::Global {
        offset: top_line_start(layout, scroll_y),
    }
}

/// Marker for `page` of a paged document scrolled to `scroll_y` within it.
#[must_use]
pub fn capture_paged(page: usize, layout: &impl LineLayout, scroll_y: f32) -> ProgressMarker {
    ProgressMarker::Paged {
        page,
        offset: top_line_start(layout, scroll_y),
    }
}

/// Scroll target for a stored global offset.
#[must_use]
pub fn restore_global(layout: &impl LineLayout, offset: usize) -> ScrollTarget {
    locate(layout, offset)
}

/// Scroll target for a stored in-page offset, given the layout of the page
/// the marker was clamped to (see [`clamp_page`]).
#[must_use]
pub fn restore_paged(page_layout: &impl LineLayout, offset: usize) -> ScrollTarget {
    locate(page_layout, offset)
}

/// Clamp a stored page number into `0..page_count`.
#[must_use]
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.min(page_count.saturating_sub(1))
}

/// Character range `[start, end)` of 1-based line `line_number`, excluding
/// its newline. `None` for line 0 or past the last line.
///
/// ```rust
/// use textpager::find_line_range;
///
/// assert_eq!(find_line_range("one\ntwo\n", 2), Some(4..7));
/// assert_eq!(find_line_range("one\ntwo\n", 3), Some(8..8));
/// assert_eq!(find_line_range("one\ntwo\n", 4), None);
/// ```
#[must_use]
pub fn find_line_range(text: &str, line_number: usize) -> Option<Range<usize>> {
    let index = line_number.checked_sub(1)?;
    let mut start = 0;
    let mut len = 0;
    let mut line = 0;
    for (i, c) in text.chars().enumerate() {
        len = i + 1;
        if c == '\n' {
            if line == index {
                return Some(start..i);
            }
            line += 1;
            start = i + 1;
        }
    }
    (line == index).then_some(start..len)
}

fn top_line_start(layout: &impl LineLayout, scroll_y: f32) -> usize {
    layout.line_start(layout.line_at_y(scroll_y))
}

fn locate(layout: &impl LineLayout, offset: usize) -> ScrollTarget {
    let offset = offset.min(layout.text_len());
    let line = layout.line_for_offset(offset);
    ScrollTarget {
        line,
        line_start: layout.line_start(line),
        y: layout.line_top(line),
    }
}
