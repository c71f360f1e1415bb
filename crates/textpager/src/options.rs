/// Tunable limits for opening and paging documents.
///
/// The defaults are heuristics rather than derived constants; every field may
/// be adjusted independently.
///
/// # Examples
///
/// ```rust
/// use textpager::ReaderOptions;
///
/// let options = ReaderOptions {
///     page_target_bytes: 64 * 1024,
///     ..Default::default()
/// };
/// assert_eq!(options.page_cache_capacity, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderOptions {
    /// Documents with a known length below this many bytes are decoded whole.
    ///
    /// Longer documents, and documents of unknown length, are paged. This is
    /// also the byte cap for the whole-file read: a document that turns out to
    /// be longer falls back to paging.
    ///
    /// # Default
    ///
    /// `5_000_000`
    pub whole_file_threshold: u64,

    /// Number of leading bytes sampled to detect the charset of a paged
    /// document.
    ///
    /// # Default
    ///
    /// `256 * 1024`
    pub sample_bytes: usize,

    /// Bytes after which the page index starts looking for a newline to split
    /// at.
    ///
    /// # Default
    ///
    /// `128 * 1024`
    pub page_target_bytes: u64,

    /// Minimum quality score the detected charset must reach.
    ///
    /// # Default
    ///
    /// `0.90`
    pub min_quality: f32,

    /// Number of decoded pages kept in memory.
    ///
    /// # Default
    ///
    /// `10`
    pub page_cache_capacity: usize,

    /// Pages loaded on either side of the visible page.
    ///
    /// # Default
    ///
    /// `2`
    pub prefetch_radius: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            whole_file_threshold: 5_000_000,
            sample_bytes: 256 * 1024,
            page_target_bytes: 128 * 1024,
            min_quality: 0.90,
            page_cache_capacity: 10,
            prefetch_radius: 2,
        }
    }
}
