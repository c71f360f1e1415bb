//! Charset detection by strict trial decoding.
//!
//! Every candidate encoding is asked to decode the bytes without substitution.
//! Candidates that succeed are ranked by [`quality::score`]; the first
//! candidate with the highest score wins. The candidate order therefore
//! matters: a byte-order-mark hint goes first, then UTF-8, the two UTF-16
//! byte orders, and finally the legacy CJK encodings.

use tracing::debug;

use crate::{
    binary::BinaryGuard,
    charset::{Bom, Charset},
    error::{DocumentError, Result},
    options::ReaderOptions,
    quality,
};

/// An encoding to try, and whether a leading BOM is removed before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCandidate {
    /// The encoding.
    pub charset: Charset,
    /// Strip the detected BOM when decoding with this candidate.
    pub strip_bom: bool,
}

/// The outcome of a successful detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// The winning encoding.
    pub charset: Charset,
    /// Its quality score in `[0, 1]`.
    pub score: f32,
    /// The byte-order mark found at the start of the input.
    pub bom: Option<Bom>,
}

/// A detection together with the text it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Decoded text, without BOM.
    pub text: String,
    /// How it was decoded.
    pub detection: Detection,
}

/// Identifies the encoding of raw bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharsetSniffer {
    /// Binary-content heuristic applied before any decoding.
    pub guard: BinaryGuard,
    /// Winning scores below this are rejected as not plain text.
    pub min_quality: f32,
}

impl Default for CharsetSniffer {
    fn default() -> Self {
        Self::from_options(&ReaderOptions::default())
    }
}

impl CharsetSniffer {
    /// Build a sniffer from reader options.
    #[must_use]
    pub fn from_options(options: &ReaderOptions) -> Self {
        Self {
            guard: BinaryGuard::default(),
            min_quality: options.min_quality,
        }
    }

    /// Ordered, de-duplicated candidate list for a given BOM hint.
    #[must_use]
    pub fn candidates(bom: Option<Bom>) -> Vec<CodecCandidate> {
        let unicode = [Charset::UTF_8, Charset::UTF_16LE, Charset::UTF_16BE];
        let mut out: Vec<CodecCandidate> = Vec::with_capacity(1 + unicode.len() + Charset::LEGACY.len());
        let ordered = bom
            .map(Bom::charset)
            .into_iter()
            .chain(unicode)
            .chain(Charset::LEGACY);
        for charset in ordered {
            if out.iter().any(|c| c.charset == charset) {
                continue;
            }
            out.push(CodecCandidate {
                charset,
                strip_bom: bom.is_some_and(|b| b.charset() == charset),
            });
        }
        out
    }

    /// Detect and decode a complete document.
    ///
    /// # Errors
    ///
    /// [`DocumentError::BinaryContent`], [`DocumentError::UnidentifiableEncoding`]
    /// or [`DocumentError::LowQuality`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded> {
        self.run(bytes, |charset, input| {
            charset.decode_strict(input).map(std::borrow::Cow::into_owned)
        })
    }

    /// Detect the encoding of a complete document.
    ///
    /// # Errors
    ///
    /// Same as [`CharsetSniffer::decode`].
    pub fn detect(&self, bytes: &[u8]) -> Result<Detection> {
        self.decode(bytes).map(|decoded| decoded.detection)
    }

    /// Detect the encoding from the leading bytes of a larger document.
    ///
    /// An incomplete character at the end of the sample does not disqualify a
    /// candidate. An empty sample detects as UTF-8.
    ///
    /// # Errors
    ///
    /// Same as [`CharsetSniffer::decode`].
    pub fn detect_sample(&self, sample: &[u8]) -> Result<Detection> {
        self.run(sample, Charset::decode_strict_prefix)
            .map(|decoded| decoded.detection)
    }

    fn run(
        &self,
        bytes: &[u8],
        strict: impl Fn(Charset, &[u8]) -> Option<String>,
    ) -> Result<Decoded> {
        let bom = Bom::sniff(bytes);
        if self.guard.is_binary(bytes, bom) {
            debug!(len = bytes.len(), "sample rejected as binary");
            return Err(DocumentError::BinaryContent);
        }

        let mut best: Option<Decoded> = None;
        for candidate in Self::candidates(bom) {
            let input = match bom {
                Some(bom) if candidate.strip_bom => &bytes[bom.byte_len()..],
                _ => bytes,
            };
            let Some(text) = strict(candidate.charset, input) else {
                continue;
            };
            let score = quality::score(&text);
            if best.as_ref().is_none_or(|b| score > b.detection.score) {
                best = Some(Decoded {
                    text,
                    detection: Detection {
                        charset: candidate.charset,
                        score,
                        bom,
                    },
                });
            }
        }

        let best = best.ok_or(DocumentError::UnidentifiableEncoding)?;
        let Detection { charset, score, .. } = best.detection;
        if score < self.min_quality {
            debug!(%charset, score, "best decode below quality threshold");
            return Err(DocumentError::LowQuality { charset, score });
        }
        debug!(%charset, score, bom = ?bom, "charset detected");
        Ok(best)
    }
}

/// [`CharsetSniffer::detect`] with default settings.
///
/// # Errors
///
/// See [`CharsetSniffer::decode`].
pub fn detect(bytes: &[u8]) -> Result<Detection> {
    CharsetSniffer::default().detect(bytes)
}

/// [`CharsetSniffer::detect_sample`] with default settings.
///
/// # Errors
///
/// See [`CharsetSniffer::decode`].
pub fn detect_sample(sample: &[u8]) -> Result<Detection> {
    CharsetSniffer::default().detect_sample(sample)
}
