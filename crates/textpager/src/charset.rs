//! Encoding identities and byte-order marks.

use std::{borrow::Cow, fmt};

use encoding_rs::{
    BIG5_INIT, DecoderResult, EUC_KR_INIT, Encoding, GB18030_INIT, GBK_INIT, SHIFT_JIS_INIT, UTF_8_INIT,
    UTF_16BE_INIT, UTF_16LE_INIT,
};

/// A text encoding the reader can decode.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Charset(&'static Encoding);

impl Charset {
    /// UTF-8.
    pub const UTF_8: Self = Self(&UTF_8_INIT);
    /// UTF-16, little endian.
    pub const UTF_16LE: Self = Self(&UTF_16LE_INIT);
    /// UTF-16, big endian.
    pub const UTF_16BE: Self = Self(&UTF_16BE_INIT);

    /// Legacy multi-byte encodings tried after the Unicode ones, in order.
    pub const LEGACY: [Self; 5] = [
        Self(&GB18030_INIT),
        Self(&GBK_INIT),
        Self(&BIG5_INIT),
        Self(&SHIFT_JIS_INIT),
        Self(&EUC_KR_INIT),
    ];

    /// The underlying `encoding_rs` encoding.
    #[must_use]
    pub const fn encoding(self) -> &'static Encoding {
        self.0
    }

    /// Canonical display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Whether the encoding uses 2-byte code units.
    #[must_use]
    pub fn is_utf16(self) -> bool {
        self == Self::UTF_16LE || self == Self::UTF_16BE
    }

    /// The newline code unit as it appears in the byte stream, for 16-bit
    /// encodings only.
    #[must_use]
    pub fn utf16_newline(self) -> Option<[u8; 2]> {
        if self == Self::UTF_16LE {
            Some([0x0A, 0x00])
        } else if self == Self::UTF_16BE {
            Some([0x00, 0x0A])
        } else {
            None
        }
    }

    /// Drop this encoding's byte-order mark from the front of `bytes`, if
    /// present. A mark announcing a different encoding is left in place.
    #[must_use]
    pub fn strip_bom(self, bytes: &[u8]) -> &[u8] {
        match Bom::sniff(bytes) {
            Some(bom) if bom.charset() == self => &bytes[bom.byte_len()..],
            _ => bytes,
        }
    }

    /// Decode, failing on the first malformed or unmappable sequence.
    #[must_use]
    pub fn decode_strict(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
    }

    /// Strictly decode a prefix of a longer stream.
    ///
    /// Like [`Charset::decode_strict`], except that an incomplete sequence at
    /// the very end of `bytes` is dropped instead of failing the decode, so a
    /// sample cut mid-character still qualifies.
    #[must_use]
    pub fn decode_strict_prefix(self, bytes: &[u8]) -> Option<String> {
        let mut decoder = self.0.new_decoder_without_bom_handling();
        let capacity = decoder.max_utf8_buffer_length_without_replacement(bytes.len())?;
        let mut out = String::with_capacity(capacity);
        match decoder.decode_to_string_without_replacement(bytes, &mut out, false) {
            (DecoderResult::InputEmpty, _) => Some(out),
            (DecoderResult::Malformed(..) | DecoderResult::OutputFull, _) => None,
        }
    }

    /// Decode, substituting U+FFFD for malformed or unmappable sequences.
    #[must_use]
    pub fn decode_lossy(self, bytes: &[u8]) -> Cow<'_, str> {
        self.0.decode_without_bom_handling(bytes).0
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A byte-order mark found at the start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    /// `EF BB BF`
    Utf8,
    /// `FF FE`
    Utf16Le,
    /// `FE FF`
    Utf16Be,
}

impl Bom {
    /// Identify the mark at the start of `bytes`.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => Some(Self::Utf8),
            [0xFF, 0xFE, ..] => Some(Self::Utf16Le),
            [0xFE, 0xFF, ..] => Some(Self::Utf16Be),
            _ => None,
        }
    }

    /// Length of the mark in bytes.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::Utf8 => 3,
            Self::Utf16Le | Self::Utf16Be => 2,
        }
    }

    /// The encoding the mark announces.
    #[must_use]
    pub const fn charset(self) -> Charset {
        match self {
            Self::Utf8 => Charset::UTF_8,
            Self::Utf16Le => Charset::UTF_16LE,
            Self::Utf16Be => Charset::UTF_16BE,
        }
    }

    /// Whether the mark announces a 16-bit encoding.
    #[must_use]
    pub const fn is_utf16(self) -> bool {
        matches!(self, Self::Utf16Le | Self::Utf16Be)
    }
}
