//! Rejects byte samples that are not plausibly text.

use bstr::ByteSlice;

use crate::{charset::Bom, quality::ratio};

/// Thresholds for the binary-content heuristic.
///
/// # Default
///
/// An 8 KiB window; NULs must cover more than 10% of the window and more than
/// 90% of them must share a byte parity for the sample to pass as UTF-16;
/// more than 2% control bytes marks the sample as binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryGuard {
    /// Number of leading bytes inspected.
    pub window: usize,
    /// NUL density a UTF-16-like sample must exceed.
    pub min_nul_density: f32,
    /// Share of NULs the dominant parity class must exceed.
    pub min_parity_share: f32,
    /// Control-byte density above which the sample is binary.
    pub max_control_ratio: f32,
}

impl Default for BinaryGuard {
    fn default() -> Self {
        Self {
            window: 8 * 1024,
            min_nul_density: 0.10,
            min_parity_share: 0.90,
            max_control_ratio: 0.02,
        }
    }
}

impl BinaryGuard {
    /// Classify `sample`.
    ///
    /// NUL bytes are tolerated only when they look like the high halves of
    /// UTF-16 code units: dense enough and concentrated on one byte parity.
    /// They are not counted a second time as control bytes. A BOM announcing
    /// UTF-16 settles the NUL question in the sample's favour, but the
    /// control-byte check still applies.
    #[must_use]
    pub fn is_binary(&self, sample: &[u8], bom_hint: Option<Bom>) -> bool {
        if sample.is_empty() {
            return false;
        }
        let window = &sample[..sample.len().min(self.window.max(1))];

        if sample.find_byte(0).is_some() {
            if bom_hint.is_some_and(Bom::is_utf16) {
                return false;
            }
            if !self.looks_utf16(window) {
                return true;
            }
        }

        let control = window.iter().filter(|&&b| is_control_byte(b)).count();
        ratio(control, window.len()) > self.max_control_ratio
    }

    fn looks_utf16(&self, window: &[u8]) -> bool {
        let (even, odd) = window
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == 0)
            .fold((0usize, 0usize), |(even, odd), (i, _)| {
                if i % 2 == 0 { (even + 1, odd) } else { (even, odd + 1) }
            });
        let nuls = even + odd;
        nuls > 0
            && ratio(nuls, window.len()) > self.min_nul_density
            && ratio(even.max(odd), nuls) > self.min_parity_share
    }
}

/// [`BinaryGuard::is_binary`] with default thresholds.
#[must_use]
pub fn is_binary(sample: &[u8], bom_hint: Option<Bom>) -> bool {
    BinaryGuard::default().is_binary(sample, bom_hint)
}

fn is_control_byte(b: u8) -> bool {
    matches!(b, 0x01..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F)
}
