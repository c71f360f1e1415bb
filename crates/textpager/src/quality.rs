//! Text-likeness scoring for decoded candidates.

/// Score `text` in `[0, 1]`: the fraction of characters that are neither
/// U+FFFD nor a C0 control other than tab, CR and LF.
///
/// Empty text scores `1.0`.
///
/// ```rust
/// use textpager::quality::score;
///
/// assert_eq!(score("plain text\n"), 1.0);
/// assert_eq!(score("ab\u{FFFD}\u{1}"), 0.5);
/// ```
#[must_use]
pub fn score(text: &str) -> f32 {
    let (total, bad) = text.chars().fold((0usize, 0usize), |(total, bad), c| {
        (total + 1, bad + usize::from(is_suspicious(c)))
    });
    if total == 0 {
        return 1.0;
    }
    1.0 - ratio(bad, total)
}

fn is_suspicious(c: char) -> bool {
    c == char::REPLACEMENT_CHARACTER || (c < '\u{20}' && !matches!(c, '\t' | '\r' | '\n'))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) as f32
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", 1.0)]
    #[case::ascii("hello\r\n\tworld", 1.0)]
    #[case::cjk("你好，世界", 1.0)]
    #[case::all_replacement("\u{FFFD}\u{FFFD}", 0.0)]
    #[case::quarter_bad("abc\u{7}", 0.75)]
    fn scores(#[case] text: &str, #[case] expected: f32) {
        assert!((score(text) - expected).abs() < f32::EPSILON, "{text:?}");
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Two 3-byte characters and one bad one.
        assert!((score("你好\u{0}") - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn delete_is_not_penalised() {
        assert_eq!(score("\u{7F}"), 1.0);
    }
}
