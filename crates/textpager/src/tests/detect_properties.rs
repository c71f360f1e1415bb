use quickcheck::{QuickCheck, TestResult};

use crate::{Charset, CharsetSniffer, detect, quality};

fn test_count() -> u64 {
    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 2_000 } else { 200 };
    #[cfg(any(miri, feature = "test-fast"))]
    let tests = 5;
    tests
}

/// No controls besides whitespace, no replacement character, no BOM.
fn is_clean(c: char) -> bool {
    (!c.is_control() || matches!(c, '\t' | '\r' | '\n')) && !matches!(c, '\u{FFFD}' | '\u{FEFF}')
}

/// Property: control-free text encoded as UTF-8 detects as UTF-8 with a full
/// score.
#[test]
fn clean_utf8_detects_as_utf8_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> TestResult {
        let text: String = text.chars().filter(|&c| is_clean(c)).collect();
        if text.is_empty() {
            return TestResult::discard();
        }
        match detect(text.as_bytes()) {
            Ok(detection) => TestResult::from_bool(
                detection.charset == Charset::UTF_8 && (detection.score - 1.0).abs() < f32::EPSILON,
            ),
            Err(err) => TestResult::error(format!("{text:?}: {err}")),
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: a UTF-8 byte-order mark never changes the decoded text.
#[test]
fn bom_is_transparent_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> TestResult {
        let text: String = text.chars().filter(|&c| is_clean(c)).collect();
        if text.is_empty() {
            return TestResult::discard();
        }
        let sniffer = CharsetSniffer::default();
        let mut marked = vec![0xEF, 0xBB, 0xBF];
        marked.extend_from_slice(text.as_bytes());
        match (sniffer.decode(text.as_bytes()), sniffer.decode(&marked)) {
            (Ok(plain), Ok(with_bom)) => TestResult::from_bool(plain.text == with_bom.text && with_bom.text == text),
            _ => TestResult::failed(),
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: the quality score is always within `[0, 1]`.
#[test]
fn score_is_bounded_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        (0.0..=1.0).contains(&quality::score(&text))
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: detection never panics, whatever the input.
#[test]
fn detection_is_total_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let sniffer = CharsetSniffer::default();
        let whole = sniffer.detect(&bytes);
        let sample = sniffer.detect_sample(&bytes);
        // A strict whole-input decode implies a prefix decode.
        whole.is_err() || sample.is_ok()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}
