#![no_main]
use std::io::Cursor;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textpager::{Charset, MemorySource, PageIndex, PageIndexBuilder, detect, read_page};

#[derive(Debug, Arbitrary)]
struct Input {
    charset: u8,
    target: u16,
    splits: Vec<u16>,
    bytes: Vec<u8>,
}

fn charset_for(selector: u8) -> Charset {
    match selector % 4 {
        0 => Charset::UTF_8,
        1 => Charset::UTF_16LE,
        2 => Charset::UTF_16BE,
        _ => Charset::LEGACY[usize::from(selector / 4) % Charset::LEGACY.len()],
    }
}

fn chunked(bytes: &[u8], splits: &[u16], charset: Charset, target: u64) -> PageIndex {
    let mut builder = PageIndexBuilder::new(charset, target);
    let mut rest = bytes;
    for &s in splits {
        let size = usize::from(s) % (rest.len() + 1);
        let (head, tail) = rest.split_at(size);
        builder.feed(head);
        rest = tail;
    }
    builder.feed(rest);
    builder.finish()
}

fn pager(input: Input) {
    let Input { charset, target, splits, bytes } = input;
    let charset = charset_for(charset);
    let target = u64::from(target);

    let index = PageIndexBuilder::build(Cursor::new(&bytes), charset, target).expect("in-memory read");
    assert_eq!(index, chunked(&bytes, &splits, charset, target), "chunking changed the index");

    let offsets = index.offsets();
    assert_eq!(offsets.first(), Some(&0));
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    assert!(bytes.is_empty() || offsets.iter().all(|&o| o < bytes.len() as u64));
    if charset.is_utf16() {
        assert!(offsets.iter().all(|o| o % 2 == 0));
    }

    // Every page decodes, and detection never panics.
    let source = MemorySource::new("fuzz", bytes.clone());
    for range in index.ranges() {
        let _ = read_page(&source, charset, range);
    }
    if let Ok(detection) = detect(&bytes) {
        assert!((0.0..=1.0).contains(&detection.score));
    }
}

fuzz_target!(|input: Input| pager(input));
