#![allow(missing_docs, dead_code)]

use std::{io::Write, path::Path};

use tempfile::NamedTempFile;

pub const CHAPTERS: &str = "Chapter 1\nIt was a dark night.\n\nChapter 2\nThe end.\n";

pub fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

pub fn utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

pub fn with_bom(bom: &[u8], body: &[u8]) -> Vec<u8> {
    let mut bytes = bom.to_vec();
    bytes.extend_from_slice(body);
    bytes
}

/// `n` numbered lines of `width` bytes each, newline included.
pub fn numbered_lines(n: usize, width: usize) -> String {
    (0..n)
        .map(|i| {
            let mut line = format!("line {i:05} ");
            line.extend(std::iter::repeat_n('.', width.saturating_sub(line.len() + 1)));
            line.push('\n');
            line
        })
        .collect()
}

pub fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("textpager-")
        .suffix(".txt")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}
