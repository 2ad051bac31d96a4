//! Line reading shared by the text description parsers

use std::io::{self, BufRead};

/// Numbered lines of a text description.
///
/// Bytes that are not valid UTF-8 are replaced instead of failing the read.
/// Every directive is ASCII, so only names and comments can be affected.
pub(crate) struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
}

pub(crate) fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
        line_number: 0,
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    /// 1-based line number and the line without its terminator
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                let mut bytes = self.buf.as_slice();
                if let Some(rest) = bytes.strip_suffix(b"\n") {
                    bytes = rest;
                }
                if let Some(rest) = bytes.strip_suffix(b"\r") {
                    bytes = rest;
                }
                let line = String::from_utf8_lossy(bytes).into_owned();
                Some(Ok((self.line_number, line)))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
