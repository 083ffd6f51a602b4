//! Line Reader
//!
//! Splits a buffered stream into lines while remembering each line's
//! terminator, so a rewrite can reproduce the input byte for byte.
//!
//! Lines are read as bytes. Invalid UTF-8 never aborts a pass: `text` is a
//! lossy decoding used for classification, while `bytes` keeps the original
//! content for writing back.

use std::char::REPLACEMENT_CHARACTER;
use std::io::BufRead;
use std::ops::Range;

use crate::error::Result;

/// One physical line of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Line content without its terminator, exactly as read
    pub bytes: Vec<u8>,

    /// `bytes` decoded as UTF-8, invalid sequences replaced with U+FFFD
    pub text: String,

    /// `"\n"`, `"\r\n"`, or `""` for an unterminated final line
    pub terminator: &'static str,
}

impl RawLine {
    /// Build a line from its content bytes (terminator already stripped)
    pub fn new(bytes: Vec<u8>, terminator: &'static str) -> Self {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Self {
            bytes,
            text,
            terminator,
        }
    }

    /// Original bytes with `span` (a byte range of `text`) replaced.
    pub fn splice(&self, span: Range<usize>, replacement: &str) -> Vec<u8> {
        let start = self.raw_offset(span.start);
        let end = self.raw_offset(span.end);

        let mut out = Vec::with_capacity(self.bytes.len() + replacement.len());
        out.extend_from_slice(&self.bytes[..start]);
        out.extend_from_slice(replacement.as_bytes());
        out.extend_from_slice(&self.bytes[end..]);
        out
    }

    /// Map a char-boundary offset in `text` back to `bytes`.
    ///
    /// Each invalid sequence in `bytes` became one U+FFFD in `text`.
    fn raw_offset(&self, text_offset: usize) -> usize {
        let replacement_len = REPLACEMENT_CHARACTER.len_utf8();
        let mut raw = 0;
        let mut decoded = 0;

        loop {
            let err = match std::str::from_utf8(&self.bytes[raw..]) {
                Ok(_) => return raw + (text_offset - decoded),
                Err(e) => e,
            };

            let valid_len = err.valid_up_to();
            if text_offset <= decoded + valid_len {
                return raw + (text_offset - decoded);
            }
            raw += valid_len;
            decoded += valid_len;

            let bad_len = err.error_len().unwrap_or(self.bytes.len() - raw);
            raw += bad_len;
            decoded += replacement_len;
            if text_offset <= decoded {
                return raw;
            }
        }
    }
}

/// Iterator over the lines of a `BufRead`
pub struct LineReader<R> {
    inner: R,
    done: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    fn read_next(&mut self) -> Result<Option<RawLine>> {
        let mut bytes = Vec::new();
        if self.inner.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }

        let terminator = if bytes.ends_with(b"\r\n") {
            bytes.truncate(bytes.len() - 2);
            "\r\n"
        } else if bytes.ends_with(b"\n") {
            bytes.truncate(bytes.len() - 1);
            "\n"
        } else {
            ""
        };

        Ok(Some(RawLine::new(bytes, terminator)))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // Stop after the first error; the caller aborts the pass
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
