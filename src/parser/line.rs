//! Line classification
//!
//! Recognizes section headers and `key = value` lines, keeping byte spans
//! into the original line so the save pass can splice a new value in
//! without touching anything else.

use std::ops::Range;

/// Section that holds pairs appearing before the first header
pub const IMPLICIT_SECTION: &str = "none";

/// Start of an inline comment
pub const COMMENT_MARKER: char = ';';

/// A classified line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `[Name]` at the start of the line; holds the untrimmed bracket contents
    Header(&'a str),

    /// `key = value ; comment`
    KeyValue(KeyValue<'a>),

    /// Blank, comment-only or malformed
    Other,
}

/// Classify a single line (without its terminator).
///
/// Header syntax cannot contain `=`, so only a header followed by a trailing
/// comment containing `=` (`[Net] ; a=b`) matches both grammars. Headers win,
/// and load and save both go through here so they always agree.
pub fn classify(line: &str) -> Line<'_> {
    if let Some(name) = parse_header(line) {
        return Line::Header(name);
    }
    match parse_key_value(line) {
        Some(kv) => Line::KeyValue(kv),
        None => Line::Other,
    }
}

/// Match `^\[([0-9_ a-zA-Z]+)\]`, returning the untrimmed name.
///
/// Anything after the closing bracket is ignored.
pub fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(|c: char| !is_header_char(c))?;
    if end == 0 || !rest[end..].starts_with(']') {
        return None;
    }
    Some(&rest[..end])
}

fn is_header_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ' '
}

/// Match `\s*(.+?)\s*=\s*([^;\n]*)`.
///
/// The key is at least one character long, so an `=` in the very first
/// column only counts if another `=` follows it. Commented-out lines
/// (`; key = value`) never match.
pub fn parse_key_value(line: &str) -> Option<KeyValue<'_>> {
    if line.trim_start().starts_with(COMMENT_MARKER) {
        return None;
    }

    let first_len = line.chars().next()?.len_utf8();
    let eq = first_len + line[first_len..].find('=')?;

    let indent = line.len() - line.trim_start().len();
    let key = if indent < eq {
        indent..indent + line[indent..eq].trim_end().len()
    } else {
        // Only whitespace precedes `=`: the key is the last blank before it
        let (start, _) = line[..eq].char_indices().next_back()?;
        start..eq
    };

    let after_eq = eq + 1;
    let value_start = after_eq + (line[after_eq..].len() - line[after_eq..].trim_start().len());
    let value_end = line[value_start..]
        .find(COMMENT_MARKER)
        .map_or(line.len(), |i| value_start + i);

    Some(KeyValue {
        line,
        key,
        eq,
        value: value_start..value_end,
    })
}

/// Spans of a matched `key = value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue<'a> {
    line: &'a str,
    key: Range<usize>,
    eq: usize,
    value: Range<usize>,
}

impl<'a> KeyValue<'a> {
    /// Key exactly as captured
    pub fn key_raw(&self) -> &'a str {
        &self.line[self.key.clone()]
    }

    /// Value span up to the comment marker, trailing blanks included
    pub fn value_raw(&self) -> &'a str {
        &self.line[self.value.clone()]
    }

    /// Key with surrounding whitespace removed
    pub fn key(&self) -> &'a str {
        self.key_raw().trim()
    }

    /// Value with surrounding whitespace removed
    pub fn value(&self) -> &'a str {
        self.value_raw().trim()
    }

    /// Byte offset of the `=` separator
    pub fn eq_offset(&self) -> usize {
        self.eq
    }

    /// Rebuild the line with `new_value` in place of the value span.
    ///
    /// The new value is right-padded with spaces to the span's width in
    /// chars; a longer value grows the line. Everything up to and including
    /// the blanks after `=`, and everything from the comment marker on, is
    /// kept as is.
    pub fn replace_value(&self, new_value: &str) -> String {
        format!(
            "{}{}{}",
            &self.line[..self.value.start],
            self.padded_value(new_value),
            &self.line[self.value.end..],
        )
    }

    /// Byte range of the value span within the line
    pub fn value_span(&self) -> Range<usize> {
        self.value.clone()
    }

    /// `new_value` right-padded to the width of the current value span
    pub fn padded_value(&self, new_value: &str) -> String {
        let width = self.value_raw().chars().count();
        format!("{:<width$}", new_value)
    }
}
