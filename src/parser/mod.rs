//! Parser Module
//!
//! Line-oriented recognition of the INI grammar.
//!
//! ## Responsibilities
//! - Classify each line as a section header, a key/value pair, or other
//! - Keep byte spans so values can be replaced in place
//! - Read lines without losing their terminators or original bytes
//!
//! ## Grammar
//! ```text
//! [SectionName]                 ^\[([0-9_ a-zA-Z]+)\]
//! key = value ; comment         \s*(.+?)\s*=\s*([^;\n]*)
//! ```
//! Anything else (blank lines, `;` comments, malformed text) is "other":
//! ignored on load, copied verbatim on save.

mod line;
mod reader;

pub use line::{
    classify, parse_header, parse_key_value, KeyValue, Line, COMMENT_MARKER, IMPLICIT_SECTION,
};
pub use reader::{LineReader, RawLine};
