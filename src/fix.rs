//! Splitting a raw FIX tag-value string into an ordered list of
//! `(tag, value)` pairs, ready for the SBE encoder or the leaf enumerator.

pub mod parser;

pub use parser::{parse, parse_with_separator, Separator, SESSION_TAGS};
