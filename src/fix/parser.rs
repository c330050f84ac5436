//! Raw FIX string -> ordered `(tag, value)` pairs.
//!
//! Grounded on the tag-value separator handling conventions of FIX decoders
//! in the wider ecosystem (configurable separator, first-`=`-wins split)
//! while keeping a hand-rolled-scanner style rather than
//! pulling in a parser-combinator crate for something this small.

use crate::error::InputError;

/// Session tags stripped before any SBE work and never merkleized
/// `BeginString`, `BodyLength`, `CheckSum`, `MsgType`.
pub const SESSION_TAGS: [u32; 4] = [8, 9, 10, 35];

/// Which byte (or byte pair) separates `tag=value` fields in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Detect the separator from the first occurrence of SOH, `|`, or a
    /// newline in the input.
    Auto,
    /// ASCII SOH (`0x01`), the wire-accurate FIX tag-value separator.
    Soh,
    /// `|`, commonly used in place of SOH for human-readable logs/fixtures.
    Pipe,
    /// `\n` or `\r\n`.
    Newline,
}

/// Parses `input` with auto-detected separator and default session-tag
/// filtering. Equivalent to `parse_with_separator(input, Separator::Auto)`.
pub fn parse(input: &str) -> Result<Vec<(u32, String)>, InputError> {
    parse_with_separator(input, Separator::Auto)
}

/// Splits `input` on `separator`, then each field on its first `=`.
///
/// Empty segments and segments with no `=` are skipped silently. Session
/// tags are filtered out of the result. Declared order is
/// preserved. This function does not reject duplicate tags: duplicates are
/// only an error relative to a schema's group structure, which this module
/// has no knowledge of — see `crate::sbe::assemble`.
pub fn parse_with_separator(
    input: &str,
    separator: Separator,
) -> Result<Vec<(u32, String)>, InputError> {
    let sep = match separator {
        Separator::Auto => detect_separator(input)?,
        other => other,
    };

    let segments: Vec<&str> = match sep {
        Separator::Soh => input.split('\u{1}').collect(),
        Separator::Pipe => input.split('|').collect(),
        Separator::Newline => input.lines().collect(),
        Separator::Auto => unreachable!("resolved above"),
    };

    let mut pairs = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = segment.trim_end_matches('\r');
        if segment.is_empty() {
            continue;
        }
        let Some((tag_str, value)) = segment.split_once('=') else {
            continue;
        };
        let Ok(tag) = tag_str.trim().parse::<u32>() else {
            continue;
        };
        if SESSION_TAGS.contains(&tag) {
            continue;
        }
        pairs.push((tag, value.to_string()));
    }
    Ok(pairs)
}

fn detect_separator(input: &str) -> Result<Separator, InputError> {
    for byte in input.bytes() {
        match byte {
            0x01 => return Ok(Separator::Soh),
            b'|' => return Ok(Separator::Pipe),
            b'\n' => return Ok(Separator::Newline),
            _ => {}
        }
    }
    Err(InputError::NoSeparatorFound)
}
