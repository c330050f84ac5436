//! Encodes a `Descriptor` into SBE wire bytes against a loaded `Schema`.
//!
//! Scaled-decimal fields are parsed and scaled here (string -> `10^scale`
//! integer); the decoder deliberately does not reverse the scaling, so the
//! round-trip contract is numeric equality at tolerance, not byte-for-byte
//! string equality.

use crate::descriptor::{Descriptor, Node};
use crate::error::CodecError;

use super::layout::{DataField, FixedField, GroupLayout, Primitive, Schema, Semantic};
use crate::orchestra::Presence;

const HEADER_LEN: usize = 8;

/// Encodes `descriptor` as an instance of `message_id` from `schema`.
pub fn encode(schema: &Schema, message_id: u32, descriptor: &Descriptor) -> Result<Vec<u8>, CodecError> {
    let message = schema
        .message_by_id(message_id)
        .ok_or(CodecError::TemplateMismatch { expected: message_id as u16, found: 0 })?;

    let mut out = Vec::with_capacity(HEADER_LEN + message.block_length as usize);
    out.extend_from_slice(&(message.block_length as u16).to_le_bytes());
    out.extend_from_slice(&(message.template_id as u16).to_le_bytes());
    out.extend_from_slice(&schema.schema_id.to_le_bytes());
    out.extend_from_slice(&schema.version.to_le_bytes());

    out.extend_from_slice(&encode_block(&message.fields, descriptor)?);
    encode_data(&message.data_fields, descriptor, &mut out)?;
    encode_groups(&message.groups, descriptor, &mut out)?;

    Ok(out)
}

fn encode_block(fields: &[FixedField], descriptor: &Descriptor) -> Result<Vec<u8>, CodecError> {
    let len: usize = fields.iter().map(|f| f.size() as usize).sum();
    let mut buf = vec![0u8; len];
    for field in fields {
        let offset = field.offset as usize;
        let size = field.size() as usize;
        match descriptor.get(field.tag) {
            Some(Node::Scalar(value)) => {
                write_scalar(&mut buf[offset..offset + size], field, value)?;
            }
            Some(Node::Group(_)) => {
                return Err(CodecError::BadValue {
                    tag: field.tag,
                    reason: "expected a scalar, found a group".to_string(),
                })
            }
            None => {
                if field.presence == Presence::Required {
                    return Err(CodecError::BadValue { tag: field.tag, reason: "missing required value".to_string() });
                }
                if let Some(null_value) = field.null_value {
                    write_null(&mut buf[offset..offset + size], field.primitive, null_value);
                }
            }
        }
    }
    Ok(buf)
}

fn write_null(dst: &mut [u8], primitive: Primitive, null_value: super::layout::NullValue) {
    use super::layout::NullValue;
    match (primitive, null_value) {
        (Primitive::Double, NullValue::Double) => dst.copy_from_slice(&f64::NAN.to_le_bytes()),
        (_, NullValue::Int(v)) => dst.copy_from_slice(&v.to_le_bytes()[..dst.len()]),
        (_, NullValue::UInt(v)) => dst.copy_from_slice(&v.to_le_bytes()[..dst.len()]),
        _ => {}
    }
}

fn write_scalar(dst: &mut [u8], field: &FixedField, value: &str) -> Result<(), CodecError> {
    let bad = |reason: String| CodecError::BadValue { tag: field.tag, reason };

    match field.semantic {
        Semantic::Boolean => {
            let b = parse_boolean(value).map_err(bad)?;
            dst[0] = if b { 1 } else { 0 };
        }
        Semantic::Timestamp => {
            let t = parse_timestamp(value).map_err(bad)?;
            dst.copy_from_slice(&t.to_le_bytes());
        }
        Semantic::ScaledDecimal { scale } => {
            let v = parse_scaled_decimal(value, scale).map_err(bad)?;
            dst.copy_from_slice(&v.to_le_bytes());
        }
        Semantic::NumInGroup | Semantic::Plain => match field.primitive {
            Primitive::Char => {
                dst[0] = value.bytes().next().ok_or_else(|| bad("empty char value".to_string()))?;
            }
            Primitive::Uint8 => {
                let v: u8 = value.parse().map_err(|_| bad(format!("not a uint8: {value}")))?;
                dst[0] = v;
            }
            Primitive::Uint16 => {
                let v: u16 = value.parse().map_err(|_| bad(format!("not a uint16: {value}")))?;
                dst.copy_from_slice(&v.to_le_bytes());
            }
            Primitive::Uint32 => {
                let v: u32 = value.parse().map_err(|_| bad(format!("not a uint32: {value}")))?;
                dst.copy_from_slice(&v.to_le_bytes());
            }
            Primitive::Uint64 => {
                let v: u64 = value.parse().map_err(|_| bad(format!("not a uint64: {value}")))?;
                dst.copy_from_slice(&v.to_le_bytes());
            }
            Primitive::Int64 => {
                let v: i64 = value.parse().map_err(|_| bad(format!("not an int64: {value}")))?;
                dst.copy_from_slice(&v.to_le_bytes());
            }
            Primitive::Double => {
                let v: f64 = value.parse().map_err(|_| bad(format!("not a double: {value}")))?;
                dst.copy_from_slice(&v.to_le_bytes());
            }
        },
    }
    Ok(())
}

fn encode_data(data_fields: &[DataField], descriptor: &Descriptor, out: &mut Vec<u8>) -> Result<(), CodecError> {
    for field in data_fields {
        let bytes: &[u8] = match descriptor.get(field.tag) {
            Some(Node::Scalar(value)) => value.as_bytes(),
            Some(Node::Group(_)) => {
                return Err(CodecError::BadValue { tag: field.tag, reason: "expected data, found a group".to_string() })
            }
            None => &[],
        };
        if bytes.len() > u16::MAX as usize {
            return Err(CodecError::BadValue {
                tag: field.tag,
                reason: format!("data value of {} bytes exceeds the 65535-byte limit", bytes.len()),
            });
        }
        out.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
        out.extend_from_slice(bytes);
    }
    Ok(())
}

fn encode_groups(groups: &[GroupLayout], descriptor: &Descriptor, out: &mut Vec<u8>) -> Result<(), CodecError> {
    for group in groups {
        let entries: &[Descriptor] = match descriptor.get(group.count_tag) {
            Some(Node::Group(entries)) => entries,
            Some(Node::Scalar(_)) => {
                return Err(CodecError::BadValue {
                    tag: group.count_tag,
                    reason: "expected a group, found a scalar".to_string(),
                })
            }
            None => &[],
        };
        if entries.len() > u16::MAX as usize {
            return Err(CodecError::BadValue {
                tag: group.count_tag,
                reason: format!("group has {} entries, exceeding the 65535 limit", entries.len()),
            });
        }

        out.extend_from_slice(&(group.block_length as u16).to_le_bytes());
        out.extend_from_slice(&(entries.len() as u16).to_le_bytes());

        for entry in entries {
            out.extend_from_slice(&encode_block(&group.fields, entry)?);
            encode_data(&group.data_fields, entry, out)?;
            encode_groups(&group.nested_groups, entry, out)?;
        }
    }
    Ok(())
}

/// Parses a decimal string into its `10^scale`-scaled integer form,
/// truncating (not rounding) any fractional digits beyond `scale`.
fn parse_scaled_decimal(s: &str, scale: u32) -> Result<i64, String> {
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("empty numeric value: {s}"));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("not a decimal number: {s}"));
    }

    let scale = scale as usize;
    let mut frac = frac_part.to_string();
    if frac.len() > scale {
        frac.truncate(scale);
    } else {
        frac.extend(std::iter::repeat('0').take(scale - frac.len()));
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let magnitude: i64 = format!("{int_part}{frac}").parse().map_err(|_| format!("numeric overflow: {s}"))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Accepts either the raw 17-digit `YYYYMMDDHHMMSSmmm` wire form or the
/// human `YYYYMMDD-HH:MM:SS.mmm` form, returning the packed integer.
fn parse_timestamp(s: &str) -> Result<u64, String> {
    if s.len() == 17 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_err(|_| format!("timestamp overflow: {s}"));
    }
    let bytes = s.as_bytes();
    if s.len() == 21 && bytes[8] == b'-' && bytes[11] == b':' && bytes[14] == b':' && bytes[17] == b'.' {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == 17 {
            return digits.parse().map_err(|_| format!("timestamp overflow: {s}"));
        }
    }
    Err(format!("unrecognized timestamp format: {s}"))
}

fn parse_boolean(s: &str) -> Result<bool, String> {
    match s {
        "Y" | "y" | "true" | "1" => Ok(true),
        "N" | "n" | "false" | "0" => Ok(false),
        _ => Err(format!("not a boolean: {s}")),
    }
}
