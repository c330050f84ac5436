//! Decodes SBE wire bytes into a typed tree, against a loaded `Schema`.
//!
//! Scaled-decimal fields are returned as their raw on-wire integer — the
//! decoder never reverses the encoder's `10^scale` scaling, matching the
//! numeric-equality-at-tolerance round-trip contract. Fields
//! that decode to their declared `nullValue`, and empty data/group values,
//! are dropped from the output rather than represented as an explicit
//! empty/null node.

use crate::descriptor::Tag;
use crate::error::CodecError;

use super::layout::{DataField, FixedField, GroupLayout, NullValue, Primitive, Schema, Semantic};

const HEADER_LEN: usize = 8;

/// A single decoded scalar value, still in its on-wire numeric form.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    UInt(u64),
    Int(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    /// Packed `YYYYMMDDHHMMSSmmm`, unpacked by the caller if needed.
    Timestamp(u64),
    Bytes(String),
}

/// One tag's decoded value: either a scalar or a repeating group's entries.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedNode {
    Value(DecodedValue),
    Group(Vec<DecodedEntry>),
}

/// One occurrence of a repeating group: the same tag -> node shape as a
/// top-level message, minus the template id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedEntry {
    pub fields: Vec<(Tag, DecodedNode)>,
}

/// A fully decoded SBE message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub template_id: u32,
    pub fields: Vec<(Tag, DecodedNode)>,
}

pub fn decode(schema: &Schema, message_id: u32, bytes: &[u8]) -> Result<DecodedMessage, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated("message header"));
    }
    let block_length = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
    let template_id = u16::from_le_bytes([bytes[2], bytes[3]]);

    if template_id as u32 != message_id {
        return Err(CodecError::TemplateMismatch { expected: message_id as u16, found: template_id });
    }
    let message = schema
        .message_by_id(message_id)
        .ok_or(CodecError::TemplateMismatch { expected: message_id as u16, found: template_id })?;

    let mut pos = HEADER_LEN;
    let block_end = pos + block_length;
    if block_end > bytes.len() {
        return Err(CodecError::Truncated("root block"));
    }

    let mut fields = Vec::new();
    decode_fixed_fields(&message.fields, &bytes[pos..block_end], &mut fields)?;
    pos = block_end;
    decode_data_fields(&message.data_fields, bytes, &mut pos, &mut fields)?;
    decode_groups(&message.groups, bytes, &mut pos, &mut fields)?;

    Ok(DecodedMessage { template_id: template_id as u32, fields })
}

fn decode_fixed_fields(
    fields: &[FixedField],
    block: &[u8],
    out: &mut Vec<(Tag, DecodedNode)>,
) -> Result<(), CodecError> {
    for field in fields {
        let offset = field.offset as usize;
        let size = field.size() as usize;
        if offset + size > block.len() {
            return Err(CodecError::Truncated("fixed field"));
        }
        let raw = &block[offset..offset + size];
        if let Some(null_value) = field.null_value {
            if raw_is_null(raw, null_value) {
                continue;
            }
        }
        out.push((field.tag, DecodedNode::Value(decode_scalar(field, raw))));
    }
    Ok(())
}

fn raw_is_null(raw: &[u8], null_value: NullValue) -> bool {
    match null_value {
        NullValue::Double => f64::from_le_bytes(raw.try_into().unwrap()).is_nan(),
        NullValue::Int(expected) => {
            let actual = match raw.len() {
                8 => i64::from_le_bytes(raw.try_into().unwrap()),
                _ => return false,
            };
            actual == expected
        }
        NullValue::UInt(expected) => {
            let actual = match raw.len() {
                1 => raw[0] as u64,
                2 => u16::from_le_bytes(raw.try_into().unwrap()) as u64,
                4 => u32::from_le_bytes(raw.try_into().unwrap()) as u64,
                8 => u64::from_le_bytes(raw.try_into().unwrap()),
                _ => return false,
            };
            actual == expected
        }
    }
}

fn decode_scalar(field: &FixedField, raw: &[u8]) -> DecodedValue {
    match field.semantic {
        Semantic::Boolean => DecodedValue::Bool(raw[0] != 0),
        Semantic::Timestamp => DecodedValue::Timestamp(u64::from_le_bytes(raw.try_into().unwrap())),
        Semantic::ScaledDecimal { .. } => DecodedValue::Int(i64::from_le_bytes(raw.try_into().unwrap())),
        Semantic::NumInGroup | Semantic::Plain => match field.primitive {
            Primitive::Char => DecodedValue::Char(raw[0] as char),
            Primitive::Uint8 => DecodedValue::UInt(raw[0] as u64),
            Primitive::Uint16 => DecodedValue::UInt(u16::from_le_bytes(raw.try_into().unwrap()) as u64),
            Primitive::Uint32 => DecodedValue::UInt(u32::from_le_bytes(raw.try_into().unwrap()) as u64),
            Primitive::Uint64 => DecodedValue::UInt(u64::from_le_bytes(raw.try_into().unwrap())),
            Primitive::Int64 => DecodedValue::Int(i64::from_le_bytes(raw.try_into().unwrap())),
            Primitive::Double => DecodedValue::Double(f64::from_le_bytes(raw.try_into().unwrap())),
        },
    }
}

fn decode_data_fields(
    data_fields: &[DataField],
    bytes: &[u8],
    pos: &mut usize,
    out: &mut Vec<(Tag, DecodedNode)>,
) -> Result<(), CodecError> {
    for field in data_fields {
        if *pos + 2 > bytes.len() {
            return Err(CodecError::Truncated("data field length"));
        }
        let len = u16::from_le_bytes([bytes[*pos], bytes[*pos + 1]]) as usize;
        *pos += 2;
        if *pos + len > bytes.len() {
            return Err(CodecError::LengthOverrun { declared: len, remaining: bytes.len() - *pos });
        }
        let raw = &bytes[*pos..*pos + len];
        *pos += len;
        if len == 0 {
            continue;
        }
        out.push((field.tag, DecodedNode::Value(DecodedValue::Bytes(String::from_utf8_lossy(raw).into_owned()))));
    }
    Ok(())
}

fn decode_groups(
    groups: &[GroupLayout],
    bytes: &[u8],
    pos: &mut usize,
    out: &mut Vec<(Tag, DecodedNode)>,
) -> Result<(), CodecError> {
    for group in groups {
        if *pos + 4 > bytes.len() {
            return Err(CodecError::Truncated("group dimension header"));
        }
        let block_length = u16::from_le_bytes([bytes[*pos], bytes[*pos + 1]]) as usize;
        let count = u16::from_le_bytes([bytes[*pos + 2], bytes[*pos + 3]]) as usize;
        *pos += 4;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            if *pos + block_length > bytes.len() {
                return Err(CodecError::Truncated("group entry block"));
            }
            let block = &bytes[*pos..*pos + block_length];
            let mut entry_fields = Vec::new();
            decode_fixed_fields(&group.fields, block, &mut entry_fields)?;
            *pos += block_length;
            decode_data_fields(&group.data_fields, bytes, pos, &mut entry_fields)?;
            decode_groups(&group.nested_groups, bytes, pos, &mut entry_fields)?;
            entries.push(DecodedEntry { fields: entry_fields });
        }

        if count > 0 {
            out.push((group.count_tag, DecodedNode::Group(entries)));
        }
    }
    Ok(())
}
