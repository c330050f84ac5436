//! The FIX-datatype -> SBE-encoding decision table.

use crate::sbe::layout::{NullValue, Primitive, Semantic};

/// What a field's FIX datatype lowers to: either a fixed-size field with a
/// chosen primitive/semantic/null-value, or a variable-length string in
/// the data section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoding {
    Data,
    Fixed { primitive: Primitive, semantic: Semantic, null_value: Option<NullValue> },
}

/// Looks up the SBE encoding for a FIX datatype name, applying an optional
/// per-field scale override (`scaling_overrides`) for the two
/// datatype families that carry a scale factor.
///
/// `is_code_set` should be true when `type_name` names a declared
/// `CodeSet` rather than a primitive FIX datatype — any `*CodeSet` maps to
/// the same `Data` bucket as `String` regardless of its underlying type.
pub fn encoding_for(type_name: &str, is_code_set: bool, scale_override: Option<u32>) -> Encoding {
    if is_code_set {
        return Encoding::Data;
    }
    match type_name {
        "String" | "MultipleValueString" | "MultipleStringValue" | "MultipleCharValue"
        | "Country" | "Currency" | "Exchange" | "LocalMktDate" | "MonthYear" | "UTCDateOnly"
        | "UTCTimeOnly" => Encoding::Data,

        "char" => Encoding::Fixed {
            primitive: Primitive::Char,
            semantic: Semantic::Plain,
            null_value: Some(NullValue::UInt(0)),
        },

        "int" | "Length" | "SeqNum" | "TagNum" | "DayOfMonth" => Encoding::Fixed {
            primitive: Primitive::Uint32,
            semantic: Semantic::Plain,
            null_value: Some(NullValue::UInt(0xFFFF_FFFF)),
        },

        "NumInGroup" => Encoding::Fixed {
            primitive: Primitive::Uint16,
            semantic: Semantic::NumInGroup,
            null_value: Some(NullValue::UInt(0xFFFF)),
        },

        "Qty" | "Price" | "PriceOffset" | "Amt" => Encoding::Fixed {
            primitive: Primitive::Int64,
            semantic: Semantic::ScaledDecimal { scale: scale_override.unwrap_or(4) },
            null_value: Some(NullValue::Int(i64::MIN)),
        },

        "Percentage" => Encoding::Fixed {
            primitive: Primitive::Int64,
            semantic: Semantic::ScaledDecimal { scale: scale_override.unwrap_or(8) },
            null_value: Some(NullValue::Int(i64::MIN)),
        },

        "float" => Encoding::Fixed {
            primitive: Primitive::Double,
            semantic: Semantic::Plain,
            null_value: Some(NullValue::Double),
        },

        "UTCTimestamp" | "TZTimestamp" => Encoding::Fixed {
            primitive: Primitive::Uint64,
            semantic: Semantic::Timestamp,
            null_value: Some(NullValue::UInt(0)),
        },

        "Boolean" => Encoding::Fixed {
            primitive: Primitive::Uint8,
            semantic: Semantic::Boolean,
            null_value: Some(NullValue::UInt(0xFF)),
        },

        // Anything else falls back to the data bucket: an unrecognized
        // FIX datatype is far more likely to be a string-shaped extension
        // field than a numeric one, and a lossless passthrough is safer
        // than guessing a fixed-width encoding.
        _ => Encoding::Data,
    }
}
