//! The resolved, offset-exact layout for one SBE message or group. This is
//! the shared target both the schema loader populates from XML and the
//! encoder/decoder walk to place or read bytes.

use std::collections::{HashMap, HashSet};

use crate::descriptor::Tag;
use crate::orchestra::Presence;

/// The wire-level primitive an SBE field occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Char,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int64,
    Double,
}

impl Primitive {
    pub fn size(self) -> u32 {
        match self {
            Primitive::Char | Primitive::Uint8 => 1,
            Primitive::Uint16 => 2,
            Primitive::Uint32 => 4,
            Primitive::Uint64 | Primitive::Int64 | Primitive::Double => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Char => "char",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Int64 => "int64",
            Primitive::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        Some(match name {
            "char" => Primitive::Char,
            "uint8" => Primitive::Uint8,
            "uint16" => Primitive::Uint16,
            "uint32" => Primitive::Uint32,
            "uint64" => Primitive::Uint64,
            "int64" => Primitive::Int64,
            "double" => Primitive::Double,
            _ => return None,
        })
    }
}

/// The semantic interpretation layered on top of a fixed field's
/// `Primitive` — plain SBE has no native notion of a FIX `NumInGroup`
/// count, a scaled decimal, or a 17-digit timestamp, so the compiler
/// records it explicitly via a `semanticType` attribute in its emitted
/// schema, and the loader reconstructs it from there (falling back to a
/// primitive-only reading for schemas that never set it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    /// Plain integer/char/double with no special parsing beyond its
    /// primitive type (e.g. `int`, `Length`, `SeqNum`, `TagNum`,
    /// `DayOfMonth`, `char`, `float`).
    Plain,
    /// FIX `NumInGroup` — the count tag of a repeating group.
    NumInGroup,
    /// `Qty`/`Price`/`PriceOffset`/`Amt`/`Percentage`, scaled by `10^scale`
    /// on the wire.
    ScaledDecimal { scale: u32 },
    /// `UTCTimestamp`/`TZTimestamp`, stored as the 17-digit
    /// `YYYYMMDDHHMMSSmmm` form packed into a uint64.
    Timestamp,
    /// FIX `Boolean`, stored as `0`/`1`.
    Boolean,
}

impl Semantic {
    pub fn tag_name(self) -> &'static str {
        match self {
            Semantic::Plain => "Plain",
            Semantic::NumInGroup => "NumInGroup",
            Semantic::ScaledDecimal { scale } if scale == 4 => "Qty",
            Semantic::ScaledDecimal { .. } => "Percentage",
            Semantic::Timestamp => "UTCTimestamp",
            Semantic::Boolean => "Boolean",
        }
    }
}

/// The 64-bit null-value sentinel for a fixed field, in the field's own
/// primitive width. Stored widened to `u64`/`i64` bit patterns; the
/// encoder/decoder narrow as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NullValue {
    UInt(u64),
    Int(i64),
    Double, // IEEE NaN; there is exactly one bit pattern family, no parameter needed
}

/// A fixed-size field in a message's (or group's) root block.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedField {
    pub tag: Tag,
    pub offset: u32,
    pub primitive: Primitive,
    pub semantic: Semantic,
    pub presence: Presence,
    pub null_value: Option<NullValue>,
}

impl FixedField {
    pub fn size(&self) -> u32 {
        self.primitive.size()
    }
}

/// A variable-length string field in the message's (or group's) data
/// section, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    pub tag: Tag,
}

/// A repeating group: its own fixed block, its own data section, and any
/// nested groups, exactly mirroring a `MessageLayout` one level down.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout {
    pub count_tag: Tag,
    pub block_length: u32,
    pub fields: Vec<FixedField>,
    pub data_fields: Vec<DataField>,
    pub nested_groups: Vec<GroupLayout>,
    /// The tag that marks the start of each new entry in a flat FIX stream.
    /// This is the group's *first declared* member in Orchestra/FIX order —
    /// fixed or data field alike — not "the first fixed field": the
    /// compiler's own fixed-before-data block layout would otherwise
    /// reorder a data-field-first group (e.g. `NoPartyIDs`, which leads
    /// with `PartyID`, a `String`) out from under the entry boundary it
    /// actually has on the wire.
    pub delimiter_tag: Tag,
}

impl GroupLayout {
    /// Every tag this group's entries can carry, at this nesting level
    /// only (fields, data fields, and nested groups' count tags) — used by
    /// the descriptor assembler to know when an entry has run out of
    /// fields and the next tag belongs to a sibling entry or the parent.
    pub fn member_tags(&self) -> HashSet<Tag> {
        let mut set: HashSet<Tag> = self.fields.iter().map(|f| f.tag).collect();
        set.extend(self.data_fields.iter().map(|d| d.tag));
        set.extend(self.nested_groups.iter().map(|g| g.count_tag));
        set
    }

    pub fn nested_group_by_count_tag(&self, tag: Tag) -> Option<&GroupLayout> {
        self.nested_groups.iter().find(|g| g.count_tag == tag)
    }
}

/// The fully resolved layout of one message: header-independent block
/// length, fixed fields, data fields, and top-level groups, each in the
/// order fixed by the compiler (fixed fields, then data fields, then
/// groups).
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLayout {
    pub template_id: u32,
    pub name: String,
    pub block_length: u32,
    pub fields: Vec<FixedField>,
    pub data_fields: Vec<DataField>,
    pub groups: Vec<GroupLayout>,
}

impl MessageLayout {
    pub fn field(&self, tag: Tag) -> Option<&FixedField> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn group_by_count_tag(&self, tag: Tag) -> Option<&GroupLayout> {
        self.groups.iter().find(|g| g.count_tag == tag)
    }

    pub fn computed_block_length(&self) -> u32 {
        self.fields.iter().map(FixedField::size).sum()
    }
}

/// A loaded SBE schema: every message, indexed by template id and name.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub schema_id: u16,
    pub version: u16,
    pub messages: HashMap<u32, MessageLayout>,
}

impl Schema {
    pub fn message_by_id(&self, id: u32) -> Option<&MessageLayout> {
        self.messages.get(&id)
    }

    pub fn message_by_name(&self, name: &str) -> Option<&MessageLayout> {
        self.messages.values().find(|m| m.name == name)
    }
}
