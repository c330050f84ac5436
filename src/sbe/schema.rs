//! Loads an SBE XML schema into a `Schema`.
//!
//! Reads the custom `semanticType`/`scale` attributes the compiler
//! writes when present, but falls back to a primitive-only reading when
//! they're absent, so any conformant SBE schema loads — not just ones this
//! crate produced itself.

use roxmltree::{Document, Node};

use crate::error::SchemaError;
use crate::orchestra::Presence;

use super::layout::{DataField, FixedField, GroupLayout, MessageLayout, NullValue, Primitive, Schema, Semantic};

pub fn load_schema(xml: &str) -> Result<Schema, SchemaError> {
    let doc = Document::parse(xml).map_err(|e| SchemaError::Parse(e.to_string()))?;
    let root = doc.root_element();

    let schema_id = attr_u32(&root, "id").unwrap_or(0) as u16;
    let version = attr_u32(&root, "version").unwrap_or(0) as u16;

    let mut messages = std::collections::HashMap::new();
    for message_node in children_named(&root, "message") {
        let message = parse_message(&message_node)?;
        messages.insert(message.template_id, message);
    }

    if messages.is_empty() {
        return Err(SchemaError::NoMessages);
    }

    Ok(Schema { schema_id, version, messages })
}

fn local_name<'a, 'input>(node: &Node<'a, 'input>) -> &'a str {
    node.tag_name().name()
}

fn children_named<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(Node::is_element)
        .filter(|c| local_name(c) == name)
        .collect()
}

fn attr(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn attr_u32(node: &Node<'_, '_>, name: &str) -> Option<u32> {
    node.attribute(name)?.parse().ok()
}

fn parse_presence(node: &Node<'_, '_>) -> Presence {
    match node.attribute("presence") {
        Some("optional") => Presence::Optional,
        _ => Presence::Required,
    }
}

fn parse_semantic(node: &Node<'_, '_>) -> Semantic {
    match node.attribute("semanticType") {
        Some("NumInGroup") => Semantic::NumInGroup,
        Some("UTCTimestamp") => Semantic::Timestamp,
        Some("Boolean") => Semantic::Boolean,
        Some("Qty") | Some("Percentage") => {
            let scale = attr_u32(node, "scale").unwrap_or(0);
            Semantic::ScaledDecimal { scale }
        }
        _ => Semantic::Plain,
    }
}

fn parse_null_value(node: &Node<'_, '_>, primitive: Primitive) -> Option<NullValue> {
    let raw = node.attribute("nullValue")?;
    match primitive {
        Primitive::Double => Some(NullValue::Double),
        Primitive::Int64 => raw.parse::<i64>().ok().map(NullValue::Int),
        _ => raw.parse::<u64>().ok().map(NullValue::UInt),
    }
}

fn parse_fixed_field(node: &Node<'_, '_>) -> Option<FixedField> {
    let tag = attr_u32(node, "id")?;
    let primitive = Primitive::from_name(node.attribute("type")?)?;
    let offset = attr_u32(node, "offset")?;
    let presence = parse_presence(node);
    let semantic = parse_semantic(node);
    let null_value = parse_null_value(node, primitive);
    Some(FixedField { tag, offset, primitive, semantic, presence, null_value })
}

fn parse_data_field(node: &Node<'_, '_>) -> Option<DataField> {
    Some(DataField { tag: attr_u32(node, "id")? })
}

/// Parses the contents of a `<sbe:message>` or `<group>` element into its
/// fields, data fields, and nested groups, in document order.
fn parse_block(
    node: &Node<'_, '_>,
) -> (Vec<FixedField>, Vec<DataField>, Vec<GroupLayout>) {
    let mut fields = Vec::new();
    let mut data_fields = Vec::new();
    let mut groups = Vec::new();

    for child in node.children().filter(Node::is_element) {
        match local_name(&child) {
            "field" => {
                if let Some(field) = parse_fixed_field(&child) {
                    fields.push(field);
                }
            }
            "data" => {
                if let Some(data_field) = parse_data_field(&child) {
                    data_fields.push(data_field);
                }
            }
            "group" => {
                if let Some(group) = parse_group(&child) {
                    groups.push(group);
                }
            }
            _ => {} // unrecognized element: ignored
        }
    }

    (fields, data_fields, groups)
}

fn parse_group(node: &Node<'_, '_>) -> Option<GroupLayout> {
    let count_tag = attr_u32(node, "id")?;
    let declared_block_length = attr_u32(node, "blockLength")?;
    let (fields, data_fields, nested_groups) = parse_block(node);
    // `delimiterId` is the compiler's own extension recording the group's
    // first declared member in FIX order (see `compiler::emit_group`); a
    // schema that never set it (hand-written, or produced by another SBE
    // tool) falls back to the first fixed field, then the first data
    // field, then the first nested group — the same best-effort guess the
    // compiler itself would make, just without the declaration-order
    // guarantee.
    let delimiter_tag = attr_u32(node, "delimiterId").unwrap_or_else(|| {
        fields
            .first()
            .map(|f| f.tag)
            .or_else(|| data_fields.first().map(|d| d.tag))
            .or_else(|| nested_groups.first().map(|g| g.count_tag))
            .unwrap_or(count_tag)
    });
    Some(GroupLayout { count_tag, block_length: declared_block_length, fields, data_fields, nested_groups, delimiter_tag })
}

fn parse_message(node: &Node<'_, '_>) -> Result<MessageLayout, SchemaError> {
    let template_id = attr_u32(node, "id").ok_or_else(|| SchemaError::Parse("message missing id".to_string()))?;
    let name = attr(node, "name").ok_or_else(|| SchemaError::Parse("message missing name".to_string()))?;
    let declared_block_length =
        attr_u32(node, "blockLength").ok_or_else(|| SchemaError::Parse("message missing blockLength".to_string()))?;
    let (fields, data_fields, groups) = parse_block(node);

    let message =
        MessageLayout { template_id, name: name.clone(), block_length: declared_block_length, fields, data_fields, groups };

    let computed = message.computed_block_length();
    if computed != declared_block_length {
        return Err(SchemaError::BlockLengthMismatch { message: name, declared: declared_block_length, computed });
    }
    validate_group_block_lengths(&message.groups, &name)?;

    Ok(message)
}

fn validate_group_block_lengths(groups: &[GroupLayout], message_name: &str) -> Result<(), SchemaError> {
    for group in groups {
        let computed: u32 = group.fields.iter().map(FixedField::size).sum();
        if computed != group.block_length {
            return Err(SchemaError::BlockLengthMismatch {
                message: message_name.to_string(),
                declared: group.block_length,
                computed,
            });
        }
        validate_group_block_lengths(&group.nested_groups, message_name)?;
    }
    Ok(())
}
