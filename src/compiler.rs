//! Orchestra repository -> SBE XML schema compiler.
//!
//! Resolves `componentRef`/`groupRef` eagerly (inlining components,
//! recursing into groups) so the rest of the crate only ever sees plain
//! fields and groups, never references — this sidesteps component-reference
//! cycles without a separate cycle-detection pass.

pub mod types;

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::descriptor::Tag;
use crate::error::SchemaError;
use crate::orchestra::model::{Group, Message, Presence, Ref, Repository};
use crate::sbe::layout::{NullValue, Primitive, Semantic};

use types::Encoding;

/// A fixed field as resolved by the compiler, before offsets are assigned.
struct CompiledField {
    tag: Tag,
    primitive: Primitive,
    semantic: Semantic,
    null_value: Option<NullValue>,
    presence: Presence,
}

struct CompiledGroup {
    name: String,
    count_tag: Tag,
    fields: Vec<CompiledField>,
    data_tags: Vec<Tag>,
    nested: Vec<CompiledGroup>,
    /// The group's first declared member field (fixed or data, in
    /// Orchestra/FIX order, before the compiler's fixed-before-data block
    /// layout reorders them) — the entry delimiter a flat-stream assembler
    /// must use. See `GroupLayout::delimiter_tag`.
    delimiter_tag: Tag,
}

struct CompiledMessage {
    name: String,
    template_id: u32,
    fields: Vec<CompiledField>,
    data_tags: Vec<Tag>,
    groups: Vec<CompiledGroup>,
}

/// The outcome of flattening a ref list: fixed/data fields and top-level
/// group references, in encounter order, with components inlined.
struct Flattened<'repo> {
    fixed: Vec<(&'repo crate::orchestra::model::Field, Presence)>,
    data: Vec<(&'repo crate::orchestra::model::Field, Presence)>,
    groups: Vec<(&'repo Group, Presence)>,
    /// Every resolved field's tag (fixed or data alike), in the original
    /// declaration order — the fixed/data split above reorders fields, but
    /// the entry-delimiter choice for a group needs the order as declared.
    field_order: Vec<Tag>,
}

/// Compiles `repo` into an SBE XML schema string.
///
/// `target` selects a single message by name to compile; `None` compiles
/// every message in the repository. `scaling_overrides` supplies per-field
/// scale exponents that replace the type mapping table's defaults for
/// `Qty`/`Price`/`PriceOffset`/`Amt`/`Percentage` fields.
pub fn compile_schema(
    repo: &Repository,
    target: Option<&str>,
    scaling_overrides: &HashMap<Tag, u32>,
) -> Result<String, SchemaError> {
    let messages: Vec<&Message> = match target {
        Some(name) => {
            let message = repo
                .message_by_name(name)
                .ok_or_else(|| SchemaError::UnknownMessage(name.to_string()))?;
            vec![message]
        }
        None => repo.messages.iter().collect(),
    };

    let mut compiled = Vec::with_capacity(messages.len());
    for message in messages {
        compiled.push(compile_message(repo, message, scaling_overrides)?);
    }

    Ok(emit_schema(&compiled))
}

fn compile_message(
    repo: &Repository,
    message: &Message,
    scaling_overrides: &HashMap<Tag, u32>,
) -> Result<CompiledMessage, SchemaError> {
    let flattened = flatten_refs(repo, &message.refs);

    let fields: Vec<CompiledField> = flattened
        .fixed
        .iter()
        .map(|(field, presence)| compiled_field(field, *presence, scaling_overrides))
        .collect();
    let data_tags: Vec<Tag> = flattened.data.iter().map(|(field, _)| field.id).collect();
    let groups: Vec<CompiledGroup> = flattened
        .groups
        .iter()
        .map(|(group, _presence)| compile_group(repo, group, scaling_overrides))
        .collect::<Result<_, _>>()?;

    if fields.is_empty() && data_tags.is_empty() && groups.is_empty() {
        return Err(SchemaError::EmptyMessage(message.name.clone()));
    }

    Ok(CompiledMessage { name: message.name.clone(), template_id: message.id, fields, data_tags, groups })
}

fn compile_group(
    repo: &Repository,
    group: &Group,
    scaling_overrides: &HashMap<Tag, u32>,
) -> Result<CompiledGroup, SchemaError> {
    let flattened = flatten_refs(repo, &group.refs);
    let count_tag = group.num_in_group_field_id;

    let fields: Vec<CompiledField> = flattened
        .fixed
        .iter()
        .filter(|(field, _)| field.id != count_tag) // the count tag lives in the dimension, not the block
        .map(|(field, presence)| compiled_field(field, *presence, scaling_overrides))
        .collect();
    let data_tags: Vec<Tag> = flattened
        .data
        .iter()
        .filter(|(field, _)| field.id != count_tag)
        .map(|(field, _)| field.id)
        .collect();
    let nested: Vec<CompiledGroup> = flattened
        .groups
        .iter()
        .map(|(g, _)| compile_group(repo, g, scaling_overrides))
        .collect::<Result<_, _>>()?;

    // The entry delimiter is the group's first declared member in FIX
    // order (fixed or data field alike), excluding the count tag itself —
    // never "the first fixed field", which the block-layout split above
    // would get wrong for a data-field-first group such as `NoPartyIDs`
    // (which leads with `PartyID`, a `String`/data field). Falls back to
    // the first nested group's count tag for the (spec-unaddressed) case
    // of a group with no scalar members of its own.
    let delimiter_tag = flattened
        .field_order
        .iter()
        .find(|&&tag| tag != count_tag)
        .copied()
        .or_else(|| nested.first().map(|g| g.count_tag))
        .unwrap_or(count_tag);

    Ok(CompiledGroup { name: group.name.clone(), count_tag, fields, data_tags, nested, delimiter_tag })
}

fn compiled_field(
    field: &crate::orchestra::model::Field,
    presence: Presence,
    scaling_overrides: &HashMap<Tag, u32>,
) -> CompiledField {
    let override_scale = scaling_overrides.get(&field.id).copied();
    match types::encoding_for(&field.type_name, false, override_scale) {
        Encoding::Data => unreachable!("data fields are filtered out before this call"),
        Encoding::Fixed { primitive, semantic, null_value } => {
            CompiledField { tag: field.id, primitive, semantic, null_value, presence }
        }
    }
}

/// Recursively inlines `componentRef`s and resolves `fieldRef`/`groupRef`s
/// against `repo`, classifying each resolved field as fixed-size or
/// variable (data) per the type mapping table. Unresolved ids are dropped
/// and logged rather than treated as fatal, except that an empty resulting
/// message is still caught by the caller.
fn flatten_refs<'repo>(repo: &'repo Repository, refs: &[Ref]) -> Flattened<'repo> {
    let mut fixed = Vec::new();
    let mut data = Vec::new();
    let mut groups = Vec::new();
    let mut field_order = Vec::new();
    flatten_into(repo, refs, &mut fixed, &mut data, &mut groups, &mut field_order);
    Flattened { fixed, data, groups, field_order }
}

fn flatten_into<'repo>(
    repo: &'repo Repository,
    refs: &[Ref],
    fixed: &mut Vec<(&'repo crate::orchestra::model::Field, Presence)>,
    data: &mut Vec<(&'repo crate::orchestra::model::Field, Presence)>,
    groups: &mut Vec<(&'repo Group, Presence)>,
    field_order: &mut Vec<Tag>,
) {
    for r in refs {
        match r {
            Ref::Field { id, presence } => match repo.field(*id) {
                Some(field) => {
                    let is_data =
                        matches!(types::encoding_for(&field.type_name, repo.is_code_set(&field.type_name), None), Encoding::Data);
                    if is_data {
                        data.push((field, *presence));
                    } else {
                        fixed.push((field, *presence));
                    }
                    field_order.push(field.id);
                }
                None => log::warn!("dropped fieldRef to unknown field id {id}"),
            },
            Ref::Component { id, .. } => match repo.component(*id) {
                Some(component) => flatten_into(repo, &component.refs, fixed, data, groups, field_order),
                None => log::warn!("dropped componentRef to unknown component id {id}"),
            },
            Ref::Group { id, presence } => match repo.group(*id) {
                Some(group) => groups.push((group, *presence)),
                None => log::warn!("dropped groupRef to unknown group id {id}"),
            },
        }
    }
}

// The `is_code_set` argument to `encoding_for` above special-cases the
// `CodeSet` check using the field's own declared type name; done inline
// rather than threading `Encoding` classification through a second
// function to keep `flatten_into` a single pass.

fn emit_schema(messages: &[CompiledMessage]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<sbe:messageSchema xmlns:sbe=\"http://fixprotocol.io/2016/sbe\" package=\"fix.descriptor\" id=\"1\" version=\"0\" byteOrder=\"littleEndian\">\n",
    );
    out.push_str("  <types>\n");
    out.push_str("    <composite name=\"messageHeader\">\n");
    out.push_str("      <type name=\"blockLength\" primitiveType=\"uint16\"/>\n");
    out.push_str("      <type name=\"templateId\" primitiveType=\"uint16\"/>\n");
    out.push_str("      <type name=\"schemaId\" primitiveType=\"uint16\"/>\n");
    out.push_str("      <type name=\"version\" primitiveType=\"uint16\"/>\n");
    out.push_str("    </composite>\n");
    out.push_str("    <composite name=\"groupSizeEncoding\">\n");
    out.push_str("      <type name=\"blockLength\" primitiveType=\"uint16\"/>\n");
    out.push_str("      <type name=\"numInGroup\" primitiveType=\"uint16\"/>\n");
    out.push_str("    </composite>\n");
    out.push_str("    <composite name=\"varStringEncoding\">\n");
    out.push_str("      <type name=\"length\" primitiveType=\"uint16\"/>\n");
    out.push_str("      <type name=\"varData\" primitiveType=\"uint8\" length=\"0\" characterEncoding=\"UTF-8\"/>\n");
    out.push_str("    </composite>\n");
    out.push_str("  </types>\n");

    for message in messages {
        emit_message(&mut out, message);
    }

    out.push_str("</sbe:messageSchema>\n");
    out
}

fn emit_message(out: &mut String, message: &CompiledMessage) {
    let block_length: u32 = message.fields.iter().map(field_size).sum();
    let _ = writeln!(
        out,
        "  <sbe:message name=\"{}\" id=\"{}\" blockLength=\"{}\">",
        escape_attr(&message.name),
        message.template_id,
        block_length
    );
    emit_fields(out, &message.fields, "    ");
    for tag in &message.data_tags {
        let _ = writeln!(out, "    <data name=\"field{tag}\" id=\"{tag}\" type=\"varStringEncoding\"/>");
    }
    for group in &message.groups {
        emit_group(out, group, "    ");
    }
    out.push_str("  </sbe:message>\n");
}

fn emit_group(out: &mut String, group: &CompiledGroup, indent: &str) {
    let block_length: u32 = group.fields.iter().map(field_size).sum();
    let _ = writeln!(
        out,
        "{indent}<group name=\"{}\" id=\"{}\" dimensionType=\"groupSizeEncoding\" blockLength=\"{}\" delimiterId=\"{}\">",
        escape_attr(&group.name),
        group.count_tag,
        block_length,
        group.delimiter_tag,
    );
    let inner = format!("{indent}  ");
    emit_fields(out, &group.fields, &inner);
    for tag in &group.data_tags {
        let _ = writeln!(out, "{inner}<data name=\"field{tag}\" id=\"{tag}\" type=\"varStringEncoding\"/>");
    }
    for nested in &group.nested {
        emit_group(out, nested, &inner);
    }
    let _ = writeln!(out, "{indent}</group>");
}

fn field_size(field: &CompiledField) -> u32 {
    field.primitive.size()
}

fn emit_fields(out: &mut String, fields: &[CompiledField], indent: &str) {
    let mut offset = 0u32;
    for field in fields {
        let presence = match field.presence {
            Presence::Required => "required",
            Presence::Optional => "optional",
        };
        let _ = write!(
            out,
            "{indent}<field name=\"field{}\" id=\"{}\" type=\"{}\" offset=\"{}\" presence=\"{}\" semanticType=\"{}\"",
            field.tag,
            field.tag,
            field.primitive.name(),
            offset,
            presence,
            field.semantic.tag_name(),
        );
        if let Some(null_value) = field.null_value {
            let _ = write!(out, " nullValue=\"{}\"", format_null_value(null_value));
        }
        if let Semantic::ScaledDecimal { scale } = field.semantic {
            let _ = write!(out, " scale=\"{scale}\"");
        }
        out.push_str("/>\n");
        offset += field.primitive.size();
    }
}

fn format_null_value(value: NullValue) -> String {
    match value {
        NullValue::UInt(v) => v.to_string(),
        NullValue::Int(v) => v.to_string(),
        NullValue::Double => "NaN".to_string(),
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
