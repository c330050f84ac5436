//! Parses Orchestra XML (the `fixr:` namespace) into a `Repository`.
//!
//! Uses `roxmltree`'s DOM tree rather than an event-based reader: Orchestra
//! documents are small, fully nested (fields/codeSets/components/groups/
//! messages), and the compiler needs random access to resolve references by
//! id, so building the whole tree up front is simpler than re-streaming.
//! `roxmltree` is the crate the FIX-protocol corner of the wider ecosystem
//! already reaches for alongside `quick-xml` for exactly this shape of
//! document.

use roxmltree::{Document, Node};

use crate::error::SchemaError;

use super::model::{Code, CodeSet, Component, Field, Group, Message, Presence, Ref, Repository};

/// Parses a complete Orchestra XML document into a `Repository`.
///
/// Unrecognized elements are ignored: only `fields`,
/// `codeSets`, `components`, `groups`, and `messages` sections (and their
/// expected children) are interpreted.
pub fn parse_repository(xml: &str) -> Result<Repository, SchemaError> {
    let doc = Document::parse(xml).map_err(|e| SchemaError::Parse(e.to_string()))?;
    let root = doc.root_element();

    let mut repo = Repository::default();

    for section in root.children().filter(Node::is_element) {
        match local_name(&section) {
            "fields" => {
                for field_node in children_named(&section, "field") {
                    if let Some(field) = parse_field(&field_node) {
                        repo.fields.insert(field.id, field);
                    }
                }
            }
            "codeSets" => {
                for cs_node in children_named(&section, "codeSet") {
                    if let Some(code_set) = parse_code_set(&cs_node) {
                        repo.code_sets.insert(code_set.name.clone(), code_set);
                    }
                }
            }
            "components" => {
                for comp_node in children_named(&section, "component") {
                    if let Some(component) = parse_component(&comp_node) {
                        repo.components.insert(component.id, component);
                    }
                }
            }
            "groups" => {
                for group_node in children_named(&section, "group") {
                    if let Some(group) = parse_group(&group_node) {
                        repo.groups.insert(group.id, group);
                    }
                }
            }
            "messages" => {
                for msg_node in children_named(&section, "message") {
                    if let Some(message) = parse_message(&msg_node) {
                        repo.messages.push(message);
                    }
                }
            }
            _ => {} // unrecognized top-level element: ignored
        }
    }

    if repo.messages.is_empty() {
        return Err(SchemaError::NoMessages);
    }

    Ok(repo)
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

fn parse_field(node: &Node<'_, '_>) -> Option<Field> {
    Some(Field {
        id: attr_u32(node, "id")?,
        name: attr(node, "name")?,
        type_name: attr(node, "type")?,
    })
}

fn parse_code_set(node: &Node<'_, '_>) -> Option<CodeSet> {
    let name = attr(node, "name")?;
    let underlying_type = attr(node, "type").unwrap_or_else(|| "String".to_string());
    let codes = node
        .children()
        .filter(Node::is_element)
        .filter(|c| local_name(c) == "code")
        .filter_map(|c| {
            Some(Code {
                name: attr(&c, "name")?,
                value: attr(&c, "value")?,
            })
        })
        .collect();
    Some(CodeSet { name, underlying_type, codes })
}

fn parse_presence(node: &Node<'_, '_>) -> Presence {
    match node.attribute("presence") {
        Some("optional") => Presence::Optional,
        _ => Presence::Required,
    }
}

/// Collects the `fieldRef`/`componentRef`/`groupRef` children of `node`
/// (or, if present, of its single `structure` child — the shape real
/// Orchestra message bodies use).
fn parse_refs(node: &Node<'_, '_>) -> Vec<Ref> {
    let container = children_named(node, "structure").into_iter().next();
    let container = container.as_ref().unwrap_or(node);

    container
        .children()
        .filter(Node::is_element)
        .filter_map(|child| {
            let presence = parse_presence(&child);
            match local_name(&child) {
                "fieldRef" => attr_u32(&child, "id").map(|id| Ref::Field { id, presence }),
                "componentRef" => attr_u32(&child, "id").map(|id| Ref::Component { id, presence }),
                "groupRef" => attr_u32(&child, "id").map(|id| Ref::Group { id, presence }),
                _ => None, // unrecognized element: ignored
            }
        })
        .collect()
}

fn parse_component(node: &Node<'_, '_>) -> Option<Component> {
    Some(Component {
        id: attr_u32(node, "id")?,
        name: attr(node, "name")?,
        refs: parse_refs(node),
    })
}

fn parse_group(node: &Node<'_, '_>) -> Option<Group> {
    let refs = parse_refs(node);
    let num_in_group_field_id = attr_u32(node, "numInGroup").or_else(|| {
        // Fall back to the first fieldRef, the convention some Orchestra
        // producers use instead of a dedicated attribute.
        refs.iter().find_map(|r| match r {
            Ref::Field { id, .. } => Some(*id),
            _ => None,
        })
    })?;
    Some(Group {
        id: attr_u32(node, "id")?,
        name: attr(node, "name")?,
        num_in_group_field_id,
        refs,
    })
}

fn parse_message(node: &Node<'_, '_>) -> Option<Message> {
    Some(Message {
        id: attr_u32(node, "id")?,
        name: attr(node, "name")?,
        msg_type: attr(node, "msgType")?,
        refs: parse_refs(node),
    })
}
