//! Reassembles a flat, ordered `(tag, value)` stream (as produced by
//! `crate::fix::parser::parse`) into a nested `Descriptor`, splitting
//! repeating groups into entries.
//!
//! A flat FIX stream carries no explicit entry boundaries for a repeating
//! group — only the group's declared member tags and its `NumInGroup`
//! count. This uses the group's `delimiter_tag` (its first member in FIX
//! declaration order, computed by the compiler — not necessarily its first
//! *fixed* field) as an entry delimiter: seeing that tag again (after at
//! least one field of the current entry has been consumed) starts the next
//! entry. The count bounds how many entries are collected.

use std::collections::{HashMap, HashSet};

use crate::descriptor::{Descriptor, Node, Tag};
use crate::error::InputError;

use super::layout::{GroupLayout, MessageLayout};

/// Assembles the flat `pairs` stream into a `Descriptor` for `layout`.
/// Tags not declared anywhere in `layout` are silently skipped — they are
/// either session tags already stripped by the parser or extension fields
/// outside this schema.
pub fn assemble_message(layout: &MessageLayout, pairs: &[(Tag, String)]) -> Result<Descriptor, InputError> {
    let scalar_tags: HashSet<Tag> =
        layout.fields.iter().map(|f| f.tag).chain(layout.data_fields.iter().map(|d| d.tag)).collect();
    let groups_by_tag: HashMap<Tag, &GroupLayout> = layout.groups.iter().map(|g| (g.count_tag, g)).collect();

    let mut descriptor = Descriptor::new();
    let mut seen = HashSet::new();
    let mut pos = 0;

    while pos < pairs.len() {
        let tag = pairs[pos].0;
        if let Some(group) = groups_by_tag.get(&tag) {
            let entries = assemble_group(group, pairs, &mut pos)?;
            descriptor.insert(tag, Node::Group(entries));
            continue;
        }
        if scalar_tags.contains(&tag) {
            if !seen.insert(tag) {
                return Err(InputError::DuplicateTag(tag));
            }
            descriptor.insert(tag, Node::Scalar(pairs[pos].1.clone()));
            pos += 1;
            continue;
        }
        pos += 1;
    }

    Ok(descriptor)
}

/// Consumes one group's worth of entries starting at `pairs[*pos]` (the
/// group's count tag), advancing `*pos` past everything it consumes.
fn assemble_group(group: &GroupLayout, pairs: &[(Tag, String)], pos: &mut usize) -> Result<Vec<Descriptor>, InputError> {
    let declared_count: usize = pairs[*pos].1.parse().unwrap_or(0);
    *pos += 1;

    let member_tags = group.member_tags();
    let delimiter = group.delimiter_tag;
    let scalar_tags: HashSet<Tag> =
        group.fields.iter().map(|f| f.tag).chain(group.data_fields.iter().map(|d| d.tag)).collect();
    let nested_by_tag: HashMap<Tag, &GroupLayout> = group.nested_groups.iter().map(|g| (g.count_tag, g)).collect();

    let mut entries = Vec::new();
    let mut current = Descriptor::new();
    let mut current_seen = HashSet::new();
    let mut current_started = false;

    while *pos < pairs.len() {
        let tag = pairs[*pos].0;
        if !member_tags.contains(&tag) {
            break;
        }

        if current_started && tag == delimiter {
            entries.push(std::mem::take(&mut current));
            current_seen.clear();
            current_started = false;
            if entries.len() == declared_count {
                // The count is a hard bound: leftover tags belonging to a
                // would-be next entry are left for the caller, which drops
                // them as it would any tag outside its own schema.
                break;
            }
        }
        current_started = true;

        if let Some(nested) = nested_by_tag.get(&tag) {
            let nested_entries = assemble_group(nested, pairs, pos)?;
            current.insert(tag, Node::Group(nested_entries));
            continue;
        }

        if scalar_tags.contains(&tag) {
            if !current_seen.insert(tag) {
                return Err(InputError::DuplicateTag(tag));
            }
            current.insert(tag, Node::Scalar(pairs[*pos].1.clone()));
            *pos += 1;
            continue;
        }
    }

    if current_started && entries.len() < declared_count {
        entries.push(current);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests;
