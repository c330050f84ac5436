use super::*;
use crate::orchestra::Presence;
use crate::sbe::layout::{DataField, FixedField, Primitive, Semantic};

fn plain_field(tag: Tag) -> FixedField {
    FixedField {
        tag,
        offset: 0,
        primitive: Primitive::Uint32,
        semantic: Semantic::Plain,
        presence: Presence::Required,
        null_value: None,
    }
}

fn layout_with_group(group: GroupLayout) -> MessageLayout {
    MessageLayout {
        template_id: 1,
        name: "NewOrderSingle".to_string(),
        block_length: 0,
        fields: vec![plain_field(38)],
        data_fields: vec![DataField { tag: 55 }],
        groups: vec![group],
    }
}

#[test]
fn assembles_flat_scalar_fields() {
    let layout = MessageLayout {
        template_id: 1,
        name: "M".to_string(),
        block_length: 0,
        fields: vec![plain_field(38)],
        data_fields: vec![DataField { tag: 55 }],
        groups: vec![],
    };
    let pairs = vec![(55, "AAPL".to_string()), (38, "100".to_string())];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    assert_eq!(descriptor.get(55), Some(&Node::Scalar("AAPL".to_string())));
    assert_eq!(descriptor.get(38), Some(&Node::Scalar("100".to_string())));
}

#[test]
fn splits_a_group_into_entries_by_delimiter_tag() {
    let group = GroupLayout {
        count_tag: 78,
        block_length: 0,
        fields: vec![],
        data_fields: vec![DataField { tag: 79 }],
        nested_groups: vec![],
        delimiter_tag: 79,
    };
    let layout = layout_with_group(group);
    let pairs = vec![
        (38, "100".to_string()),
        (78, "2".to_string()),
        (79, "ACC1".to_string()),
        (79, "ACC2".to_string()),
    ];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    match descriptor.get(78) {
        Some(Node::Group(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].get(79), Some(&Node::Scalar("ACC1".to_string())));
            assert_eq!(entries[1].get(79), Some(&Node::Scalar("ACC2".to_string())));
        }
        other => panic!("expected a group, got {other:?}"),
    }
}

/// Mirrors `NoPartyIDs`: `PartyID` (a data field) is declared before
/// `PartyIDSource`/`PartyRole` (fixed fields), so the compiler's
/// fixed-before-data block reordering puts `PartyIDSource` first in
/// `fields` — but the delimiter must still be `PartyID`, the true FIX
/// declaration order's first member.
#[test]
fn data_field_declared_first_in_fix_order_is_the_delimiter() {
    let group = GroupLayout {
        count_tag: 453,
        block_length: 1,
        fields: vec![plain_field(447), plain_field(452)],
        data_fields: vec![DataField { tag: 448 }],
        nested_groups: vec![],
        delimiter_tag: 448,
    };
    let layout = layout_with_group(group);
    let pairs = vec![
        (453, "2".to_string()),
        (448, "PARTY1".to_string()),
        (447, "D".to_string()),
        (452, "1".to_string()),
        (448, "PARTY2".to_string()),
        (447, "D".to_string()),
        (452, "3".to_string()),
    ];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    match descriptor.get(453) {
        Some(Node::Group(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].get(448), Some(&Node::Scalar("PARTY1".to_string())));
            assert_eq!(entries[0].get(447), Some(&Node::Scalar("D".to_string())));
            assert_eq!(entries[0].get(452), Some(&Node::Scalar("1".to_string())));
            assert_eq!(entries[1].get(448), Some(&Node::Scalar("PARTY2".to_string())));
            assert_eq!(entries[1].get(447), Some(&Node::Scalar("D".to_string())));
            assert_eq!(entries[1].get(452), Some(&Node::Scalar("3".to_string())));
        }
        other => panic!("expected a group, got {other:?}"),
    }
}

#[test]
fn group_with_two_fixed_fields_uses_first_as_delimiter() {
    let group = GroupLayout {
        count_tag: 78,
        block_length: 0,
        fields: vec![plain_field(80), plain_field(81)],
        data_fields: vec![],
        nested_groups: vec![],
        delimiter_tag: 80,
    };
    let layout = layout_with_group(group);
    let pairs = vec![
        (78, "2".to_string()),
        (80, "1".to_string()),
        (81, "10".to_string()),
        (80, "2".to_string()),
        (81, "20".to_string()),
    ];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    match descriptor.get(78) {
        Some(Node::Group(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].get(80), Some(&Node::Scalar("1".to_string())));
            assert_eq!(entries[0].get(81), Some(&Node::Scalar("10".to_string())));
            assert_eq!(entries[1].get(80), Some(&Node::Scalar("2".to_string())));
            assert_eq!(entries[1].get(81), Some(&Node::Scalar("20".to_string())));
        }
        other => panic!("expected a group, got {other:?}"),
    }
}

#[test]
fn duplicate_non_delimiter_tag_within_one_entry_is_an_error() {
    let group = GroupLayout {
        count_tag: 78,
        block_length: 0,
        fields: vec![plain_field(80), plain_field(81)],
        data_fields: vec![],
        nested_groups: vec![],
        delimiter_tag: 80,
    };
    let layout = layout_with_group(group);
    // Tag 81 repeats without the delimiter (80) reappearing in between.
    let pairs = vec![
        (78, "2".to_string()),
        (80, "1".to_string()),
        (81, "10".to_string()),
        (81, "20".to_string()),
    ];
    let err = assemble_message(&layout, &pairs).unwrap_err();
    assert_eq!(err, InputError::DuplicateTag(81));
}

#[test]
fn duplicate_top_level_tag_is_an_error() {
    let layout = MessageLayout {
        template_id: 1,
        name: "M".to_string(),
        block_length: 0,
        fields: vec![plain_field(38)],
        data_fields: vec![],
        groups: vec![],
    };
    let pairs = vec![(38, "1".to_string()), (38, "2".to_string())];
    let err = assemble_message(&layout, &pairs).unwrap_err();
    assert_eq!(err, InputError::DuplicateTag(38));
}

#[test]
fn unrecognized_tags_outside_the_schema_are_skipped() {
    let layout = MessageLayout {
        template_id: 1,
        name: "M".to_string(),
        block_length: 0,
        fields: vec![plain_field(38)],
        data_fields: vec![],
        groups: vec![],
    };
    let pairs = vec![(9999, "ignored".to_string()), (38, "100".to_string())];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    assert_eq!(descriptor.len(), 1);
    assert_eq!(descriptor.get(38), Some(&Node::Scalar("100".to_string())));
}

#[test]
fn nested_group_entries_are_assembled_recursively() {
    let inner = GroupLayout {
        count_tag: 539,
        block_length: 0,
        fields: vec![plain_field(524)],
        data_fields: vec![],
        nested_groups: vec![],
        delimiter_tag: 524,
    };
    let outer = GroupLayout {
        count_tag: 453,
        block_length: 0,
        fields: vec![],
        data_fields: vec![],
        nested_groups: vec![inner],
        delimiter_tag: 539,
    };
    let layout = layout_with_group(outer);
    let pairs = vec![
        (453, "1".to_string()),
        (539, "2".to_string()),
        (524, "PARTY1".to_string()),
        (524, "PARTY2".to_string()),
    ];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    match descriptor.get(453) {
        Some(Node::Group(outer_entries)) => {
            assert_eq!(outer_entries.len(), 1);
            match outer_entries[0].get(539) {
                Some(Node::Group(inner_entries)) => {
                    assert_eq!(inner_entries.len(), 2);
                    assert_eq!(inner_entries[0].get(524), Some(&Node::Scalar("PARTY1".to_string())));
                    assert_eq!(inner_entries[1].get(524), Some(&Node::Scalar("PARTY2".to_string())));
                }
                other => panic!("expected nested group, got {other:?}"),
            }
        }
        other => panic!("expected outer group, got {other:?}"),
    }
}

#[test]
fn declared_count_bounds_the_number_of_entries_collected() {
    let group = GroupLayout {
        count_tag: 78,
        block_length: 0,
        fields: vec![],
        data_fields: vec![DataField { tag: 79 }],
        nested_groups: vec![],
        delimiter_tag: 79,
    };
    let layout = layout_with_group(group);
    let pairs = vec![
        (78, "1".to_string()),
        (79, "ACC1".to_string()),
        (79, "ACC2".to_string()), // beyond the declared count; not consumed as a third entry
        (38, "100".to_string()),
    ];
    let descriptor = assemble_message(&layout, &pairs).unwrap();
    match descriptor.get(78) {
        Some(Node::Group(entries)) => assert_eq!(entries.len(), 1),
        other => panic!("expected a group, got {other:?}"),
    }
}
