//! Black-box tests against the public API, exercising the full pipeline
//! end to end: Orchestra repository -> compiled SBE schema -> loaded
//! layout -> flat FIX parse -> assembled descriptor -> SBE encode/decode,
//! and, independently, descriptor -> Merkle leaves -> tree -> inclusion
//! proof -> verification.

use std::collections::HashMap;

use fix_descriptor::cbor::encode_path_u32;
use fix_descriptor::compiler::compile_schema;
use fix_descriptor::descriptor::{Descriptor, Node};
use fix_descriptor::fix;
use fix_descriptor::orchestra::model::{Field, Group, Message, Presence, Ref, Repository};
use fix_descriptor::sbe::{assemble_message, decode, encode, load_schema, DecodedNode, DecodedValue};
use fix_descriptor::{build_tree, enumerate_leaves, prove, verify};

fn field(id: u32, name: &str, type_name: &str) -> Field {
    Field { id, name: name.to_string(), type_name: type_name.to_string() }
}

#[test]
fn two_field_descriptor_path_cbors_and_single_proof() {
    let mut descriptor = Descriptor::new();
    descriptor.insert(55, Node::Scalar("AAPL".to_string()));
    descriptor.insert(223, Node::Scalar("4.250".to_string()));

    let leaves = enumerate_leaves(&descriptor);
    assert_eq!(leaves.len(), 2);
    // sorted by pathCBOR ascending: 0x811837 ([55]) < 0x8118DF ([223])
    assert_eq!(leaves[0].path_cbor, vec![0x81, 0x18, 0x37]);
    assert_eq!(leaves[0].path, vec![55]);
    assert_eq!(leaves[1].path_cbor, vec![0x81, 0x18, 0xDF]);
    assert_eq!(leaves[1].path, vec![223]);

    let hashes: Vec<[u8; 32]> = leaves.iter().map(|l| l.leaf_hash).collect();
    let tree = build_tree(&hashes);
    let proof = prove(&tree, 0).unwrap();
    assert_eq!(proof.siblings.len(), 1);
    assert_eq!(proof.directions, vec![false]);
    assert!(verify(tree.root(), &leaves[0].path_cbor, leaves[0].value.as_bytes(), &proof));
}

#[test]
fn path_encoding_worked_examples() {
    assert_eq!(encode_path_u32(&[55]), vec![0x81, 0x18, 0x37]);
    assert_eq!(
        encode_path_u32(&[454, 0, 455]),
        vec![0x83, 0x19, 0x01, 0xC6, 0x00, 0x19, 0x01, 0xC7]
    );
    assert_eq!(encode_path_u32(&[541]), vec![0x81, 0x19, 0x02, 0x1D]);
}

#[test]
fn single_leaf_tree_has_empty_proof_and_verifies() {
    let mut descriptor = Descriptor::new();
    descriptor.insert(55, Node::Scalar("IBM".to_string()));

    let leaves = enumerate_leaves(&descriptor);
    assert_eq!(leaves.len(), 1);
    let tree = build_tree(&[leaves[0].leaf_hash]);
    assert_eq!(tree.root(), leaves[0].leaf_hash);

    let proof = prove(&tree, 0).unwrap();
    assert!(proof.siblings.is_empty());
    assert!(verify(tree.root(), &leaves[0].path_cbor, leaves[0].value.as_bytes(), &proof));
}

fn security_definition_repository() -> Repository {
    let mut repo = Repository::default();
    repo.fields.insert(55, field(55, "Symbol", "String"));
    repo.fields.insert(223, field(223, "CouponRate", "Percentage"));
    repo.fields.insert(15, field(15, "Currency", "Currency"));
    repo.messages.push(Message {
        id: 37,
        name: "SecurityDefinition".to_string(),
        msg_type: "d".to_string(),
        refs: vec![
            Ref::Field { id: 55, presence: Presence::Required },
            Ref::Field { id: 223, presence: Presence::Optional },
            Ref::Field { id: 15, presence: Presence::Optional },
        ],
    });
    repo
}

#[test]
fn sbe_round_trip_security_definition() {
    let repo = security_definition_repository();
    let overrides = HashMap::new();
    let schema_xml = compile_schema(&repo, Some("SecurityDefinition"), &overrides).unwrap();
    let schema = load_schema(&schema_xml).unwrap();
    let layout = schema.message_by_id(37).unwrap();

    let raw = "8=FIX.4.4\u{1}35=d\u{1}55=USTB-2030-11-15\u{1}223=4.250\u{1}15=USD\u{1}10=000\u{1}";
    let pairs = fix::parse(raw).unwrap();
    assert_eq!(pairs, vec![
        (55, "USTB-2030-11-15".to_string()),
        (223, "4.250".to_string()),
        (15, "USD".to_string()),
    ]);

    let descriptor = assemble_message(layout, &pairs).unwrap();
    let bytes = encode(&schema, 37, &descriptor).unwrap();
    assert!(bytes.len() >= 8);

    let decoded = decode(&schema, 37, &bytes).unwrap();
    let get = |tag: u32| decoded.fields.iter().find(|(t, _)| *t == tag).map(|(_, n)| n);

    match get(55) {
        Some(DecodedNode::Value(DecodedValue::Bytes(s))) => assert_eq!(s, "USTB-2030-11-15"),
        other => panic!("expected symbol string, got {other:?}"),
    }
    match get(15) {
        Some(DecodedNode::Value(DecodedValue::Bytes(s))) => assert_eq!(s, "USD"),
        other => panic!("expected currency string, got {other:?}"),
    }
    // 223 (CouponRate, Percentage, scale 8): "4.250" -> 425000000 on the wire.
    match get(223) {
        Some(DecodedNode::Value(DecodedValue::Int(v))) => assert_eq!(*v, 425_000_000),
        other => panic!("expected scaled decimal, got {other:?}"),
    }
}

fn new_order_single_repository() -> Repository {
    let mut repo = Repository::default();
    repo.fields.insert(453, field(453, "NoPartyIDs", "NumInGroup"));
    repo.fields.insert(447, field(447, "PartyIDSource", "char"));
    repo.fields.insert(448, field(448, "PartyID", "String"));
    repo.fields.insert(452, field(452, "PartyRole", "int"));
    repo.groups.insert(
        1,
        Group {
            id: 1,
            name: "NoPartyIDs".to_string(),
            num_in_group_field_id: 453,
            refs: vec![
                Ref::Field { id: 448, presence: Presence::Required },
                Ref::Field { id: 447, presence: Presence::Required },
                Ref::Field { id: 452, presence: Presence::Required },
            ],
        },
    );
    repo.messages.push(Message {
        id: 14,
        name: "NewOrderSingle".to_string(),
        msg_type: "D".to_string(),
        refs: vec![Ref::Group { id: 1, presence: Presence::Optional }],
    });
    repo
}

// Each entry leads with `448` (PartyID), the group's first member in FIX
// declaration order — even though the compiler's block layout reorders
// `447`/`452` ahead of `448` internally (fixed fields before data fields),
// the assembler tracks the true declaration-order delimiter via
// `GroupLayout::delimiter_tag`.
#[test]
fn repeating_group_decodes_to_list_of_entries() {
    let repo = new_order_single_repository();
    let overrides = HashMap::new();
    let schema_xml = compile_schema(&repo, Some("NewOrderSingle"), &overrides).unwrap();
    let schema = load_schema(&schema_xml).unwrap();
    let layout = schema.message_by_id(14).unwrap();

    let raw = "453=2\u{1}448=PARTY1\u{1}447=D\u{1}452=1\u{1}448=PARTY2\u{1}447=D\u{1}452=3\u{1}";
    let pairs = fix::parse(raw).unwrap();
    let descriptor = assemble_message(layout, &pairs).unwrap();

    match descriptor.get(453) {
        Some(Node::Group(entries)) => assert_eq!(entries.len(), 2),
        other => panic!("expected group descriptor, got {other:?}"),
    }

    let bytes = encode(&schema, 14, &descriptor).unwrap();
    let decoded = decode(&schema, 14, &bytes).unwrap();
    match decoded.fields.iter().find(|(t, _)| *t == 453).map(|(_, n)| n) {
        Some(DecodedNode::Group(entries)) => {
            assert_eq!(entries.len(), 2);

            let party_id = |entry: &fix_descriptor::sbe::DecodedEntry| {
                entry.fields.iter().find(|(t, _)| *t == 448).map(|(_, n)| n.clone())
            };
            assert_eq!(party_id(&entries[0]), Some(DecodedNode::Value(DecodedValue::Bytes("PARTY1".to_string()))));
            assert_eq!(party_id(&entries[1]), Some(DecodedNode::Value(DecodedValue::Bytes("PARTY2".to_string()))));

            let party_role = |entry: &fix_descriptor::sbe::DecodedEntry| {
                entry.fields.iter().find(|(t, _)| *t == 452).map(|(_, n)| n.clone())
            };
            assert_eq!(party_role(&entries[0]), Some(DecodedNode::Value(DecodedValue::UInt(1))));
            assert_eq!(party_role(&entries[1]), Some(DecodedNode::Value(DecodedValue::UInt(3))));
        }
        other => panic!("expected decoded group, got {other:?}"),
    }
}

#[test]
fn nested_group_leaf_paths_prove_independently() {
    let mut entry0 = Descriptor::new();
    entry0.insert(455, Node::Scalar("ISSUER-A".to_string()));
    let mut entry1 = Descriptor::new();
    entry1.insert(455, Node::Scalar("ISSUER-B".to_string()));

    let mut descriptor = Descriptor::new();
    descriptor.insert(454, Node::Group(vec![entry0, entry1]));

    let leaves = enumerate_leaves(&descriptor);
    assert_eq!(leaves.len(), 2);

    let paths: Vec<Vec<u32>> = leaves.iter().map(|l| l.path.clone()).collect();
    assert!(paths.contains(&vec![454, 0, 455]));
    assert!(paths.contains(&vec![454, 1, 455]));
    assert_ne!(leaves[0].path_cbor, leaves[1].path_cbor);

    let hashes: Vec<[u8; 32]> = leaves.iter().map(|l| l.leaf_hash).collect();
    let tree = build_tree(&hashes);
    for (i, leaf) in leaves.iter().enumerate() {
        let proof = prove(&tree, i).unwrap();
        assert!(verify(tree.root(), &leaf.path_cbor, leaf.value.as_bytes(), &proof));
    }
}

// Dogfoods the Orchestra XML parser feeding the compiler, not just
// hand-built repository structs.
#[test]
fn orchestra_xml_through_compiled_schema_round_trips_a_scalar_field() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<fixr:repository xmlns:fixr="http://fixprotocol.io/2020/orchestra/repository">
  <fixr:fields>
    <fixr:field id="55" name="Symbol" type="String"/>
    <fixr:field id="38" name="OrderQty" type="Qty"/>
  </fixr:fields>
  <fixr:messages>
    <fixr:message id="14" name="NewOrderSingle" msgType="D">
      <fixr:structure>
        <fixr:fieldRef id="55" presence="required"/>
        <fixr:fieldRef id="38" presence="required"/>
      </fixr:structure>
    </fixr:message>
  </fixr:messages>
</fixr:repository>
"#;
    let repo = fix_descriptor::orchestra::parse_repository(xml).unwrap();
    let schema_xml = compile_schema(&repo, None, &HashMap::new()).unwrap();
    let schema = load_schema(&schema_xml).unwrap();
    let layout = schema.message_by_id(14).unwrap();

    let pairs = vec![(55, "AAPL".to_string()), (38, "100.5".to_string())];
    let descriptor = assemble_message(layout, &pairs).unwrap();
    let bytes = encode(&schema, 14, &descriptor).unwrap();
    let decoded = decode(&schema, 14, &bytes).unwrap();

    match decoded.fields.iter().find(|(t, _)| *t == 38).map(|(_, n)| n) {
        Some(DecodedNode::Value(DecodedValue::Int(v))) => assert_eq!(*v, 1_005_000), // scale 4
        other => panic!("expected scaled qty, got {other:?}"),
    }
    match decoded.fields.iter().find(|(t, _)| *t == 55).map(|(_, n)| n) {
        Some(DecodedNode::Value(DecodedValue::Bytes(s))) => assert_eq!(s, "AAPL"),
        other => panic!("expected symbol, got {other:?}"),
    }
}
