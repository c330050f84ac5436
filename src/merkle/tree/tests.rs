use super::*;

fn leaf(byte: u8) -> [u8; 32] {
    let mut h = [0u8; 32];
    h[31] = byte;
    h
}

#[test]
fn empty_tree_has_zero_root() {
    let tree = build_tree(&[]);
    assert_eq!(tree.root(), ZERO_HASH);
    assert_eq!(tree.leaf_count(), 0);
}

#[test]
fn out_of_range_index_is_an_error_not_a_fabricated_proof() {
    let leaves: Vec<[u8; 32]> = (0..3).map(leaf).collect();
    let tree = build_tree(&leaves);
    assert_eq!(prove(&tree, 3), Err(ProofError::IndexOutOfRange { index: 3, leaf_count: 3 }));
    assert_eq!(prove(&tree, 100), Err(ProofError::IndexOutOfRange { index: 100, leaf_count: 3 }));
}

#[test]
fn out_of_range_index_on_an_empty_tree_is_an_error() {
    let tree = build_tree(&[]);
    assert_eq!(prove(&tree, 0), Err(ProofError::IndexOutOfRange { index: 0, leaf_count: 0 }));
}

#[test]
fn single_leaf_tree_roots_to_that_leaf_with_empty_proof() {
    let a = leaf(1);
    let tree = build_tree(&[a]);
    assert_eq!(tree.root(), a);

    let proof = prove(&tree, 0).unwrap();
    assert!(proof.siblings.is_empty());
    assert!(proof.directions.is_empty());
}

#[test]
fn three_leaf_tree_promotes_the_odd_node_instead_of_self_hashing() {
    // Odd-node promotion: root = H(H(a,b), c), never H(H(a,b), H(c,c)).
    let (a, b, c) = (leaf(1), leaf(2), leaf(3));
    let tree = build_tree(&[a, b, c]);

    let ab = keccak256_concat(&[&a, &b]);
    let expected_root = keccak256_concat(&[&ab, &c]);
    assert_eq!(tree.root(), expected_root);

    let wrong_duplicate_hash_root = keccak256_concat(&[&ab, &keccak256_concat(&[&c, &c])]);
    assert_ne!(tree.root(), wrong_duplicate_hash_root);
}

#[test]
fn proof_for_promoted_leaf_skips_the_level_with_no_sibling() {
    let (a, b, c) = (leaf(1), leaf(2), leaf(3));
    let tree = build_tree(&[a, b, c]);

    // `c` is promoted unchanged at level 0 (no sibling), then paired with
    // `H(a,b)` at level 1: exactly one proof element.
    let proof = prove(&tree, 2).unwrap();
    assert_eq!(proof.siblings.len(), 1);
    assert_eq!(proof.directions, vec![false]); // c is the left child of the root
    assert_eq!(proof.siblings[0], keccak256_concat(&[&a, &b]));
}

#[test]
fn proofs_for_every_leaf_recompute_to_the_root() {
    let leaves: Vec<[u8; 32]> = (0..7).map(leaf).collect();
    let tree = build_tree(&leaves);
    let root = tree.root();

    for (i, &hash) in leaves.iter().enumerate() {
        let proof = prove(&tree, i).unwrap();
        let mut node = hash;
        for (sibling, is_right) in proof.siblings.iter().zip(proof.directions.iter()) {
            node = if *is_right {
                keccak256_concat(&[sibling, &node])
            } else {
                keccak256_concat(&[&node, sibling])
            };
        }
        assert_eq!(node, root, "leaf {i} did not recompute to the root");
    }
}

#[test]
fn four_leaf_tree_has_no_promotions_and_height_two() {
    let leaves: Vec<[u8; 32]> = (0..4).map(leaf).collect();
    let tree = build_tree(&leaves);
    assert_eq!(tree.leaf_count(), 4);
    for i in 0..4 {
        assert_eq!(prove(&tree, i).unwrap().siblings.len(), 2);
    }
}
