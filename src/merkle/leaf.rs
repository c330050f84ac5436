//! Deterministic leaf enumeration over a `Descriptor`.
//!
//! Path construction mirrors the group nesting exactly: a top-level scalar
//! at tag `t` gets path `[t]`; a scalar inside the `k`-th (0-based) entry of
//! a group whose count tag is `g` gets `[g, k]` prepended to whatever path
//! it would have had standing alone, recursively.

use crate::cbor::encode_path_u32;
use crate::crypto::keccak256_concat;
use crate::descriptor::{Descriptor, Node};
use crate::fix::SESSION_TAGS;

/// One scalar occurrence in a descriptor, located by its path.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub path: Vec<u32>,
    pub path_cbor: Vec<u8>,
    pub value: String,
    pub leaf_hash: [u8; 32],
}

/// Enumerates every scalar leaf in `descriptor`, sorted by `path_cbor`
/// ascending — the canonical leaf index the Merkle builder consumes.
/// Session tags and empty-string values produce no leaf.
pub fn enumerate_leaves(descriptor: &Descriptor) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    let mut prefix = Vec::new();
    walk(descriptor, &mut prefix, &mut leaves);
    leaves.sort_by(|a, b| a.path_cbor.cmp(&b.path_cbor));
    leaves
}

fn walk(descriptor: &Descriptor, prefix: &mut Vec<u32>, out: &mut Vec<Leaf>) {
    for (tag, node) in descriptor.iter() {
        if SESSION_TAGS.contains(tag) {
            continue;
        }
        match node {
            Node::Scalar(value) => {
                if value.is_empty() {
                    continue;
                }
                prefix.push(*tag);
                push_leaf(prefix, value, out);
                prefix.pop();
            }
            Node::Group(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    prefix.push(*tag);
                    prefix.push(index as u32);
                    walk(entry, prefix, out);
                    prefix.pop();
                    prefix.pop();
                }
            }
        }
    }
}

fn push_leaf(path: &[u32], value: &str, out: &mut Vec<Leaf>) {
    let path_cbor = encode_path_u32(path);
    let leaf_hash = keccak256_concat(&[&path_cbor, &[0x3D], value.as_bytes()]);
    out.push(Leaf { path: path.to_vec(), path_cbor, value: value.to_string(), leaf_hash });
}
