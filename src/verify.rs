//! Reference proof verifier — recomputes the leaf hash
//! from its raw path/value bytes and walks the proof, matching the
//! algorithm the on-chain verifier contract implements bit for bit.
//!
//! Never panics: a malformed or adversarial proof simply verifies to
//! `false` — a corrupt proof surfaces as a boolean result, never as an
//! exception.

use crate::crypto::keccak256_concat;
use crate::merkle::Proof;

/// Recomputes `leafHash = keccak256(pathCBOR || '=' || valueBytes)`, walks
/// `proof` toward the root, and compares the result to `root`.
pub fn verify(root: [u8; 32], path_cbor: &[u8], value_bytes: &[u8], proof: &Proof) -> bool {
    if proof.siblings.len() != proof.directions.len() {
        return false;
    }
    let mut node = keccak256_concat(&[path_cbor, &[0x3D], value_bytes]);
    for (sibling, is_right) in proof.siblings.iter().zip(proof.directions.iter()) {
        node = if *is_right {
            keccak256_concat(&[sibling, &node])
        } else {
            keccak256_concat(&[&node, sibling])
        };
    }
    node == root
}
