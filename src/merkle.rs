//! Deterministic leaf enumeration and Merkle tree construction/proving over
//! a `Descriptor`.

pub mod leaf;
pub mod tree;

pub use leaf::{enumerate_leaves, Leaf};
pub use tree::{build_tree, prove, Proof, Tree};
