//! FIX descriptor: Orchestra-to-SBE schema compiler, SBE encoder/decoder,
//! and a Merkle leaf enumerator + inclusion-proof engine over the scalar
//! fields of a FIX message descriptor.
//!
//! The pipeline has two independent halves that share only the parsed FIX
//! input and its schema:
//!
//! - FIX text -> [`fix::parse`] -> [`sbe::assemble_message`] (against a
//!   [`sbe::Schema`] compiled by [`compiler::compile_schema`] from an
//!   [`orchestra::Repository`]) -> [`sbe::encode`] / [`sbe::decode`].
//! - The same descriptor -> [`merkle::enumerate_leaves`] ->
//!   [`merkle::build_tree`] / [`merkle::prove`] -> [`verify::verify`].
//!
//! See `DESIGN.md` for the grounding of each module and the open-question
//! decisions recorded during implementation.

pub mod cbor;
pub mod compiler;
pub mod config;
pub mod crypto;
pub mod descriptor;
pub mod error;
pub mod fix;
pub mod merkle;
pub mod orchestra;
pub mod sbe;
pub mod verify;

pub use config::{Config, SchemaCache, SeparatorHint};
pub use descriptor::{Descriptor, Node, Tag};
pub use error::FixDescriptorError;
pub use merkle::{build_tree, enumerate_leaves, prove, Leaf, Proof, Tree};
pub use sbe::{assemble_message, decode, encode, Schema};
pub use verify::verify;
