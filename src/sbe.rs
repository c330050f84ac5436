//! SBE schema loading, encoding, decoding, and flat-to-nested reassembly.

pub mod assemble;
pub mod decoder;
pub mod encoder;
pub mod layout;
pub mod schema;

pub use assemble::assemble_message;
pub use decoder::{decode, DecodedEntry, DecodedMessage, DecodedNode, DecodedValue};
pub use encoder::encode;
pub use layout::{DataField, FixedField, GroupLayout, MessageLayout, NullValue, Primitive, Schema, Semantic};
pub use schema::load_schema;
