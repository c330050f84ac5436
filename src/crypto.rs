//! Cryptographic primitives. The crate uses exactly one: legacy Keccak-256
//! over concatenated byte slices, matching the on-chain verifier bit for
//! bit: pre-FIPS Keccak padding, not standardized SHA3-256.

pub mod keccak;

pub use keccak::keccak256;
