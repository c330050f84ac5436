//! Keccak-256 of concatenated byte slices.
//!
//! Wraps `tiny_keccak::Keccak::v256`. This is legacy Keccak padding, not
//! the NIST-standardized SHA3-256 — the two disagree on a handful of
//! padding bits and produce different digests for the same input, so the
//! distinction matters: this crate must match the on-chain verifier's hash
//! function byte for byte.

use tiny_keccak::Hasher;

/// Computes keccak256 over the concatenation of `chunks`, without
/// allocating an intermediate buffer.
pub fn keccak256_concat(chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher = tiny_keccak::Keccak::v256();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Computes keccak256 of a single byte slice.
pub fn keccak256(buffer: &[u8]) -> [u8; 32] {
    keccak256_concat(&[buffer])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_of_empty_is_known_constant() {
        // keccak256("") - the canonical empty-input vector.
        let expected: [u8; 32] = [
            0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7,
            0x03, 0xc0, 0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04,
            0x5d, 0x85, 0xa4, 0x70,
        ];
        assert_eq!(keccak256(b""), expected);
    }

    #[test]
    fn concat_matches_manually_joined_buffer() {
        let joined = [b"abc".as_slice(), b"def".as_slice()].concat();
        assert_eq!(keccak256_concat(&[b"abc", b"def"]), keccak256(&joined));
    }

    #[test]
    fn differs_from_naive_double_call() {
        // Sanity check that we hash the concatenation, not each piece
        // separately.
        assert_ne!(keccak256_concat(&[b"a", b"b"]), keccak256(b"a"));
    }
}
