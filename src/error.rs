//! Error types shared across the crate.
//!
//! Plain enums, `From` impls so `?` composes across module boundaries, and
//! hand-written `Display`/`Error` impls since these errors cross a library
//! boundary and need to be presentable to callers.

use std::fmt;

/// Failure while parsing or resolving an Orchestra or SBE XML schema.
#[derive(Debug)]
pub enum SchemaError {
    /// XML did not parse (malformed markup).
    Parse(String),
    /// XML parsed but zero messages were found.
    NoMessages,
    /// A requested message name or id does not exist in the schema.
    UnknownMessage(String),
    /// A message resolved to zero valid fields after expansion.
    EmptyMessage(String),
    /// `block_length` in a loaded schema did not match the sum of its
    /// field sizes.
    BlockLengthMismatch { message: String, declared: u32, computed: u32 },
    /// Referenced an id with no corresponding declaration.
    UnresolvedReference(u32),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Parse(reason) => write!(f, "schema parse error: {reason}"),
            SchemaError::NoMessages => write!(f, "schema defines zero messages"),
            SchemaError::UnknownMessage(name) => write!(f, "unknown message: {name}"),
            SchemaError::EmptyMessage(name) => {
                write!(f, "message {name} resolves to zero valid fields")
            }
            SchemaError::BlockLengthMismatch { message, declared, computed } => write!(
                f,
                "message {message}: declared block_length {declared} does not match computed {computed}"
            ),
            SchemaError::UnresolvedReference(id) => {
                write!(f, "unresolved reference to id {id}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Failure while splitting a raw FIX string into tag=value pairs.
#[derive(Debug, PartialEq, Eq)]
pub enum InputError {
    /// Same tag appeared twice at the same nesting level outside a group.
    DuplicateTag(u32),
    /// No separator could be detected and none was forced.
    NoSeparatorFound,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::DuplicateTag(tag) => write!(f, "duplicate tag {tag} at same level"),
            InputError::NoSeparatorFound => write!(f, "could not detect a field separator"),
        }
    }
}

impl std::error::Error for InputError {}

/// Failure encoding or decoding the SBE wire format.
#[derive(Debug)]
pub enum CodecError {
    /// A value could not be parsed into the field's SBE type.
    BadValue { tag: u32, reason: String },
    /// Input buffer ended before a declared field/length could be read.
    Truncated(&'static str),
    /// A declared variable-length field overran the remaining buffer.
    LengthOverrun { declared: usize, remaining: usize },
    /// `templateId` in the wire header did not match the requested message.
    TemplateMismatch { expected: u16, found: u16 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BadValue { tag, reason } => {
                write!(f, "tag {tag}: {reason}")
            }
            CodecError::Truncated(where_) => write!(f, "truncated buffer: {where_}"),
            CodecError::LengthOverrun { declared, remaining } => write!(
                f,
                "declared length {declared} exceeds {remaining} remaining bytes"
            ),
            CodecError::TemplateMismatch { expected, found } => {
                write!(f, "template id mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Failure encoding a Merkle leaf path as CBOR.
#[derive(Debug, PartialEq, Eq)]
pub enum PathError {
    /// A path element was negative (paths are unsigned tag/index chains).
    Negative,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Negative => write!(f, "path element must be non-negative"),
        }
    }
}

impl std::error::Error for PathError {}

/// Failure generating a Merkle inclusion proof.
#[derive(Debug, PartialEq, Eq)]
pub enum ProofError {
    /// The requested leaf index does not exist in the tree. Proof
    /// *verification* never errors this way — a corrupt or mismatched
    /// proof simply fails to recompute the root and `verify` returns
    /// `false` — this is strictly a proof-generation failure.
    IndexOutOfRange { index: usize, leaf_count: usize },
}

impl fmt::Display for ProofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofError::IndexOutOfRange { index, leaf_count } => {
                write!(f, "leaf index {index} out of range for a tree of {leaf_count} leaves")
            }
        }
    }
}

impl std::error::Error for ProofError {}

/// Top-level error uniting every component's failure mode, for callers that
/// drive the whole pipeline (parse -> compile -> encode/decode -> merkleize)
/// and want a single `?`-friendly type.
#[derive(Debug)]
pub enum FixDescriptorError {
    Schema(SchemaError),
    Input(InputError),
    Codec(CodecError),
    Path(PathError),
    Proof(ProofError),
}

impl fmt::Display for FixDescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixDescriptorError::Schema(e) => write!(f, "{e}"),
            FixDescriptorError::Input(e) => write!(f, "{e}"),
            FixDescriptorError::Codec(e) => write!(f, "{e}"),
            FixDescriptorError::Path(e) => write!(f, "{e}"),
            FixDescriptorError::Proof(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FixDescriptorError {}

impl From<SchemaError> for FixDescriptorError {
    fn from(value: SchemaError) -> Self {
        FixDescriptorError::Schema(value)
    }
}

impl From<InputError> for FixDescriptorError {
    fn from(value: InputError) -> Self {
        FixDescriptorError::Input(value)
    }
}

impl From<CodecError> for FixDescriptorError {
    fn from(value: CodecError) -> Self {
        FixDescriptorError::Codec(value)
    }
}

impl From<PathError> for FixDescriptorError {
    fn from(value: PathError) -> Self {
        FixDescriptorError::Path(value)
    }
}

impl From<ProofError> for FixDescriptorError {
    fn from(value: ProofError) -> Self {
        FixDescriptorError::Proof(value)
    }
}
