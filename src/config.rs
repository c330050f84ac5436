//! Caller-facing configuration and the schema cache
//! — schemas are parsed once and cached by path+hash.
//!
//! The cache key is a content hash, not just the path, so a schema file
//! edited in place (e.g. during development) is reloaded rather than
//! served stale. The hash is a plain FNV-1a over the file bytes — this
//! crate reaches for `tiny-keccak` only for the one hash the on-chain
//! verifier must match bit for bit; a cache key that never leaves the
//! process doesn't need a second hashing dependency.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::descriptor::Tag;
use crate::error::SchemaError;
use crate::fix::Separator;
use crate::sbe::{load_schema, Schema};

/// Which field separator to assume when parsing raw FIX input.
/// An alias for [`crate::fix::Separator`]: the same four
/// values, named from the configuration surface rather than the parser.
pub type SeparatorHint = Separator;

/// Selects a message within a schema by either its numeric template id or
/// its declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRef {
    Id(u32),
    Name(String),
}

/// The recognized configuration options for driving the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub schema_path: PathBuf,
    pub message: MessageRef,
    pub separator_hint: SeparatorHint,
    /// Per-field-id scale override for `Qty`/`Price`/`PriceOffset`/`Amt`/
    /// `Percentage` fields, applied at Orchestra->SBE compile time.
    pub scaling_overrides: HashMap<Tag, u32>,
}

impl Config {
    pub fn new(schema_path: impl Into<PathBuf>, message: MessageRef) -> Self {
        Self {
            schema_path: schema_path.into(),
            message,
            separator_hint: SeparatorHint::Auto,
            scaling_overrides: HashMap::new(),
        }
    }
}

/// Failure loading a schema file from disk: either the read itself failed,
/// or the bytes didn't parse as a conformant SBE schema.
#[derive(Debug)]
pub enum SchemaLoadError {
    Io(std::io::Error),
    Schema(SchemaError),
}

impl fmt::Display for SchemaLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLoadError::Io(e) => write!(f, "reading schema file: {e}"),
            SchemaLoadError::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SchemaLoadError {}

impl From<std::io::Error> for SchemaLoadError {
    fn from(value: std::io::Error) -> Self {
        SchemaLoadError::Io(value)
    }
}

impl From<SchemaError> for SchemaLoadError {
    fn from(value: SchemaError) -> Self {
        SchemaLoadError::Schema(value)
    }
}

/// Parsed schemas, cached by `(path, content hash)` so a process that
/// repeatedly drives the same schema file only pays the XML-parse cost
/// once. Not `Sync`: wrap in a `Mutex` to share across threads once a
/// `Schema` itself has been built.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<(PathBuf, u64), Schema>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Returns the cached schema for `path` if its content hash matches a
    /// prior load, otherwise reads, parses, and caches it.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&Schema, SchemaLoadError> {
        let bytes = std::fs::read(path)?;
        let key = (path.to_path_buf(), fnv1a64(&bytes));
        if !self.entries.contains_key(&key) {
            let xml = String::from_utf8_lossy(&bytes).into_owned();
            let schema = load_schema(&xml)?;
            self.entries.insert(key.clone(), schema);
        }
        Ok(self.entries.get(&key).expect("just inserted"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
