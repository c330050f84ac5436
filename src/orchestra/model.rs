//! Orchestra repository types.
//!
//! Everything here is built once from parsed XML and is immutable
//! afterwards: the schema compiler consumes a
//! `&Repository` and never mutates it.

use std::collections::HashMap;

/// Whether a reference inside a component, group, or message is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A reference to a field, component, or group from within a component,
/// group, or message body, carrying its own presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    Field { id: u32, presence: Presence },
    Component { id: u32, presence: Presence },
    Group { id: u32, presence: Presence },
}

impl Ref {
    pub fn presence(&self) -> Presence {
        match self {
            Ref::Field { presence, .. } | Ref::Component { presence, .. } | Ref::Group { presence, .. } => {
                *presence
            }
        }
    }
}

/// One named, typed FIX field. `type_name` is either a FIX datatype
/// (`String`, `Qty`, `Price`, ...) or the name of a declared `CodeSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: u32,
    pub name: String,
    pub type_name: String,
}

/// A single enumerated value of a `CodeSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub name: String,
    pub value: String,
}

/// An enumerated FIX value domain. Per the compiler's type-mapping table
/// any `*CodeSet` field encodes as a variable-length
/// string regardless of `underlying_type` — callers that want the
/// enumerated values for validation or display can still consult `codes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSet {
    pub name: String,
    pub underlying_type: String,
    pub codes: Vec<Code>,
}

/// A reusable bundle of field/component/group references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: u32,
    pub name: String,
    pub refs: Vec<Ref>,
}

/// A repeating block: `num_in_group_field_id` names the FIX `NoXxx` count
/// tag whose numeric value is the occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: u32,
    pub name: String,
    pub num_in_group_field_id: u32,
    pub refs: Vec<Ref>,
}

/// A FIX message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u32,
    pub name: String,
    pub msg_type: String,
    pub refs: Vec<Ref>,
}

/// The fully parsed Orchestra repository: every field, code set,
/// component, group, and message declared in the input XML, indexed for
/// O(1) lookup by id (and, for messages, by name too).
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub fields: HashMap<u32, Field>,
    pub code_sets: HashMap<String, CodeSet>,
    pub components: HashMap<u32, Component>,
    pub groups: HashMap<u32, Group>,
    pub messages: Vec<Message>,
}

impl Repository {
    pub fn field(&self, id: u32) -> Option<&Field> {
        self.fields.get(&id)
    }

    pub fn component(&self, id: u32) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn group(&self, id: u32) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn message_by_id(&self, id: u32) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// True if `type_name` (a field's declared type) names a `CodeSet`
    /// rather than a primitive FIX datatype.
    pub fn is_code_set(&self, type_name: &str) -> bool {
        self.code_sets.contains_key(type_name) || type_name.ends_with("CodeSet")
    }
}
