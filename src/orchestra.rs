//! In-memory model of an Orchestra (FIX repository) XML document: fields,
//! code sets, components, groups, and messages, plus the `roxmltree`-backed
//! parser that builds it.

pub mod model;
pub mod xml;

pub use model::{
    CodeSet, Component, Field, Group, Message, Presence, Ref, Repository,
};
pub use xml::parse_repository;
