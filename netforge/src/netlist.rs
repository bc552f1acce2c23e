//! Netlist document types.
//!
//! A netlist document declares component instances (each pointing at a
//! library reference, with an optional value override) and named nets
//! listing `<component>.<pin>` references. Typed deserialization stands in
//! for schema validation: a document that does not match this shape is
//! rejected before compilation starts. `IndexMap` preserves document order,
//! which the compiler relies on when applying connections.

use indexmap::IndexMap;
use serde::Deserialize;

/// A parsed netlist document.
#[derive(Debug, Clone, Deserialize)]
pub struct NetlistDoc {
    /// Component instances, in document order.
    pub components: IndexMap<String, ComponentEntry>,
    /// Nets mapping net id to its pin references, in document order.
    pub nets: IndexMap<String, Vec<String>>,
}

/// One declared component instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentEntry {
    /// Library reference key (e.g. `resistor`).
    #[serde(rename = "ref")]
    pub reference: String,
    /// Instance-level value; replaces the class default when present.
    #[serde(default)]
    pub value: Option<String>,
}

impl NetlistDoc {
    /// Parse a YAML netlist document.
    pub fn parse(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}
