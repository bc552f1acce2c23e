//! Netforge - declarative netlist compilation and validation
//!
//! This library compiles a declarative circuit description (component
//! instances plus net connectivity) into an in-memory circuit graph and
//! certifies it against structural and electrical-reference rules before it
//! is handed to anything downstream.
//!
//! # Quick Start
//!
//! ```no_run
//! use netforge::{Library, Netforge};
//! use std::path::Path;
//!
//! let library = Library::from_dir(Path::new("components")).unwrap();
//! let circuit = Netforge::compile_file(Path::new("netlist.yaml"), &library).unwrap();
//!
//! for net in circuit.nets.values() {
//!     println!("{}: {:?}", net.id, net.pins);
//! }
//! ```
//!
//! # Pipeline
//!
//! Compilation is strictly linear and fail-fast:
//!
//! - **Parse**: typed YAML deserialization of the netlist document
//! - **Instantiate**: components built from an explicit library map
//! - **Connect**: declared nets wired pin by pin, in document order
//! - **Validate**: structural integrity, then electrical-reference rules
//!
//! The first error aborts compilation; no partial circuit is returned.

pub mod compiler;
pub mod connect;
pub mod core;
pub mod graph;
pub mod library;
pub mod model;
pub mod netlist;
pub mod validate;

// Re-export main types
pub use crate::core::{CompileError, Netforge, NetforgeError};
pub use crate::compiler::{compile, Phase};
pub use crate::connect::connect as connect_pin;
pub use crate::graph::{CircuitGraph, GraphStats};
pub use crate::library::{lint_dir, ComponentClass, Library, LintReport};
pub use crate::model::{Circuit, CircuitStats, Component, Net, Pin};
pub use crate::netlist::NetlistDoc;
pub use crate::validate::{validate_electrical_reference, validate_structure};

/// Parse a netlist document (convenience wrapper).
pub fn parse_netlist(source: &str) -> Result<NetlistDoc, NetforgeError> {
    NetlistDoc::parse(source).map_err(|e| NetforgeError::Parse(e.to_string()))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Circuit, CircuitGraph, CompileError, Component, Library, Net, Netforge, NetforgeError, Pin,
    };
}
