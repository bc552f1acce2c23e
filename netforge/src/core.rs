//! Top-level compile API and error types shared by the library and CLI.

use std::path::Path;

use crate::compiler;
use crate::compiler::Phase;
use crate::library::Library;
use crate::model::Circuit;
use crate::netlist::NetlistDoc;

/// Classified compilation failure. All kinds are terminal and
/// non-retryable; the first one encountered aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Component class definition has no usable pin table.
    #[error("component class definition for {class} has no pin table")]
    MalformedClassDefinition { class: String },
    /// Netlist names a library reference the library map does not contain.
    #[error("component ref '{reference}' not found in library")]
    UnknownLibraryRef { reference: String },
    /// Pin reference is missing the `<component>.<pin>` separator.
    #[error("invalid pin id: {pin_id}")]
    MalformedPinReference { pin_id: String },
    /// Pin reference names a component not present in the circuit.
    #[error("component {component} not found in circuit")]
    UnknownComponent { component: String },
    /// Pin reference names a pin the component does not have.
    #[error("pin {pin} not found on component {component}")]
    UnknownPin { component: String, pin: String },
    /// Two pins share a global pin id. Impossible when component ids are
    /// unique, but re-verified to guard against loader bugs.
    #[error("duplicate pin id: {pin_id}")]
    DuplicatePinId { pin_id: String },
    /// A pin has no net assigned after all connections were applied.
    #[error("floating pin: {pin_id}")]
    FloatingPin { pin_id: String },
    /// A net references fewer than two pins.
    #[error("net {net} has {count} pin(s), needs at least 2")]
    UndersizedNet { net: String, count: usize },
    /// A net lists a pin id that does not resolve to a real pin.
    #[error("net {net} references unknown pin {pin_id}")]
    DanglingNetReference { net: String, pin_id: String },
    /// No net literally named `GND` exists.
    #[error("circuit has no GND net")]
    MissingGroundNet,
    /// No ground-role pin is a member of the GND net.
    #[error("no ground-role pin is connected to the GND net")]
    UnconnectedGroundRole,
    /// A ground-role pin's net assignment points at a net other than GND.
    #[error("ground pin {pin_id} is routed to net {net} instead of GND")]
    GroundRoleMisrouted { pin_id: String, net: String },
}

/// Errors surfaced by the file-level API: compilation failures plus the
/// document and IO layers around them.
#[derive(Debug, thiserror::Error)]
pub enum NetforgeError {
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Core compile API used by both library consumers and the CLI.
pub struct Netforge;

impl Netforge {
    /// Compile a YAML netlist file against an explicit component library.
    pub fn compile_file(netlist: &Path, library: &Library) -> Result<Circuit, NetforgeError> {
        let source = std::fs::read_to_string(netlist)?;
        Self::compile_source(&source, library)
    }

    /// Compile netlist YAML source against an explicit component library.
    pub fn compile_source(source: &str, library: &Library) -> Result<Circuit, NetforgeError> {
        tracing::debug!(phase = %Phase::ParsingSchema, "parsing netlist document");
        let doc = NetlistDoc::parse(source).map_err(|e| NetforgeError::Parse(e.to_string()))?;
        Ok(compiler::compile(&doc, library)?)
    }

    /// Compile a netlist file and render the circuit in canonical JSON.
    pub fn compile_to_json(netlist: &Path, library: &Library) -> Result<String, NetforgeError> {
        let circuit = Self::compile_file(netlist, library)?;
        serde_json::to_string_pretty(&circuit).map_err(|e| NetforgeError::Parse(e.to_string()))
    }
}
