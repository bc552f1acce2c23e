//! Netlist compilation pipeline.
//!
//! Compilation is one linear, single-threaded pass: instantiate components
//! from the library map, wire every declared net in document order, then
//! run the two validation phases. The first error aborts the run and no
//! partial circuit escapes to the caller.

use std::fmt;

use crate::connect::connect;
use crate::core::CompileError;
use crate::library::Library;
use crate::model::Circuit;
use crate::netlist::NetlistDoc;
use crate::validate::{validate_electrical_reference, validate_structure};

/// Pipeline states, in execution order. Any state can fall through to a
/// terminal failure carrying the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ParsingSchema,
    Instantiating,
    Connecting,
    StructuralValidation,
    ElectricalValidation,
    Compiled,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ParsingSchema => "parsing-schema",
            Phase::Instantiating => "instantiating",
            Phase::Connecting => "connecting",
            Phase::StructuralValidation => "structural-validation",
            Phase::ElectricalValidation => "electrical-validation",
            Phase::Compiled => "compiled",
        };
        f.write_str(name)
    }
}

/// Compile a parsed netlist document against an explicit component library.
pub fn compile(doc: &NetlistDoc, library: &Library) -> Result<Circuit, CompileError> {
    let mut circuit = Circuit::new();

    tracing::debug!(phase = %Phase::Instantiating, components = doc.components.len());
    for (instance_id, entry) in &doc.components {
        let class =
            library
                .get(&entry.reference)
                .ok_or_else(|| CompileError::UnknownLibraryRef {
                    reference: entry.reference.clone(),
                })?;
        let mut component = class.instantiate(instance_id)?;
        if let Some(value) = &entry.value {
            // instance value replaces the class default
            component.value = Some(value.clone());
        }
        circuit.add_component(component);
    }

    tracing::debug!(phase = %Phase::Connecting, nets = doc.nets.len());
    for (net_id, pin_refs) in &doc.nets {
        for pin_id in pin_refs {
            connect(&mut circuit, net_id, pin_id)?;
        }
    }

    tracing::debug!(phase = %Phase::StructuralValidation);
    validate_structure(&circuit)?;

    tracing::debug!(phase = %Phase::ElectricalValidation);
    validate_electrical_reference(&circuit)?;

    let stats = circuit.stats();
    tracing::debug!(
        phase = %Phase::Compiled,
        components = stats.component_count,
        nets = stats.net_count,
    );
    Ok(circuit)
}
