//! Two-phase circuit validation.
//!
//! Phase 1 ([`validate_structure`]) checks graph well-formedness: pin-id
//! uniqueness, no floating pins, net cardinality, and net referential
//! integrity. Phase 2 ([`validate_electrical_reference`]) checks the
//! ground-reference rules and runs only after Phase 1 has passed.
//! Components and pins are checked before nets, and all iteration is in
//! sorted id order, so the first reported violation is stable.

use std::collections::HashSet;

use crate::core::CompileError;
use crate::model::{split_pin_ref, Circuit, Pin};

/// Reserved name of the ground reference net.
pub const GROUND_NET: &str = "GND";
/// Pin role marking a ground reference terminal.
pub const GROUND_ROLE: &str = "ground";

/// Phase 1: structural integrity.
pub fn validate_structure(circuit: &Circuit) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for component in circuit.components.values() {
        for pin in component.pins.values() {
            // unique component ids make duplicates impossible by
            // construction; re-verified to guard against loader bugs
            if !seen.insert(pin.id.as_str()) {
                return Err(CompileError::DuplicatePinId {
                    pin_id: pin.id.clone(),
                });
            }
            if pin.is_floating() {
                return Err(CompileError::FloatingPin {
                    pin_id: pin.id.clone(),
                });
            }
        }
    }

    for net in circuit.nets.values() {
        if net.pin_count() < 2 {
            return Err(CompileError::UndersizedNet {
                net: net.id.clone(),
                count: net.pin_count(),
            });
        }
        for pin_id in &net.pins {
            let resolves = split_pin_ref(pin_id).ok().is_some_and(|(comp_id, pin_name)| {
                circuit
                    .components
                    .get(comp_id)
                    .is_some_and(|c| c.pins.contains_key(pin_name))
            });
            if !resolves {
                return Err(CompileError::DanglingNetReference {
                    net: net.id.clone(),
                    pin_id: pin_id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Phase 2: electrical reference rules around the `GND` net.
///
/// The misrouting check reads each ground-role pin's own net field, not the
/// net membership lists: a stale membership entry in `GND` does not excuse
/// a pin whose assignment points elsewhere.
pub fn validate_electrical_reference(circuit: &Circuit) -> Result<(), CompileError> {
    let gnd = circuit
        .nets
        .get(GROUND_NET)
        .ok_or(CompileError::MissingGroundNet)?;

    let ground_pins: Vec<&Pin> = circuit
        .all_pins()
        .filter(|p| p.has_role(GROUND_ROLE))
        .collect();

    if !ground_pins.iter().any(|p| gnd.contains(&p.id)) {
        return Err(CompileError::UnconnectedGroundRole);
    }

    for pin in ground_pins {
        if pin.net.as_deref() != Some(GROUND_NET) {
            return Err(CompileError::GroundRoleMisrouted {
                pin_id: pin.id.clone(),
                net: pin.net.clone().unwrap_or_else(|| "(none)".to_string()),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::connect;
    use crate::library::ComponentClass;

    fn resistor_class() -> ComponentClass {
        ComponentClass::from_yaml(
            "type: resistor\npins:\n  \"1\": {direction: passive}\n  \"2\": {direction: passive}\n",
        )
        .unwrap()
    }

    fn ground_class() -> ComponentClass {
        ComponentClass::from_yaml("type: ground\npins:\n  \"1\": {role: ground}\n").unwrap()
    }

    /// R1 and R2 in parallel between N1 and GND, plus a ground symbol.
    fn valid_circuit() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor_class().instantiate("R1").unwrap());
        circuit.add_component(resistor_class().instantiate("R2").unwrap());
        circuit.add_component(ground_class().instantiate("G1").unwrap());

        connect(&mut circuit, "N1", "R1.1").unwrap();
        connect(&mut circuit, "N1", "R2.1").unwrap();
        connect(&mut circuit, "GND", "R1.2").unwrap();
        connect(&mut circuit, "GND", "R2.2").unwrap();
        connect(&mut circuit, "GND", "G1.1").unwrap();
        circuit
    }

    #[test]
    fn test_valid_circuit_passes_both_phases() {
        let circuit = valid_circuit();
        validate_structure(&circuit).unwrap();
        validate_electrical_reference(&circuit).unwrap();
    }

    #[test]
    fn test_floating_pin() {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor_class().instantiate("R1").unwrap());
        connect(&mut circuit, "N1", "R1.1").unwrap();

        let err = validate_structure(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::FloatingPin { pin_id } if pin_id == "R1.2"
        ));
    }

    #[test]
    fn test_net_cardinality_boundary() {
        // one pin fails
        let mut circuit = valid_circuit();
        connect(&mut circuit, "N_extra", "R1.1").unwrap();
        let err = validate_structure(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UndersizedNet { net, count } if net == "N_extra" && count == 1
        ));

        // two pins pass
        let circuit = valid_circuit();
        assert_eq!(circuit.net("N1").unwrap().pin_count(), 2);
        validate_structure(&circuit).unwrap();
    }

    #[test]
    fn test_dangling_net_reference() {
        let mut circuit = valid_circuit();
        circuit
            .nets
            .get_mut("N1")
            .unwrap()
            .pins
            .push("R9.1".to_string());

        let err = validate_structure(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DanglingNetReference { net, pin_id }
                if net == "N1" && pin_id == "R9.1"
        ));
    }

    #[test]
    fn test_duplicate_pin_id() {
        let mut circuit = valid_circuit();
        // forge a duplicate: R2's first pin claims R1's id
        let forged = circuit.components.get_mut("R2").unwrap();
        forged.pins.get_mut("1").unwrap().id = "R1.1".to_string();

        let err = validate_structure(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicatePinId { pin_id } if pin_id == "R1.1"
        ));
    }

    #[test]
    fn test_missing_ground_net() {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor_class().instantiate("R1").unwrap());
        circuit.add_component(resistor_class().instantiate("R2").unwrap());
        connect(&mut circuit, "N1", "R1.1").unwrap();
        connect(&mut circuit, "N1", "R2.1").unwrap();
        connect(&mut circuit, "N2", "R1.2").unwrap();
        connect(&mut circuit, "N2", "R2.2").unwrap();

        validate_structure(&circuit).unwrap();
        assert!(matches!(
            validate_electrical_reference(&circuit),
            Err(CompileError::MissingGroundNet)
        ));
    }

    #[test]
    fn test_unconnected_ground_role() {
        // GND net exists but no ground-role pin is in its member list
        let mut circuit = Circuit::new();
        circuit.add_component(resistor_class().instantiate("R1").unwrap());
        circuit.add_component(resistor_class().instantiate("R2").unwrap());
        circuit.add_component(ground_class().instantiate("G1").unwrap());
        connect(&mut circuit, "GND", "R1.1").unwrap();
        connect(&mut circuit, "GND", "R2.1").unwrap();
        connect(&mut circuit, "N1", "R1.2").unwrap();
        connect(&mut circuit, "N1", "R2.2").unwrap();
        connect(&mut circuit, "N1", "G1.1").unwrap();

        assert!(matches!(
            validate_electrical_reference(&circuit),
            Err(CompileError::UnconnectedGroundRole)
        ));
    }

    #[test]
    fn test_ground_role_misrouted_uses_pin_net_field() {
        let mut circuit = valid_circuit();
        // reconnect the ground pin elsewhere; its GND membership goes stale
        connect(&mut circuit, "N1", "G1.1").unwrap();
        assert!(circuit.net("GND").unwrap().contains("G1.1"));

        let err = validate_electrical_reference(&circuit).unwrap_err();
        assert!(matches!(
            err,
            CompileError::GroundRoleMisrouted { pin_id, net }
                if pin_id == "G1.1" && net == "N1"
        ));
    }
}
