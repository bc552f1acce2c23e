//! Circuit data model: pins, components, nets, and the circuit aggregate.
//!
//! The model is pure data plus structural accessors. A `Net` records the
//! pin ids connected to it (insertion order, duplicates suppressed); each
//! `Pin` independently records the net it currently belongs to. Both
//! relations are maintained by [`crate::connect::connect`], nothing else
//! mutates them. Serialization produces the canonical form consumed by
//! renderers and exporters: `{components: {...}, nets: {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::CompileError;

/// Split a `<component_id>.<pin_name>` reference at the first dot.
///
/// Pin names may themselves contain dots; only the first separator is
/// significant.
pub fn split_pin_ref(pin_id: &str) -> Result<(&str, &str), CompileError> {
    pin_id
        .split_once('.')
        .ok_or_else(|| CompileError::MalformedPinReference {
            pin_id: pin_id.to_string(),
        })
}

/// One electrical terminal on a component instance.
///
/// `direction` and `role` are open vocabularies carried as plain strings;
/// the loader does not restrict them and the validators only interpret the
/// `ground` role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Globally unique id, `<component_id>.<pin_name>`.
    pub id: String,
    /// Pin name, unique within the owning component.
    pub name: String,
    /// Id of the owning component.
    pub parent: String,
    /// Electrical direction (`input`, `output`, `passive`, ...).
    pub direction: String,
    /// Optional electrical role tag (e.g. `ground`).
    pub role: Option<String>,
    /// Net this pin is currently assigned to; `None` while floating.
    pub net: Option<String>,
}

impl Pin {
    pub fn is_floating(&self) -> bool {
        self.net.is_none()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

/// One instance of a component class.
///
/// The pin name set is fixed at instantiation; only each pin's net
/// assignment changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    /// Class tag from the component class definition.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Instance value; overrides the class default when set.
    pub value: Option<String>,
    /// Pins keyed by pin name, owned exclusively by this component.
    pub pins: BTreeMap<String, Pin>,
}

impl Component {
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// Pins that have no net assigned yet.
    pub fn floating_pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values().filter(|p| p.is_floating())
    }
}

/// A named equipotential set of pins.
///
/// Membership is recorded by pin id and is append-only; see
/// [`crate::connect::connect`] for the exact semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub id: String,
    /// Member pin ids in connection order, duplicates suppressed.
    pub pins: Vec<String>,
}

impl Net {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pins: Vec::new(),
        }
    }

    pub fn contains(&self, pin_id: &str) -> bool {
        self.pins.iter().any(|p| p == pin_id)
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }
}

/// The aggregate root: all components and nets of one compiled netlist.
///
/// Sorted maps keep validator iteration and error reporting deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub components: BTreeMap<String, Component>,
    pub nets: BTreeMap<String, Net>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn net(&self, id: &str) -> Option<&Net> {
        self.nets.get(id)
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.insert(component.id.clone(), component);
    }

    /// All pins of all components, in sorted component/pin order.
    pub fn all_pins(&self) -> impl Iterator<Item = &Pin> {
        self.components.values().flat_map(|c| c.pins.values())
    }

    /// Resolve a `<component_id>.<pin_name>` reference to its pin.
    pub fn resolve_pin(&self, pin_id: &str) -> Result<&Pin, CompileError> {
        let (comp_id, pin_name) = split_pin_ref(pin_id)?;
        let component =
            self.components
                .get(comp_id)
                .ok_or_else(|| CompileError::UnknownComponent {
                    component: comp_id.to_string(),
                })?;
        component
            .pins
            .get(pin_name)
            .ok_or_else(|| CompileError::UnknownPin {
                component: comp_id.to_string(),
                pin: pin_name.to_string(),
            })
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            component_count: self.components.len(),
            net_count: self.nets.len(),
            pin_count: self.all_pins().count(),
            connection_count: self.nets.values().map(|n| n.pins.len()).sum(),
        }
    }
}

/// Size summary of a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitStats {
    pub component_count: usize,
    pub net_count: usize,
    pub pin_count: usize,
    pub connection_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor(id: &str) -> Component {
        let mut pins = BTreeMap::new();
        for name in ["1", "2"] {
            pins.insert(
                name.to_string(),
                Pin {
                    id: format!("{}.{}", id, name),
                    name: name.to_string(),
                    parent: id.to_string(),
                    direction: "passive".to_string(),
                    role: None,
                    net: None,
                },
            );
        }
        Component {
            id: id.to_string(),
            kind: Some("resistor".to_string()),
            value: Some("1k".to_string()),
            pins,
        }
    }

    #[test]
    fn test_split_pin_ref() {
        assert_eq!(split_pin_ref("R1.1").unwrap(), ("R1", "1"));
        // only the first dot separates component from pin name
        assert_eq!(split_pin_ref("U1.A.B").unwrap(), ("U1", "A.B"));

        let err = split_pin_ref("R1").unwrap_err();
        assert!(matches!(
            err,
            CompileError::MalformedPinReference { pin_id } if pin_id == "R1"
        ));
    }

    #[test]
    fn test_resolve_pin() {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor("R1"));

        assert_eq!(circuit.resolve_pin("R1.1").unwrap().id, "R1.1");
        assert!(matches!(
            circuit.resolve_pin("R2.1"),
            Err(CompileError::UnknownComponent { .. })
        ));
        assert!(matches!(
            circuit.resolve_pin("R1.3"),
            Err(CompileError::UnknownPin { .. })
        ));
    }

    #[test]
    fn test_net_contains() {
        let mut net = Net::new("N1");
        net.pins.push("R1.1".to_string());
        assert!(net.contains("R1.1"));
        assert!(!net.contains("R1.2"));
    }

    #[test]
    fn test_canonical_serialization_shape() {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor("R1"));
        let mut net = Net::new("N1");
        net.pins.push("R1.1".to_string());
        circuit.nets.insert("N1".to_string(), net);

        let json = serde_json::to_value(&circuit).unwrap();
        let comp = &json["components"]["R1"];
        assert_eq!(comp["type"], "resistor");
        assert_eq!(comp["value"], "1k");
        let pin = &comp["pins"]["1"];
        assert_eq!(pin["id"], "R1.1");
        assert_eq!(pin["parent"], "R1");
        assert_eq!(pin["direction"], "passive");
        assert!(pin["role"].is_null());
        assert!(pin["net"].is_null());
        assert_eq!(json["nets"]["N1"]["pins"][0], "R1.1");
    }

    #[test]
    fn test_stats() {
        let mut circuit = Circuit::new();
        circuit.add_component(resistor("R1"));
        circuit.add_component(resistor("R2"));
        let mut net = Net::new("N1");
        net.pins.push("R1.2".to_string());
        net.pins.push("R2.1".to_string());
        circuit.nets.insert("N1".to_string(), net);

        let stats = circuit.stats();
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.net_count, 1);
        assert_eq!(stats.pin_count, 4);
        assert_eq!(stats.connection_count, 2);
    }
}
