//! Incremental net wiring.
//!
//! [`connect`] is the only mutation path for pin/net relationships. Net
//! membership is append-only and idempotent; a pin's net pointer is
//! last-write-wins. Reconnecting a pin to a different net leaves the stale
//! membership entry in the old net's list — the electrical validator
//! resolves such entries against the pin's own net field, which is
//! authoritative.

use crate::core::CompileError;
use crate::model::{split_pin_ref, Circuit, Net};

/// Establish that `pin_id` (`<component_id>.<pin_name>`) belongs to
/// `net_id`, creating the net on first use.
///
/// Membership is recorded before the pin reference is checked, so a bad
/// reference leaves its entry behind in the net's list. This matches the
/// append-only membership contract; structural validation later reports the
/// dangling entry.
pub fn connect(circuit: &mut Circuit, net_id: &str, pin_id: &str) -> Result<(), CompileError> {
    let net = circuit
        .nets
        .entry(net_id.to_string())
        .or_insert_with(|| Net::new(net_id));
    if !net.contains(pin_id) {
        net.pins.push(pin_id.to_string());
    }

    let (comp_id, pin_name) = split_pin_ref(pin_id)?;

    let component =
        circuit
            .components
            .get_mut(comp_id)
            .ok_or_else(|| CompileError::UnknownComponent {
                component: comp_id.to_string(),
            })?;
    let pin = component
        .pins
        .get_mut(pin_name)
        .ok_or_else(|| CompileError::UnknownPin {
            component: comp_id.to_string(),
            pin: pin_name.to_string(),
        })?;

    // single net per pin: unconditional overwrite
    pin.net = Some(net_id.to_string());
    Ok(())
}
