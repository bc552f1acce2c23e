//! Minimal demo: build two resistors in series by hand, validate, and
//! print the circuit graph as JSON.

use netforge::{
    connect_pin, validate_structure, Circuit, CompileError, ComponentClass,
};

fn main() -> Result<(), CompileError> {
    let resistor = ComponentClass::from_yaml(
        "type: resistor\nvalue: 1k\npins:\n  \"1\": {direction: passive}\n  \"2\": {direction: passive}\n",
    )
    .expect("class parses");
    let terminal = ComponentClass::from_yaml("type: terminal\npins:\n  \"1\": {}\n")
        .expect("class parses");

    let mut circuit = Circuit::new();
    circuit.add_component(resistor.instantiate("R1")?);
    circuit.add_component(resistor.instantiate("R2")?);
    circuit.add_component(terminal.instantiate("P1")?);
    circuit.add_component(terminal.instantiate("P2")?);

    // series chain: N_in - R1 - N_mid - R2 - N_out
    connect_pin(&mut circuit, "N_in", "R1.1")?;
    connect_pin(&mut circuit, "N_in", "P1.1")?;
    connect_pin(&mut circuit, "N_mid", "R1.2")?;
    connect_pin(&mut circuit, "N_mid", "R2.1")?;
    connect_pin(&mut circuit, "N_out", "R2.2")?;
    connect_pin(&mut circuit, "N_out", "P2.1")?;

    match validate_structure(&circuit) {
        Ok(()) => println!("Circuit is structurally valid"),
        Err(e) => println!("Validation error: {}", e),
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&circuit).expect("circuit serializes")
    );
    Ok(())
}
