//! Compile a YAML netlist against a component directory and print the
//! canonical JSON form.

use netforge::{Library, Netforge, NetforgeError};
use std::path::Path;

fn main() -> Result<(), NetforgeError> {
    let mut args = std::env::args().skip(1);
    let netlist = args.next().unwrap_or_else(|| "netlist.yaml".to_string());
    let components = args.next().unwrap_or_else(|| "components".to_string());

    if !Path::new(&netlist).exists() {
        eprintln!("File not found: {}", netlist);
        eprintln!("Usage: cargo run --example compile [netlist.yaml] [components_dir]");
        std::process::exit(1);
    }

    let library = Library::from_dir(Path::new(&components))?;
    let json = Netforge::compile_to_json(Path::new(&netlist), &library)?;
    println!("{}", json);
    Ok(())
}
