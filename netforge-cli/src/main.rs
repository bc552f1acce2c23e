//! Netforge CLI - compile and validate YAML netlists from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use netforge::{lint_dir, Circuit, Library, Netforge, NetforgeError};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "netforge")]
#[command(about = "Netlist compilation and validation tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a netlist into a circuit and print it
    Compile {
        /// Path to the netlist YAML file
        #[arg(value_name = "NETLIST")]
        netlist: PathBuf,

        /// Directory of component class definitions
        #[arg(short, long, value_name = "DIR", default_value = "components")]
        components: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Compile a netlist and report pass/fail only
    Check {
        /// Path to the netlist YAML file
        #[arg(value_name = "NETLIST")]
        netlist: PathBuf,

        /// Directory of component class definitions
        #[arg(short, long, value_name = "DIR", default_value = "components")]
        components: PathBuf,
    },

    /// Validate every component class definition in a directory
    Lint {
        /// Path to the components directory
        #[arg(value_name = "DIR", default_value = "components")]
        dir: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Canonical JSON circuit form
    Json,
    /// Human-readable summary
    Human,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Compile {
            netlist,
            components,
            format,
        } => handle_compile(&netlist, &components, format),
        Commands::Check {
            netlist,
            components,
        } => handle_check(&netlist, &components),
        Commands::Lint { dir } => handle_lint(&dir),
    };

    process::exit(exit_code);
}

/// Exit codes: 0 compiled, 1 usage/IO/parse problem, 2 netlist failed
/// compilation or validation.
fn handle_compile(netlist: &Path, components: &Path, format: OutputFormat) -> i32 {
    let library = match Library::from_dir(components) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match Netforge::compile_file(netlist, &library) {
        Ok(circuit) => {
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&circuit).unwrap())
                }
                OutputFormat::Human => print_summary(&circuit),
            }
            0
        }
        Err(NetforgeError::Compile(e)) => {
            eprintln!("Compile failed: {}", e);
            2
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_check(netlist: &Path, components: &Path) -> i32 {
    let library = match Library::from_dir(components) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match Netforge::compile_file(netlist, &library) {
        Ok(circuit) => {
            let stats = circuit.stats();
            println!(
                "OK: {} components, {} nets, {} connections",
                stats.component_count, stats.net_count, stats.connection_count
            );
            0
        }
        Err(NetforgeError::Compile(e)) => {
            eprintln!("Compile failed: {}", e);
            2
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_lint(dir: &Path) -> i32 {
    let report = match lint_dir(dir) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    for issue in &report.issues {
        println!("{}: {}", issue.path.display(), issue.message);
    }

    if report.is_clean() {
        println!("OK: {} component files checked", report.checked);
        0
    } else {
        println!(
            "FAILED: {} issue(s) in {} files checked",
            report.issues.len(),
            report.checked
        );
        1
    }
}

fn print_summary(circuit: &Circuit) {
    let stats = circuit.stats();
    println!("Components: {}", stats.component_count);
    for component in circuit.components.values() {
        let kind = component.kind.as_deref().unwrap_or("?");
        match &component.value {
            Some(value) => println!("  {} ({}, {})", component.id, kind, value),
            None => println!("  {} ({})", component.id, kind),
        }
    }

    println!("Nets: {}", stats.net_count);
    for net in circuit.nets.values() {
        println!("  {}: {}", net.id, net.pins.join(", "));
    }
}
