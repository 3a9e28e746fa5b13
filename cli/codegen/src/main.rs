//! Weft codegen CLI
//!
//! This binary turns a directory of component schema files into the JSON
//! provider signature consumed by downstream code generators.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

mod output;

use std::env;
use std::path::{Path, PathBuf};

use output::{commit_output, OutputOptions};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle help flag
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Weft");
        println!();
        println!("USAGE:");
        println!("    weft-codegen interface <name> <schema_dir> [FLAGS]");
        println!();
        println!("SUBCOMMANDS:");
        println!("    interface                     Generate the JSON provider signature for a schema directory");
        println!("    --help, -h                    Show this help message");
        println!("FLAGS:");
        println!("    -o, --output <path>           Write output to <path> (defaults to STDOUT)");
        println!("    -f, --force                   Overwrite the destination even if it exists");
        println!("    -s, --silent                  Silently ignore write refusals");
        println!();
        println!("EXAMPLES:");
        println!("    weft-codegen interface my-provider schemas/");
        println!("    weft-codegen interface my-provider schemas/ -o interface.json");
        return;
    }

    if let Some(command_pos) = args.iter().position(|a| a == "interface") {
        run_interface(&args, command_pos);
        return;
    }

    eprintln!("Error: no valid subcommand provided");
    eprintln!("Use 'weft-codegen --help' for usage information");
    std::process::exit(1);
}

fn run_interface(args: &[String], command_pos: usize) {
    let force = args.iter().any(|a| a == "--force" || a == "-f");
    let silent = args.iter().any(|a| a == "--silent" || a == "-s");
    let output_path = args
        .iter()
        .position(|a| a == "--output" || a == "-o")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    // Positional arguments: everything after the subcommand that is neither
    // a flag nor a flag value.
    let mut positionals: Vec<&String> = Vec::new();
    let mut index = command_pos + 1;
    while index < args.len() {
        let arg = &args[index];
        if arg == "--output" || arg == "-o" {
            index += 2;
            continue;
        }
        if arg.starts_with('-') {
            index += 1;
            continue;
        }
        positionals.push(arg);
        index += 1;
    }

    let (name, schema_dir) = match (positionals.first(), positionals.get(1)) {
        (Some(name), Some(schema_dir)) => (name.as_str(), schema_dir.as_str()),
        _ => {
            eprintln!("Error: interface requires <name> and <schema_dir>");
            eprintln!("Use 'weft-codegen --help' for usage information");
            std::process::exit(1);
        }
    };

    let provider = match interpreter::process_dir(name, Path::new(schema_dir)) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Dangling references are advisory: another provider may satisfy them
    // at composition time.
    for diagnostic in analysis::check_references(&provider) {
        logging::warn("analysis", &diagnostic.to_string());
    }

    let generated = match serde_json::to_string_pretty(&provider) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to serialize provider signature: {}", e);
            std::process::exit(1);
        }
    };

    let options = OutputOptions { force, silent };
    if let Err(e) = commit_output(&generated, output_path.as_deref(), &options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
