use clap::{Parser, Subcommand};
use sentei::convert::export_file_name;
use sentei::prelude::*;
use serde_json::Value;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Inspect stored device filters and inventory exports
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preview request body for a stored filter
    Operations {
        /// Path to the stored filter JSON (versioned tree or legacy flat list)
        path: String,
    },
    /// Print the legacy flat condition list for a stored filter
    Flatten { path: String },
    /// Print the ASCII diagram of a stored filter
    Visualize { path: String },
    /// Validate an inventory export file and report what would be imported
    CheckImport { path: String },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Operations { path } => {
            let stored = load_stored_filter(&path);
            let tree = stored
                .to_tree()
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid filter: {}", e)));
            if !tree.has_conditions() {
                exit_with_error("The filter is empty, there is nothing to preview.");
            }
            let operations = stored
                .to_operations()
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid filter: {}", e)));
            print_json(&PreviewRequest { operations });
        }
        Command::Flatten { path } => {
            let flat = load_stored_filter(&path)
                .to_flat()
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid filter: {}", e)));
            print_json(&flat);
        }
        Command::Visualize { path } => {
            let tree = load_stored_filter(&path)
                .to_tree()
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid filter: {}", e)));
            println!("{}", generate_tree_visualization(&tree));
        }
        Command::CheckImport { path } => {
            let value = read_json(&path);
            let imported = InventoryExport::import(&value)
                .unwrap_or_else(|e| exit_with_error(&format!("Import rejected: {}", e)));
            println!("Import OK");
            println!("  -> Name:        {}", imported.name);
            println!("  -> Description: {}", imported.description);
            println!("  -> Nodes:       {}", imported.tree.len());
            println!("  -> Export file: {}", export_file_name(&imported.name));
            println!("\n{}", imported.tree);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(path: &str) -> Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn load_stored_filter(path: &str) -> StoredFilter {
    StoredFilter::from_value(&read_json(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Unrecognised filter in '{}': {}", path, e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialise output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
