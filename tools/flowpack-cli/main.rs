use clap::Parser;
use flowpack::prelude::*;
use std::io::{self, Write};
use std::process;

/// Workflow archive inspector for the flowpack serialization engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a `.flow` archive, `.zip` container, or bare workflow JSON
    archive_path: Option<String>,

    /// Directory holding the lookup-list JSON files (tables.json, ...)
    #[arg(short, long)]
    lookups: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();

    let archive_path = if cli.human {
        prompt_for_input("Enter workflow archive path", Some("workflow.flow"))
    } else {
        cli.archive_path
            .unwrap_or_else(|| exit_with_error("Archive path is required in non-interactive mode."))
    };

    let lookups = match &cli.lookups {
        Some(dir) => LookupLists::from_dir(Path::new(dir)),
        None => LookupLists::default(),
    };

    inspect_archive(&archive_path, &lookups);
}

fn inspect_archive(archive_path: &str, lookups: &LookupLists) {
    let registry = NodeSchemaRegistry::new(lookups);
    let store = AttachmentStore::new()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to set up attachment store: {}", e)));

    let mut snapshot = GraphSnapshot::new();
    let importer = Importer::new(&registry, &store);
    let document = importer
        .import(&mut snapshot, Path::new(archive_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Import failed: {}", e)));

    println!("Workflow:    {}", document.workflow_name);
    if !document.description.is_empty() {
        println!("Description: {}", document.description);
    }
    println!(
        "Steps:       {} ({} restored as nodes)",
        document.steps.len(),
        snapshot.len()
    );
    println!("Edges:       {}", snapshot.edges().len());

    for step in &document.steps {
        println!("\n[{}] {} ({})", step.sequence_id, step.name, step.tag);
        if let Some([x, y]) = step.position {
            println!("  position: ({x}, {y})");
        }
        for (name, value) in &step.fields {
            println!("  {}: {}", name, value);
        }
        if let Some(attached) = &step.attached_file {
            println!("  attachment: {} -> {}", attached, store.resolve(attached).display());
        }
        for connection in &step.connections {
            match connection.to_node_sequence_id {
                Some(destination) => println!(
                    "  {} -> step {}",
                    connection.from_port_name, destination
                ),
                None => println!(
                    "  {} -> node {}",
                    connection.from_port_name,
                    connection.to_node_id.as_deref().unwrap_or("?")
                ),
            }
        }
    }
}

/// Prompts the user for input with an optional default value.
fn prompt_for_input(prompt: &str, default: Option<&str>) -> String {
    match default {
        Some(value) => print!("{} [{}]: ", prompt, value),
        None => print!("{}: ", prompt),
    }
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read input.");
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed.to_string()
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
