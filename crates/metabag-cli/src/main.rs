//! `metabag` CLI — convert metadata documents between plain and tagged JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Plain JSON → tagged JSON (stdin → stdout)
//! echo '{"title":"Voyager","season":3}' | metabag encode
//!
//! # Encode from file to file, indented
//! metabag encode --pretty -i data.json -o data.tagged.json
//!
//! # Tagged (or plain) JSON → plain JSON
//! metabag decode -i data.tagged.json
//!
//! # List top-level keys with their value types
//! metabag inspect -i data.tagged.json
//! ```
//!
//! Set `METABAG_LOG` (e.g. `METABAG_LOG=metabag_core=trace`) or pass
//! `--verbose` to see decoder diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metabag_core::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "metabag",
    version,
    about = "Typed metadata documents: tagged JSON encoding and decoding"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder diagnostics to stderr (overrides METABAG_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode plain JSON into tagged metadata JSON
    Encode {
        /// Input file (`-` or omitted reads stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode tagged (or plain) metadata JSON back into plain JSON
    Decode {
        /// Input file (`-` or omitted reads stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Write compact JSON instead of pretty-printing
        #[arg(long)]
        compact: bool,
    },
    /// List the top-level keys of a metadata document with their types
    Inspect {
        /// Input file (`-` or omitted reads stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode {
            input,
            output,
            pretty,
        } => {
            let json = read_input(input.as_deref())?;
            let tagged = metabag_core::encode(&json).context("Failed to encode JSON")?;
            let tagged = if pretty {
                let value: serde_json::Value = serde_json::from_str(&tagged)?;
                serde_json::to_string_pretty(&value)?
            } else {
                tagged
            };
            write_output(output.as_deref(), &tagged)?;
        }
        Commands::Decode {
            input,
            output,
            compact,
        } => {
            let json = read_input(input.as_deref())?;
            let plain = metabag_core::decode(&json).context("Failed to decode metadata")?;
            let plain = if compact {
                plain
            } else {
                let value: serde_json::Value = serde_json::from_str(&plain)?;
                serde_json::to_string_pretty(&value)?
            };
            write_output(output.as_deref(), &plain)?;
        }
        Commands::Inspect { input } => {
            let json = read_input(input.as_deref())?;
            let metadata = metabag_core::from_str(&json).context("Failed to decode metadata")?;
            if metadata.is_empty() {
                println!("(empty)");
            }
            for (key, value) in &metadata {
                println!("{}: {}", key, describe(value));
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `--verbose` wins over `METABAG_LOG`;
/// without either only warnings are shown.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("METABAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// One-line type summary: `int`, `array[3]`, `object{2}`, ...
fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("{}[{}]", value.type_name(), items.len()),
        Value::Object(metadata) => format!("{}{{{}}}", value.type_name(), metadata.len()),
        _ => value.type_name().to_string(),
    }
}

/// Whole input as text. `None` and `-` both mean stdin.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path.filter(|path| *path != Path::new("-")) {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => io::read_to_string(io::stdin().lock()).context("Failed to read from stdin"),
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")
        }
    }
}
