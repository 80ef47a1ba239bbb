//! oas2schema CLI
//!
//! Converts an OpenAPI specification into a set of JSON Schema files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oas2schema::{convert, load_document_auto, ConvertOptions};

#[derive(Parser)]
#[command(name = "oas2schema")]
#[command(about = "Convert an OpenAPI specification into JSON Schema files")]
#[command(version)]
struct Cli {
    /// Specification source: file path or URL (http:// or https://)
    schema: String,

    /// Directory to store schema files
    #[arg(long, short, default_value = "schemas")]
    output: PathBuf,

    /// Convert only the named type
    #[arg(long, short)]
    name: Option<String>,

    /// Prefix for JSON references (OpenAPI versions before 3.0 only)
    #[arg(long, short, default_value = "")]
    prefix: String,

    /// Dereference schemas instead of leaving JSON pointers
    #[arg(long)]
    stand_alone: bool,

    /// With --name, embed every type the named type references
    #[arg(long, requires = "name")]
    include_references: bool,

    /// Namespace output file names by API group and version (Kubernetes)
    #[arg(long)]
    expanded: bool,

    /// Enable Kubernetes-specific processing
    #[arg(long)]
    kubernetes: bool,

    /// Prohibit properties not in the schema (additionalProperties: false)
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let document = match load_document_auto(&cli.schema) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let mut options = ConvertOptions::new(cli.output)
        .prefix(cli.prefix)
        .stand_alone(cli.stand_alone)
        .include_references(cli.include_references)
        .expanded(cli.expanded)
        .kubernetes(cli.kubernetes)
        .strict(cli.strict);
    if let Some(name) = cli.name {
        options = options.name(name);
    }

    match convert(&document, &options) {
        Ok(report) if report.is_ok() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!("{} type(s) failed to convert", report.failures.len());
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
