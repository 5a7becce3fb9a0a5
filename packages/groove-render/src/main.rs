//! CLI entry point for the `groove-render` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use groove_render::{ImportTable, LengthSource, RenderConfig};

/// Render a compiled WebAssembly song module to a raw audio file.
#[derive(Parser, Debug)]
#[command(
    name = "groove-render",
    about = "Render a compiled WebAssembly song module to a raw audio file",
    version
)]
struct Cli {
    /// Path to the compiled WebAssembly song module.
    input: Option<PathBuf>,

    /// Output path for the rendered bytes [default: INPUT with a .raw extension].
    output: Option<PathBuf>,

    /// Host import table to supply at instantiation: "none" or "math3".
    #[arg(long)]
    imports: Option<ImportTable>,

    /// How to bound the extracted memory range: "exports" or "full-buffer".
    #[arg(long)]
    length_source: Option<LengthSource>,

    /// JSON file holding a render configuration. Explicit arguments override
    /// fields from the file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Resolve the CLI arguments (and the optional JSON config file) into one
/// `RenderConfig`. Arguments given on the command line win.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mut cfg = match &cli.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let input = cli
                .input
                .clone()
                .context("missing <INPUT> module path (or --config)")?;
            RenderConfig::new(input, cli.output.clone())
        }
    };

    if cli.config.is_some() {
        if let Some(input) = &cli.input {
            cfg.input = input.clone();
        }
        if let Some(output) = &cli.output {
            cfg.output = output.clone();
        }
    }
    if let Some(imports) = cli.imports {
        cfg.imports = imports;
    }
    if let Some(length_source) = cli.length_source {
        cfg.length_source = length_source;
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cfg = build_config(&cli)?;
    let summary = groove_render::render(&cfg)?;

    println!(
        "Wrote {} bytes to {}",
        summary.bytes_written,
        cfg.output.display()
    );
    Ok(())
}
