use clap::Parser;
use source_obfuscator::config::{load_config, ConfigOverrides};
use source_obfuscator::{logger, run, AppError, ObfuscationTable};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "source-obfuscator", version)]
#[command(about = "Rewrite marked identifiers into their obfuscated names")]
struct Cli {
    /// Directory relative paths are resolved against [default: the current
    /// working directory, so the default paths only work from the repository root]
    #[arg(long)]
    root: Option<PathBuf>,

    /// Human-readable source file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Generated file, overwritten on success
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON mapping table to use instead of the built-in one
    #[arg(short, long)]
    mappings: Option<PathBuf>,

    /// Name of this tool as written into the generated header
    #[arg(long)]
    generator: Option<String>,

    /// Editable source path as written into the generated header
    #[arg(long)]
    editable_source: Option<String>,

    /// Reject mapping tables that give one name two tokens
    #[arg(long)]
    strict: bool,

    /// Transform without writing, print a JSON report
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), AppError> {
    logger::init_logging();
    let cli = Cli::parse();

    execute(cli).map_err(|e| {
        error!("{}", e);
        e
    })
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let cfg = load_config(&ConfigOverrides {
        root: cli.root,
        input: cli.input,
        output: cli.output,
        mappings: cli.mappings,
        generator: cli.generator,
        editable_source: cli.editable_source,
        strict: cli.strict.then_some(true),
    })?;

    let table = match cfg.mappings_path() {
        Some(path) => ObfuscationTable::load(&path, cfg.duplicate_policy())?,
        None => ObfuscationTable::builtin_with(cfg.duplicate_policy())?,
    };
    info!(entries = table.len(), "mapping table loaded");

    let report = run(&cfg, &table, cli.dry_run)?;

    if cli.dry_run {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", json);
    } else {
        for line in report.report_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
