//! MtxConv CLI - Command-line interface for MTX texture containers

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mtxconv", version)]
#[command(about = "MtxConv: convert MTX texture containers to and from PNG/JPEG/PVR", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Run every step but write no files
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the MtxConv CLI
///
/// # Errors
/// Returns an error if any input file failed.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    cli.command.execute(cli.dry_run)
}
