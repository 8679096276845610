mod commands;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Commands;

#[derive(Parser)]
#[command(name = "ugit", about = "A minimal content-addressable version control system")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Run as if started in <path>
    #[arg(short = 'C', global = true)]
    directory: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("UGIT_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("fatal: cannot change to '{}': {e}", dir.display());
            process::exit(1);
        }
    }

    match commands::run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(1);
        }
    }
}
