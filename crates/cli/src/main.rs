//! BrewDesk CLI - Catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the default three-product catalog into the data directory
//! brewdesk seed
//!
//! # Overwrite an existing catalog
//! brewdesk seed --force
//!
//! # Export the catalog to a file (or stdout)
//! brewdesk export --out backup.json
//!
//! # Validate and import a catalog file
//! brewdesk import backup.json
//! ```
//!
//! The data directory defaults to `data` and can be overridden with
//! `--data-dir` or `BREWDESK_DATA_DIR`, matching the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "brewdesk")]
#[command(author, version, about = "BrewDesk catalog tools")]
struct Cli {
    /// Data directory shared with the server
    #[arg(long, env = "BREWDESK_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default catalog into the data directory
    Seed {
        /// Overwrite an existing catalog file
        #[arg(long)]
        force: bool,
    },
    /// Export the catalog as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Validate a catalog file and install it as the catalog
    Import {
        /// File holding a JSON array of products
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env before parsing so the BREWDESK_DATA_DIR fallback sees it.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Seed { force } => commands::seed::run(&data_dir, force).await,
        Commands::Export { out } => commands::export::run(&data_dir, out.as_deref()).await,
        Commands::Import { file } => commands::import::run(&data_dir, &file).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_flag_overrides_the_default() {
        let cli = Cli::try_parse_from(["brewdesk", "--data-dir", "/tmp/catalog", "seed"])
            .expect("parse");
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/catalog"));
        assert!(matches!(cli.command, Commands::Seed { force: false }));
    }
}
