//! Command-line interface
//!
//! `serve` runs the HTTP server; `search` and `top-pairs` run a single query
//! against the live API and print a table, or JSON with `--json`.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;

/// Load configuration, initialise logging and dispatch the subcommand
pub async fn run(cli: Cli) -> Result<()> {
    let config: Config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    LoggerImpl::init(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Search(args) => commands::search::execute(args, &config, cli.json).await,
        Commands::TopPairs(args) => commands::top_pairs::execute(args, &config, cli.json).await,
    }
}

/// Print `err` to stderr and exit with a failure status
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
