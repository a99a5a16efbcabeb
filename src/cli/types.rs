//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::search::SearchArgs;
use super::commands::serve::ServeArgs;
use super::commands::top_pairs::TopPairsArgs;

#[derive(Parser, Debug)]
#[command(name = "rickmorty-api")]
#[command(about = "Search and co-occurrence reports over the Rick and Morty API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file used in place of rickmorty.yaml
    #[arg(short, long, global = true, env = "RICKMORTY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Search characters, locations and episodes by name
    Search(SearchArgs),

    /// Show the character pairs that share the most episodes
    TopPairs(TopPairsArgs),
}
