use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapgrid")]
#[command(author, version, about = "Cached image gallery backed by a media host")]
pub struct Cli {
    /// Path to config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server with the gallery API
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch the gallery from the media host once, bypassing the cache
    Fetch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the cached gallery from the configured cache store
    ClearCache,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
