//! CLI module for docqa
//!
//! Provides command-line interface parsing and handling for the docqa-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docqa - Document question answering server
///
/// Upload a document, then ask questions about it. Answers are generated by a
/// local Ollama model from the passages most similar to the question.
#[derive(Parser, Debug)]
#[command(
    name = "docqa-server",
    version,
    about = "docqa - Document question answering over uploaded files",
    long_about = "Upload PDF, Word, Excel, CSV or text files and ask questions about them.\n\
                  Answers come from a local Ollama model using retrieval-augmented generation.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  docqa-server init               # Write a default docqa.toml\n    \
                  docqa-server                    # Start the server\n    \
                  docqa-server --json             # Start with JSON logs\n    \
                  docqa-server config --validate  # Check the effective configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "docqa.toml", global = true)]
    pub config: PathBuf,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Write a default docqa.toml and create the uploads directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing docqa.toml
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "5000")]
        port: u16,
    },

    /// Show the effective configuration
    Config {
        /// Only validate the configuration, printing a single success line
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
