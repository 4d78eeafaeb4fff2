use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Diagnostics and keyboard simulator for the redaction service
#[derive(Parser, Debug)]
#[command(name = "redact-keyboard", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ~/.config/redact-keyboard/config.toml)
    #[arg(short, long, env = "REDACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the redaction service, overrides config and environment
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "REDACT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Redact TEXT once using the blocking client and print the result
    Redact {
        /// Text to redact; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Send a canned sample to the service and report latency
    Check,

    /// Simulate a keyboard session driven by stdin
    Session,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Print the config file path
    Path,
}
