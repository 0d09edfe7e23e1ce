//! Command-line interface definitions.
//!
//! Defines the CLI structure for reqeval using `clap`. The same binary runs
//! the HTTP service, evaluates single requirements from the shell, inspects
//! quota usage and drives the offline evaluation harness.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Requirement quality evaluation service
#[derive(Parser, Debug)]
#[command(name = "reqeval")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP evaluation service
    Serve,

    /// Evaluate one requirement through the full pipeline
    Evaluate(EvaluateArgs),

    /// Show today's quota usage for a caller
    Usage(UsageArgs),

    /// Score a labelled dataset and report agreement metrics
    Harness(HarnessArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `reqeval config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate the configuration, then print effective values.
    Check,
    /// Write a documented configuration template.
    Init(ConfigInitArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Requirement text to evaluate.
    pub text: String,

    /// Caller address charged against the daily quota.
    #[arg(long, default_value = "127.0.0.1")]
    pub client: String,
}

/// Arguments for the `usage` subcommand.
#[derive(Parser, Debug)]
pub struct UsageArgs {
    /// Caller key (usually an IP address).
    pub client: String,
}

/// Arguments for the `harness` subcommand.
///
/// Both paths fall back to the `EVAL_DATASET` and `EVAL_OUTPUT`
/// environment variables.
#[derive(Parser, Debug)]
pub struct HarnessArgs {
    /// Labelled dataset (JSON array of samples).
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Where to write the JSON report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub path: PathBuf,

    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
