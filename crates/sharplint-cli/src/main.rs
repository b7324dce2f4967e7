//! sharplint CLI tool.
//!
//! Usage:
//! ```bash
//! sharplint check [OPTIONS] [PATH]
//! sharplint fix [OPTIONS] [PATH]
//! sharplint list-rules
//! sharplint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Rule-based analyzer and fixer for C# sources
#[derive(Parser)]
#[command(name = "sharplint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SHARPLINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Apply code fixes in place
    Fix {
        /// Path to fix (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Only fix diagnostics of specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Give up on a single rename after this many seconds
        #[arg(long, value_name = "SECS")]
        rename_timeout: Option<u64>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::check::run(&path, format, rules.as_deref(), exclude, &source)
        }
        Commands::Fix {
            path,
            rules,
            exclude,
            dry_run,
            rename_timeout,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::fix::FixOptions {
                rules,
                exclude,
                dry_run,
                rename_timeout: rename_timeout.map(std::time::Duration::from_secs),
            };
            commands::fix::run(&path, &options, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
