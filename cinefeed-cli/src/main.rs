// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! CineFeed CLI - browse a remote movie catalog from the command line.
//!
//! # Examples
//!
//! ```bash
//! # First page of the catalog
//! cinefeed list
//!
//! # Accumulate three pages
//! cinefeed list --pages 3
//!
//! # Movies similar to a given movie
//! cinefeed list --similar-to 550
//!
//! # Single movie detail
//! cinefeed detail 550
//!
//! # JSON output
//! cinefeed list --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{detail, list};

// ============================================================================
// CLI Definition
// ============================================================================

/// CineFeed CLI - movie catalog browsing.
#[derive(Parser)]
#[command(name = "cinefeed")]
#[command(about = "Movie catalog browsing CLI")]
#[command(long_about = r#"
CineFeed pages through a remote movie catalog and looks up movie details.

The API key is read from --api-key or the TMDB_API_KEY environment
variable.

Examples:
  cinefeed list                  # First catalog page
  cinefeed list --pages 3        # Accumulate three pages
  cinefeed list --similar-to 550 # Movies similar to movie 550
  cinefeed detail 550            # Single movie detail
  cinefeed list --format json    # JSON output
"#)]
#[command(version)]
#[command(author = "CineFeed Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'list' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// API key. Falls back to the TMDB_API_KEY environment variable.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Response language.
    #[arg(long, default_value = "en-US", global = true)]
    pub language: String,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Page through the movie catalog (default if no command specified).
    #[command(visible_alias = "l")]
    List(list::ListArgs),

    /// Look up a single movie by id.
    #[command(visible_alias = "d")]
    Detail(detail::DetailArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Connectivity failure.
    Network = 2,
    /// Timeout.
    Timeout = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("cinefeed=debug,info")
    } else {
        EnvFilter::new("cinefeed=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::List(args)) => list::run(args, &cli).await,
        Some(Commands::Detail(args)) => detail::run(args, &cli).await,
        None => {
            // Default to the list command
            list::run(&list::ListArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {}", e);
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
