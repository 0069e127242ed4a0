//! Detail command - look up a single movie.

use anyhow::Result;
use cinefeed_core::DataState;
use cinefeed_paging::lookup;
use clap::Args;
use tracing::info;

use crate::commands::{build_catalog, exit_code_for};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the detail command.
#[derive(Args)]
pub struct DetailArgs {
    /// Movie id to look up.
    pub id: u64,
}

/// Runs the detail command.
pub async fn run(args: &DetailArgs, cli: &Cli) -> Result<()> {
    let catalog = build_catalog(cli)?;

    info!(id = args.id, "Fetching movie detail");

    match lookup(&catalog, args.id).await {
        DataState::Success(movie) => {
            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    println!("{}", formatter.format_movie(&movie));
                }
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format_movie_detail(&movie)?);
                }
            }
            Ok(())
        }
        DataState::Error(error) => {
            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    eprintln!("{}", formatter.format_error(&error));
                }
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    eprintln!("{}", formatter.format_error(&error));
                }
            }
            std::process::exit(exit_code_for(&error) as i32);
        }
        DataState::Loading => unreachable!("lookup never yields Loading"),
    }
}
