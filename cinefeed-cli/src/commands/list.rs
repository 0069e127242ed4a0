//! List command - page through the movie catalog.

use std::sync::Arc;

use anyhow::Result;
use cinefeed_paging::{PagedCollection, PagedSnapshot};
use clap::Args;
use tracing::info;

use crate::commands::{build_catalog, exit_code_for};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Number of pages to accumulate.
    #[arg(long, default_value = "1")]
    pub pages: u32,

    /// List movies similar to this movie id instead of the root catalog.
    #[arg(long, value_name = "MOVIE_ID")]
    pub similar_to: Option<u64>,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            pages: 1,
            similar_to: None,
        }
    }
}

/// Runs the list command.
pub async fn run(args: &ListArgs, cli: &Cli) -> Result<()> {
    let catalog = Arc::new(build_catalog(cli)?);
    let collection = PagedCollection::new(catalog, args.similar_to);

    info!(pages = args.pages, anchor = ?args.similar_to, "Listing catalog");

    collection.load_initial().await;
    bail_on_edge_error(&collection.snapshot(), cli);

    let mut loaded = 1;
    while loaded < args.pages {
        if collection.snapshot().edges.append.end_reached() {
            info!(loaded, "Catalog exhausted");
            break;
        }
        collection.load_append().await;
        bail_on_edge_error(&collection.snapshot(), cli);
        loaded += 1;
    }

    let snapshot = collection.snapshot();
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_list(&snapshot.items));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_movies(&snapshot.items)?);
        }
    }

    Ok(())
}

/// Prints the first failed edge's classified error and exits.
fn bail_on_edge_error(snapshot: &PagedSnapshot, cli: &Cli) {
    let Some((_, error)) = snapshot.edges.first_error() else {
        return;
    };
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            eprintln!("{}", formatter.format_error(error));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            eprintln!("{}", formatter.format_error(error));
        }
    }
    std::process::exit(exit_code_for(error) as i32);
}
