//! CLI commands.

pub mod detail;
pub mod list;

use anyhow::Result;
use cinefeed_core::{ClassifiedError, ErrorKind};
use cinefeed_fetch::{TmdbClient, TmdbConfig};

use crate::{Cli, ExitCode};

/// Builds the TMDB catalog client from CLI flags and environment.
pub fn build_catalog(cli: &Cli) -> Result<TmdbClient> {
    let api_key = resolve_api_key(cli)?;
    let config = TmdbConfig::new(api_key).with_language(cli.language.clone());
    TmdbClient::new(config).map_err(|e| anyhow::anyhow!("failed to create client: {e}"))
}

/// Resolves the API key from `--api-key` or `TMDB_API_KEY`.
fn resolve_api_key(cli: &Cli) -> Result<String> {
    if let Some(key) = &cli.api_key {
        return Ok(key.clone());
    }
    std::env::var("TMDB_API_KEY")
        .map_err(|_| anyhow::anyhow!("API key required: pass --api-key or set TMDB_API_KEY"))
}

/// Maps a classified failure to the process exit code.
pub fn exit_code_for(error: &ClassifiedError) -> ExitCode {
    match error.kind {
        ErrorKind::NoConnection | ErrorKind::Network => ExitCode::Network,
        ErrorKind::Timeout => ExitCode::Timeout,
        _ => ExitCode::Error,
    }
}
