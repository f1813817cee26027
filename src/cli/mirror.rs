//! Mirror command implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use super::CliError;
use crate::fetcher::HttpFetcher;
use crate::persister::FilePersister;
use crate::resource::config::{DEFAULT_TIMEOUT_SECS, MAX_RETRIES};
use crate::resource::{ResourceConfig, ResourceContext};

/// Mirror remote resources to local disk
#[derive(Debug, Parser)]
#[command(name = "blob-mirror", version, about)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Maximum number of HTTP retries before giving up
    #[arg(long, global = true, default_value_t = MAX_RETRIES)]
    pub max_retries: u32,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch a resource and persist it locally
    Mirror(MirrorArgs),
}

/// Arguments for the mirror command
#[derive(Debug, Args)]
pub struct MirrorArgs {
    /// Source URL to fetch
    pub url: String,

    /// Destination file; relative paths resolve under --base-dir
    pub destination: String,

    /// Base directory for relative destinations
    #[arg(long, default_value = "files")]
    pub base_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Print a machine-readable JSON summary on success
    #[arg(long)]
    pub json: bool,
}

/// Summary printed by `--json`.
#[derive(Debug, Serialize)]
struct MirrorSummary<'a> {
    url: &'a str,
    destination: &'a Path,
    bytes: usize,
    content_type: &'a str,
    state: String,
}

/// Resolve the destination argument against the base directory.
///
/// Absolute destinations are used as-is; relative ones land under the base
/// directory (default `files/`).
fn resolve_destination(base_dir: &Path, destination: &str) -> PathBuf {
    let dest = Path::new(destination);
    if dest.is_absolute() {
        dest.to_path_buf()
    } else {
        base_dir.join(dest)
    }
}

impl MirrorArgs {
    /// Execute the mirror command: load the resource, then save it.
    pub async fn execute(&self, max_retries: u32) -> Result<(), CliError> {
        if self.url.is_empty() {
            return Err(CliError::InvalidArgument("URL cannot be empty".to_string()));
        }
        if self.destination.is_empty() {
            return Err(CliError::InvalidArgument(
                "destination cannot be empty".to_string(),
            ));
        }

        let destination = resolve_destination(&self.base_dir, &self.destination);
        let config = ResourceConfig::new(&self.url, destination);
        config.validate().map_err(CliError::InvalidArgument)?;

        let fetcher =
            HttpFetcher::with_settings(Duration::from_secs(self.timeout_secs), max_retries)?;

        let context = ResourceContext::new(config, Arc::new(fetcher), Arc::new(FilePersister::new()));

        info!(url = %self.url, "loading resource");
        context.load().await?;

        info!(
            path = %context.config().destination_path().display(),
            "saving resource"
        );
        context.save().await?;

        let blob = context.blob();
        let (bytes, content_type) = blob
            .as_ref()
            .map(|b| (b.len(), b.content_type()))
            .unwrap_or((0, ""));

        info!(
            bytes = bytes,
            content_type = %content_type,
            state = %context.current_state(),
            "mirror completed"
        );

        if self.json {
            let summary = MirrorSummary {
                url: &self.url,
                destination: context.config().destination_path(),
                bytes,
                content_type,
                state: context.current_state().to_string(),
            };
            let rendered = serde_json::to_string_pretty(&summary)
                .map_err(|e| CliError::InvalidArgument(format!("summary render failed: {e}")))?;
            println!("{rendered}");
        }

        Ok(())
    }
}
