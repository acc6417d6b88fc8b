//! Command-line entry point for the kanban activity report.
//!
//! Parses configuration from flags and environment, runs the GitHub collection
//! pipeline and writes the rendered report.

pub mod bootstrap_helpers;
pub mod cli_args;
pub mod report_output;

use anyhow::{Context, Result};
use chrono::Utc;
use kanban_activity::Report;
use kanban_github::{build_report, GithubApiClient, RepoRef};

pub use bootstrap_helpers::init_tracing;
pub use cli_args::Cli;
pub use report_output::write_report_outputs;

/// Fetches, classifies and assembles the report described by `cli`.
pub async fn run_report(cli: &Cli) -> Result<Report> {
    let repo = RepoRef::parse(&cli.github_repo)?;
    let client = GithubApiClient::new(
        &cli.github_api_base,
        &cli.github_token,
        repo,
        cli.request_timeout_ms,
        cli.retry_policy(),
    )?;
    let config = cli.collection_config(Utc::now());
    tracing::info!(
        repo = %client.repo().as_slug(),
        lookback_days = config.lookback_days,
        "building kanban activity report"
    );
    build_report(&client, &config)
        .await
        .with_context(|| format!("failed to build report for {}", client.repo().as_slug()))
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    let report = run_report(&cli).await?;
    let mut stdout = std::io::stdout().lock();
    write_report_outputs(
        &report,
        &cli.output,
        cli.report_json.as_deref(),
        &mut stdout,
    )
}
