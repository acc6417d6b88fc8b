use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use kanban_activity::{resolve_lookback_days, ProjectSelection};
use kanban_github::{CollectionConfig, RetryPolicy};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "kanban-report",
    about = "Summarise recent GitHub project board activity as an HTML report",
    version
)]
pub struct Cli {
    #[arg(
        long = "github-repo",
        env = "GITHUB_REPOSITORY",
        help = "Repository whose project boards are reported, in owner/repo format"
    )]
    pub github_repo: String,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token used as a bearer credential for the GitHub REST API"
    )]
    pub github_token: String,

    #[arg(
        long = "github-api-base",
        env = "KANBAN_GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "Base URL of the GitHub REST API"
    )]
    pub github_api_base: String,

    #[arg(
        long,
        env = "KANBAN_DAYS",
        default_value = "7",
        help = "Lookback window in days; values that are not a non-negative integer fall back to 7"
    )]
    pub days: String,

    #[arg(
        long = "project-numbers",
        env = "KANBAN_PROJECT_NUMBERS",
        default_value = "all",
        help = "'all' or a comma-separated list of project numbers to include"
    )]
    pub project_numbers: String,

    #[arg(
        long = "removal-scan-days",
        env = "KANBAN_REMOVAL_SCAN_DAYS",
        default_value_t = 30,
        help = "Issues updated within this many days are scanned for project removals"
    )]
    pub removal_scan_days: u32,

    #[arg(
        long = "fetch-concurrency",
        env = "KANBAN_FETCH_CONCURRENCY",
        default_value_t = 8,
        value_parser = parse_positive_usize,
        help = "Maximum number of issues fetched concurrently"
    )]
    pub fetch_concurrency: usize,

    #[arg(
        long = "request-timeout-ms",
        env = "KANBAN_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Timeout for a single GitHub request in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "retry-max-attempts",
        env = "KANBAN_RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Attempts per GitHub request before giving up on 429/5xx or transport errors"
    )]
    pub retry_max_attempts: usize,

    #[arg(
        long = "retry-base-delay-ms",
        env = "KANBAN_RETRY_BASE_DELAY_MS",
        default_value_t = 500,
        help = "Base delay for exponential retry backoff in milliseconds"
    )]
    pub retry_base_delay_ms: u64,

    #[arg(
        long,
        env = "KANBAN_OUTPUT",
        default_value = "kanban/index.html",
        help = "Destination of the rendered HTML report; '-' writes to stdout"
    )]
    pub output: PathBuf,

    #[arg(
        long = "report-json",
        env = "KANBAN_REPORT_JSON",
        help = "Optional destination for the structured report as JSON"
    )]
    pub report_json: Option<PathBuf>,
}

impl Cli {
    pub fn lookback_days(&self) -> u32 {
        resolve_lookback_days(Some(&self.days))
    }

    pub fn project_selection(&self) -> ProjectSelection {
        ProjectSelection::parse(&self.project_numbers)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_max_attempts, self.retry_base_delay_ms)
    }

    pub fn collection_config(&self, now: DateTime<Utc>) -> CollectionConfig {
        CollectionConfig {
            now,
            lookback_days: self.lookback_days(),
            selection: self.project_selection(),
            removal_scan_days: self.removal_scan_days,
            fetch_concurrency: self.fetch_concurrency,
        }
    }
}
