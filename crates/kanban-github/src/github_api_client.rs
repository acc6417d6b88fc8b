use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::board_source::{
    BoardSource, GithubCard, GithubColumn, GithubComment, GithubIssueDetail, GithubProject,
};
use crate::github_retry_policy::RetryPolicy;

const GITHUB_PAGE_SIZE: &str = "100";
const GITHUB_PROJECTS_MEDIA_TYPE: &str = "application/vnd.github.inertia-preview+json";
const ERROR_BODY_MAX_CHARS: usize = 800;

/// First `max_chars` characters of an error body, marked when cut.
fn error_excerpt(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid github repository '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid github repository '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Clone)]
/// REST client for the classic projects API of one repository.
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
    retry: RetryPolicy,
}

impl GithubApiClient {
    pub fn new(
        api_base: &str,
        token: &str,
        repo: RepoRef,
        request_timeout_ms: u64,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("kanban-activity-report"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(GITHUB_PROJECTS_MEDIA_TYPE),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http: client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo,
            retry,
        })
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.repo.owner, self.repo.name, suffix
        )
    }

    async fn get_json<T>(&self, operation: &str, url: String, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            tracing::debug!(operation, %url, attempt, "github request");
            let response = self.http.get(&url).query(query).send().await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<T>()
                            .await
                            .with_context(|| format!("failed to decode github {operation}"));
                    }

                    let retry_after = self.retry.retry_after_hint(response.headers(), Utc::now());
                    let body = response.text().await.unwrap_or_default();
                    if self.retry.retries_status(attempt, status) {
                        let delay = self.retry.delay_for(attempt, retry_after);
                        tracing::debug!(
                            operation,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis() as u64,
                            "retrying github request"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    bail!(
                        "github api {operation} failed with status {}: {}",
                        status.as_u16(),
                        error_excerpt(&body, ERROR_BODY_MAX_CHARS)
                    );
                }
                Err(error) => {
                    if self.retry.retries_transport_error(attempt, &error) {
                        tokio::time::sleep(self.retry.delay_for(attempt, None)).await;
                        continue;
                    }
                    return Err(error)
                        .with_context(|| format!("github api {operation} request failed"));
                }
            }
        }
    }
}

#[async_trait]
impl BoardSource for GithubApiClient {
    async fn list_projects(&self) -> Result<Vec<GithubProject>> {
        self.get_json(
            "list projects",
            self.repo_url("projects"),
            &[("per_page", GITHUB_PAGE_SIZE)],
        )
        .await
    }

    async fn list_columns(&self, project_id: u64) -> Result<Vec<GithubColumn>> {
        self.get_json(
            "list project columns",
            format!("{}/projects/{project_id}/columns", self.api_base),
            &[("per_page", GITHUB_PAGE_SIZE)],
        )
        .await
    }

    async fn list_cards(&self, column_id: u64) -> Result<Vec<GithubCard>> {
        self.get_json(
            "list column cards",
            format!("{}/projects/columns/{column_id}/cards", self.api_base),
            &[("per_page", GITHUB_PAGE_SIZE)],
        )
        .await
    }

    async fn list_issue_events(&self, issue_number: u64) -> Result<Vec<Value>> {
        self.get_json(
            "list issue events",
            self.repo_url(&format!("issues/{issue_number}/events")),
            &[("per_page", GITHUB_PAGE_SIZE)],
        )
        .await
    }

    async fn get_issue(&self, issue_number: u64) -> Result<GithubIssueDetail> {
        self.get_json(
            "get issue",
            self.repo_url(&format!("issues/{issue_number}")),
            &[],
        )
        .await
    }

    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<GithubComment>> {
        self.get_json(
            "list issue comments",
            self.repo_url(&format!("issues/{issue_number}/comments")),
            &[("per_page", GITHUB_PAGE_SIZE)],
        )
        .await
    }

    async fn list_issues_updated_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<GithubIssueDetail>> {
        let since_value = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.get_json(
            "list updated issues",
            self.repo_url("issues"),
            &[
                ("state", "all"),
                ("since", since_value.as_str()),
                ("per_page", GITHUB_PAGE_SIZE),
            ],
        )
        .await
    }
}
