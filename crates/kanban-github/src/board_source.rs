use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubProject {
    pub id: u64,
    pub number: u64,
    pub name: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubColumn {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A project card; cards without `content_url` are free-form notes.
pub struct GithubCard {
    pub id: u64,
    #[serde(default)]
    pub content_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GithubIssueDetail {
    pub number: u64,
    pub html_url: String,
    pub title: String,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubComment {
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a repository's project boards.
///
/// Issue events come back as raw JSON so that malformed records surface as
/// classification errors instead of whole-request decode failures.
#[async_trait]
pub trait BoardSource: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<GithubProject>>;
    async fn list_columns(&self, project_id: u64) -> Result<Vec<GithubColumn>>;
    async fn list_cards(&self, column_id: u64) -> Result<Vec<GithubCard>>;
    async fn list_issue_events(&self, issue_number: u64) -> Result<Vec<Value>>;
    async fn get_issue(&self, issue_number: u64) -> Result<GithubIssueDetail>;
    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<GithubComment>>;
    /// Issues and pull requests updated at or after `since`.
    async fn list_issues_updated_since(&self, since: DateTime<Utc>)
        -> Result<Vec<GithubIssueDetail>>;
}
