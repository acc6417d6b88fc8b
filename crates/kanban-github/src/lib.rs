//! GitHub collaborator for the kanban activity report.
//!
//! Fetches classic project boards, issue timelines and comments over the REST
//! API and feeds them through the `kanban-activity` engine. Per-issue work fans
//! out with bounded concurrency; one failing issue never sinks the report.

pub mod board_collection;
pub mod board_source;
pub mod github_api_client;
pub mod github_retry_policy;

pub use board_collection::{
    build_report, collect_membership_history, collect_project_boards, issue_number_from_content_url,
    CollectionConfig, MembershipHistory,
};
pub use board_source::{
    BoardSource, GithubCard, GithubColumn, GithubComment, GithubIssueDetail, GithubProject,
};
pub use github_api_client::{GithubApiClient, RepoRef};
pub use github_retry_policy::RetryPolicy;
