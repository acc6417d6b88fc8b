use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use futures_util::stream::{self, StreamExt};
use kanban_activity::{
    assemble_report, classify_issue_window, sort_events_chronologically,
    summarize_comment_activity, track_removals, ClassificationError, ClassifiedIssue, ColumnBoard,
    IssueSnapshot, ProjectBoard, ProjectEvent, ProjectSelection, Report,
};

use crate::board_source::{BoardSource, GithubCard, GithubProject};

#[derive(Debug, Clone)]
/// Inputs shared by every fetch-and-classify step of one run.
pub struct CollectionConfig {
    pub now: DateTime<Utc>,
    pub lookback_days: u32,
    pub selection: ProjectSelection,
    pub removal_scan_days: u32,
    pub fetch_concurrency: usize,
}

impl CollectionConfig {
    fn concurrency(&self) -> usize {
        self.fetch_concurrency.max(1)
    }
}

#[derive(Debug, Clone, Default)]
/// Project-membership events of recently updated issues, plus what is needed to render them.
pub struct MembershipHistory {
    pub events: Vec<ProjectEvent>,
    pub issues: HashMap<u64, IssueSnapshot>,
}

/// Extracts the issue number from a card's `content_url` (its last path segment).
pub fn issue_number_from_content_url(content_url: &str) -> Option<u64> {
    content_url
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u64>().ok())
}

fn parse_issue_events(
    issue_number: u64,
    raw_events: &[serde_json::Value],
) -> Result<Vec<ProjectEvent>, ClassificationError> {
    raw_events
        .iter()
        .map(|raw| ProjectEvent::from_github_value(issue_number, raw))
        .collect()
}

/// Gathers add/remove history for issues and pull requests updated within
/// `removal_scan_days`; a window reaching past the calendar scans everything.
///
/// Events are kept per issue in chronological order. An issue whose timeline
/// cannot be fetched or parsed is skipped with a warning.
pub async fn collect_membership_history(
    source: &dyn BoardSource,
    config: &CollectionConfig,
) -> Result<MembershipHistory> {
    let since = config
        .now
        .checked_sub_signed(Duration::days(i64::from(config.removal_scan_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let issues = source.list_issues_updated_since(since).await?;
    tracing::info!(issues = issues.len(), "scanning membership history");

    let timelines = stream::iter(issues)
        .map(|issue| async move {
            let events = source
                .list_issue_events(issue.number)
                .await
                .and_then(|raw| {
                    parse_issue_events(issue.number, &raw).map_err(anyhow::Error::from)
                });
            (issue, events)
        })
        .buffered(config.concurrency())
        .collect::<Vec<_>>()
        .await;

    let mut history = MembershipHistory::default();
    for (issue, events) in timelines {
        let mut events = match events {
            Ok(events) => events,
            Err(error) => {
                tracing::warn!(
                    issue_number = issue.number,
                    error = %format!("{error:#}"),
                    "skipping membership history for issue"
                );
                continue;
            }
        };
        events.retain(|event| event.event.is_membership_change());
        sort_events_chronologically(&mut events);
        history.events.extend(events);
        history.issues.insert(
            issue.number,
            IssueSnapshot::new(issue.number, &issue.html_url, &issue.title),
        );
    }
    Ok(history)
}

async fn collect_card_issue(
    source: &dyn BoardSource,
    card: &GithubCard,
    config: &CollectionConfig,
) -> Result<Option<ClassifiedIssue>> {
    let Some(content_url) = card.content_url.as_deref() else {
        tracing::info!(card_id = card.id, "ignoring note card");
        return Ok(None);
    };
    let issue_number = issue_number_from_content_url(content_url)
        .ok_or_else(|| anyhow!("card {} has unrecognised content_url '{content_url}'", card.id))?;

    let (raw_events, issue, comments) = tokio::try_join!(
        source.list_issue_events(issue_number),
        source.get_issue(issue_number),
        source.list_issue_comments(issue_number),
    )?;
    let events = parse_issue_events(issue_number, &raw_events)?;
    let classification = classify_issue_window(&events, config.now, config.lookback_days);
    let activity = summarize_comment_activity(
        comments.iter().map(|comment| comment.created_at),
        config.now,
        config.lookback_days,
    );
    let snapshot = IssueSnapshot::new(issue_number, &issue.html_url, &issue.title)
        .with_comment_activity(activity);
    Ok(Some(ClassifiedIssue::new(snapshot, classification)))
}

async fn collect_column_issues(
    source: &dyn BoardSource,
    cards: Vec<GithubCard>,
    config: &CollectionConfig,
) -> Vec<ClassifiedIssue> {
    let outcomes = stream::iter(cards)
        .map(|card| async move {
            let outcome = collect_card_issue(source, &card, config).await;
            (card, outcome)
        })
        .buffered(config.concurrency())
        .collect::<Vec<_>>()
        .await;

    outcomes
        .into_iter()
        .filter_map(|(card, outcome)| match outcome {
            Ok(issue) => issue,
            Err(error) => {
                tracing::warn!(
                    card_id = card.id,
                    error = %format!("{error:#}"),
                    "excluding issue from column"
                );
                None
            }
        })
        .collect()
}

async fn collect_project_board(
    source: &dyn BoardSource,
    project: GithubProject,
    history: &MembershipHistory,
    config: &CollectionConfig,
) -> Result<ProjectBoard> {
    let columns = source.list_columns(project.id).await?;
    let mut column_boards = Vec::with_capacity(columns.len());
    for column in columns {
        let cards = source.list_cards(column.id).await?;
        tracing::info!(
            project = %project.name,
            column = %column.name,
            cards = cards.len(),
            "classifying column"
        );
        column_boards.push(ColumnBoard {
            name: column.name,
            issues: collect_column_issues(source, cards, config).await,
        });
    }
    Ok(ProjectBoard {
        number: project.number,
        removed_issues: track_removals(&history.events, project.id, &history.issues),
        name: project.name,
        url: project.html_url,
        columns: column_boards,
    })
}

/// Fetches and classifies every selected project board.
pub async fn collect_project_boards(
    source: &dyn BoardSource,
    history: &MembershipHistory,
    config: &CollectionConfig,
) -> Result<Vec<ProjectBoard>> {
    let projects = source.list_projects().await?;
    let mut boards = Vec::new();
    for project in projects {
        if !config.selection.includes(project.number) {
            continue;
        }
        boards.push(collect_project_board(source, project, history, config).await?);
    }
    Ok(boards)
}

/// Runs the whole fetch, classify and assemble pipeline against `source`.
pub async fn build_report(source: &dyn BoardSource, config: &CollectionConfig) -> Result<Report> {
    let history = collect_membership_history(source, config).await?;
    let boards = collect_project_boards(source, &history, config).await?;
    Ok(assemble_report(
        boards,
        &config.selection,
        config.lookback_days,
        config.now,
    ))
}
