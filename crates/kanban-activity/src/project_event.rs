use chrono::{DateTime, Utc};
use kanban_core::parse_rfc3339_utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error returned when an upstream event record cannot be turned into a [`ProjectEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("issue #{issue_number}: event record must be a JSON object, found {found}")]
    NotAnObject {
        issue_number: u64,
        found: &'static str,
    },
    #[error("issue #{issue_number}: event record is missing string field '{field}'")]
    MissingField {
        issue_number: u64,
        field: &'static str,
    },
    #[error("issue #{issue_number}: event record has invalid created_at '{raw}'")]
    InvalidTimestamp { issue_number: u64, raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Issue timeline event names the classifier understands; anything else is carried verbatim.
pub enum EventKind {
    MovedColumnsInProject,
    AddedToProject,
    ConvertedNoteToIssue,
    Reopened,
    Closed,
    RemovedFromProject,
    Other(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "moved_columns_in_project" => Self::MovedColumnsInProject,
            "added_to_project" => Self::AddedToProject,
            "converted_note_to_issue" => Self::ConvertedNoteToIssue,
            "reopened" => Self::Reopened,
            "closed" => Self::Closed,
            "removed_from_project" => Self::RemovedFromProject,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::MovedColumnsInProject => "moved_columns_in_project",
            Self::AddedToProject => "added_to_project",
            Self::ConvertedNoteToIssue => "converted_note_to_issue",
            Self::Reopened => "reopened",
            Self::Closed => "closed",
            Self::RemovedFromProject => "removed_from_project",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Returns true for the two events that change project membership.
    pub fn is_membership_change(&self) -> bool {
        matches!(self, Self::AddedToProject | Self::RemovedFromProject)
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One timeline event of one issue, optionally tied to a project card.
pub struct ProjectEvent {
    pub issue_number: u64,
    pub event: EventKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub previous_column_name: Option<String>,
}

impl ProjectEvent {
    pub fn new(issue_number: u64, event: EventKind, created_at: DateTime<Utc>) -> Self {
        Self {
            issue_number,
            event,
            created_at,
            project_id: None,
            column_name: None,
            previous_column_name: None,
        }
    }

    pub fn with_project(mut self, project_id: u64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_column(mut self, column_name: &str) -> Self {
        self.column_name = Some(column_name.to_string());
        self
    }

    pub fn with_previous_column(mut self, previous_column_name: &str) -> Self {
        self.previous_column_name = Some(previous_column_name.to_string());
        self
    }

    /// Builds an event from one entry of the GitHub issue-events payload.
    ///
    /// Non-object records and records without a kind or timestamp are rejected
    /// rather than skipped so a schema change upstream is noticed immediately.
    pub fn from_github_value(issue_number: u64, raw: &Value) -> Result<Self, ClassificationError> {
        let Some(record) = raw.as_object() else {
            return Err(ClassificationError::NotAnObject {
                issue_number,
                found: json_type_name(raw),
            });
        };
        let event = record
            .get("event")
            .and_then(Value::as_str)
            .ok_or(ClassificationError::MissingField {
                issue_number,
                field: "event",
            })?;
        let created_at_raw = record
            .get("created_at")
            .and_then(Value::as_str)
            .ok_or(ClassificationError::MissingField {
                issue_number,
                field: "created_at",
            })?;
        let created_at = parse_rfc3339_utc(created_at_raw).ok_or_else(|| {
            ClassificationError::InvalidTimestamp {
                issue_number,
                raw: created_at_raw.to_string(),
            }
        })?;

        let card = record.get("project_card").and_then(Value::as_object);
        let card_text = |field: &str| {
            card.and_then(|card| card.get(field))
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        };
        Ok(Self {
            issue_number,
            event: EventKind::parse(event),
            created_at,
            project_id: card
                .and_then(|card| card.get("project_id"))
                .and_then(Value::as_u64),
            column_name: card_text("column_name"),
            previous_column_name: card_text("previous_column_name"),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
