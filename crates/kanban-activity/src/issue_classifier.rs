use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_window::{filter_events_in_window, sort_events_chronologically};
use crate::issue_flow::summarize_flow;
use crate::project_event::{EventKind, ProjectEvent};

/// Number of activity groups, including the removal group reported outside columns.
pub const ACTIVITY_GROUP_COUNT: usize = 6;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Ordinal activity category; higher ordinals are more significant changes.
pub enum ActivityGroup {
    #[default]
    NoChange,
    MovedHere,
    Added,
    Reopened,
    Closed,
    Removed,
}

impl ActivityGroup {
    pub const ALL: [Self; ACTIVITY_GROUP_COUNT] = [
        Self::NoChange,
        Self::MovedHere,
        Self::Added,
        Self::Reopened,
        Self::Closed,
        Self::Removed,
    ];

    /// Ordinal used in the rendered `group{N}` / `grouping{N}` class names.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoChange => "No change",
            Self::MovedHere => "Moved here",
            Self::Added => "Added",
            Self::Reopened => "Reopened",
            Self::Closed => "Closed",
            Self::Removed => "Removed",
        }
    }

    /// Applies one event to the running group.
    ///
    /// A move only registers while nothing else has; the other kinds take over
    /// whenever they occur.
    fn absorb(self, event: &EventKind) -> Self {
        match event {
            EventKind::MovedColumnsInProject if self == Self::NoChange => Self::MovedHere,
            EventKind::AddedToProject | EventKind::ConvertedNoteToIssue => Self::Added,
            EventKind::Reopened => Self::Reopened,
            EventKind::Closed => Self::Closed,
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Per-run verdict for one issue.
pub struct Classification {
    pub group: ActivityGroup,
    pub flow: String,
    pub contributing_events: Vec<ProjectEvent>,
}

/// Folds chronologically ordered events into a single group.
pub fn group_for_events(events: &[ProjectEvent]) -> ActivityGroup {
    events
        .iter()
        .fold(ActivityGroup::NoChange, |group, event| {
            group.absorb(&event.event)
        })
}

/// Classifies an issue from its already-windowed events.
pub fn classify_issue_events(filtered_events: &[ProjectEvent]) -> Classification {
    let mut contributing_events = filtered_events.to_vec();
    sort_events_chronologically(&mut contributing_events);
    Classification {
        group: group_for_events(&contributing_events),
        flow: summarize_flow(&contributing_events),
        contributing_events,
    }
}

/// Windows the full event history of an issue and classifies what remains.
pub fn classify_issue_window(
    events: &[ProjectEvent],
    now: DateTime<Utc>,
    lookback_days: u32,
) -> Classification {
    classify_issue_events(&filter_events_in_window(events, now, lookback_days))
}
