//! Event classification and aggregation engine for kanban activity reports.
//!
//! Everything in this crate is pure: callers hand in already-fetched project
//! events, issue snapshots and comment timestamps, and get back classified
//! columns, removal lists and a rendered HTML document. No I/O happens here.

pub mod comment_activity;
pub mod event_window;
pub mod issue_classifier;
pub mod issue_flow;
pub mod project_event;
pub mod removal_tracker;
pub mod report_assembly;
pub mod report_render;

pub use comment_activity::{summarize_comment_activity, CommentActivity};
pub use event_window::{
    filter_events_in_window, is_within_event_window, resolve_lookback_days,
    sort_events_chronologically, DEFAULT_LOOKBACK_DAYS,
};
pub use issue_classifier::{
    classify_issue_events, classify_issue_window, group_for_events, ActivityGroup,
    Classification, ACTIVITY_GROUP_COUNT,
};
pub use issue_flow::summarize_flow;
pub use project_event::{ClassificationError, EventKind, ProjectEvent};
pub use removal_tracker::{permanently_removed_issue_numbers, track_removals};
pub use report_assembly::{
    assemble_report, sort_issues_by_group, ClassifiedIssue, Column, ColumnBoard, IssueSnapshot,
    Project, ProjectBoard, ProjectSelection, Report,
};
pub use report_render::render_html_report;
