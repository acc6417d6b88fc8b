use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comment_activity::CommentActivity;
use crate::issue_classifier::{ActivityGroup, Classification};
use crate::report_render::render_html_report;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Point-in-time facts about an issue, independent of classification.
pub struct IssueSnapshot {
    pub issue_number: u64,
    pub html_url: String,
    pub title: String,
    #[serde(default)]
    pub total_comments: usize,
    #[serde(default)]
    pub period_comments: usize,
}

impl IssueSnapshot {
    pub fn new(issue_number: u64, html_url: &str, title: &str) -> Self {
        Self {
            issue_number,
            html_url: html_url.to_string(),
            title: title.to_string(),
            total_comments: 0,
            period_comments: 0,
        }
    }

    pub fn with_comment_activity(mut self, activity: CommentActivity) -> Self {
        self.total_comments = activity.total_comments;
        self.period_comments = activity.period_comments;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIssue {
    #[serde(flatten)]
    pub snapshot: IssueSnapshot,
    #[serde(flatten)]
    pub classification: Classification,
}

impl ClassifiedIssue {
    pub fn new(snapshot: IssueSnapshot, classification: Classification) -> Self {
        Self {
            snapshot,
            classification,
        }
    }

    pub fn group(&self) -> ActivityGroup {
        self.classification.group
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub issues: Vec<ClassifiedIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub number: u64,
    pub name: String,
    pub url: String,
    pub columns: Vec<Column>,
    pub removed_issues: Vec<IssueSnapshot>,
    pub lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub projects: Vec<Project>,
}

impl Report {
    pub fn render_html(&self) -> String {
        render_html_report(&self.projects, self.generated_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Which projects make it into the report.
pub enum ProjectSelection {
    #[default]
    All,
    Numbers(Vec<u64>),
}

impl ProjectSelection {
    /// Parses `all` or a comma-separated list of project numbers.
    ///
    /// Unparsable entries are dropped; a list with nothing usable selects every project.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        let numbers = trimmed
            .split(',')
            .filter_map(|entry| entry.trim().parse::<u64>().ok())
            .collect::<Vec<_>>();
        if numbers.is_empty() {
            Self::All
        } else {
            Self::Numbers(numbers)
        }
    }

    pub fn includes(&self, project_number: u64) -> bool {
        match self {
            Self::All => true,
            Self::Numbers(numbers) => numbers.contains(&project_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Classified issues of one column, in fetch order.
pub struct ColumnBoard {
    pub name: String,
    pub issues: Vec<ClassifiedIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Everything collected for one project before assembly.
pub struct ProjectBoard {
    pub number: u64,
    pub name: String,
    pub url: String,
    pub columns: Vec<ColumnBoard>,
    pub removed_issues: Vec<IssueSnapshot>,
}

/// Stable sort by group ordinal; equal groups keep their fetch order.
pub fn sort_issues_by_group(issues: &mut [ClassifiedIssue]) {
    issues.sort_by_key(ClassifiedIssue::group);
}

/// Folds collected boards into the final report.
pub fn assemble_report(
    boards: Vec<ProjectBoard>,
    selection: &ProjectSelection,
    lookback_days: u32,
    generated_at: DateTime<Utc>,
) -> Report {
    let projects = boards
        .into_iter()
        .filter(|board| selection.includes(board.number))
        .map(|board| assemble_project(board, lookback_days))
        .collect();
    Report {
        generated_at,
        projects,
    }
}

fn assemble_project(board: ProjectBoard, lookback_days: u32) -> Project {
    let columns = board
        .columns
        .into_iter()
        .map(|column| {
            let mut issues = column.issues;
            sort_issues_by_group(&mut issues);
            Column {
                name: column.name,
                issues,
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let removed_issues = board
        .removed_issues
        .into_iter()
        .filter(|issue| seen.insert(issue.issue_number))
        .collect();

    Project {
        number: board.number,
        name: board.name,
        url: board.url,
        columns,
        removed_issues,
        lookback_days,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{
        assemble_report, sort_issues_by_group, ClassifiedIssue, ColumnBoard, IssueSnapshot,
        ProjectBoard, ProjectSelection,
    };
    use crate::issue_classifier::{ActivityGroup, Classification};

    fn issue(issue_number: u64, group: ActivityGroup) -> ClassifiedIssue {
        ClassifiedIssue::new(
            IssueSnapshot::new(
                issue_number,
                &format!("https://github.com/o/r/issues/{issue_number}"),
                &format!("Issue {issue_number}"),
            ),
            Classification {
                group,
                ..Classification::default()
            },
        )
    }

    fn board(number: u64, columns: Vec<ColumnBoard>) -> ProjectBoard {
        ProjectBoard {
            number,
            name: format!("Project {number}"),
            url: format!("https://github.com/o/r/projects/{number}"),
            columns,
            removed_issues: Vec::new(),
        }
    }

    #[test]
    fn unit_project_selection_parses_all_lists_and_garbage() {
        assert_eq!(ProjectSelection::parse("all"), ProjectSelection::All);
        assert_eq!(ProjectSelection::parse(" ALL "), ProjectSelection::All);
        assert_eq!(ProjectSelection::parse(""), ProjectSelection::All);
        assert_eq!(ProjectSelection::parse("x, y"), ProjectSelection::All);
        assert_eq!(
            ProjectSelection::parse("1, 3,nope,4"),
            ProjectSelection::Numbers(vec![1, 3, 4])
        );
        assert!(ProjectSelection::parse("2").includes(2));
        assert!(!ProjectSelection::parse("2").includes(5));
    }

    #[test]
    fn functional_sort_issues_by_group_is_stable() {
        let mut issues = vec![
            issue(10, ActivityGroup::Added),
            issue(11, ActivityGroup::NoChange),
            issue(12, ActivityGroup::MovedHere),
            issue(13, ActivityGroup::NoChange),
        ];
        sort_issues_by_group(&mut issues);
        let order = issues
            .iter()
            .map(|issue| (issue.group().ordinal(), issue.snapshot.issue_number))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![(0, 11), (0, 13), (1, 12), (2, 10)]);
    }

    #[test]
    fn integration_assemble_report_filters_projects_and_sorts_columns() {
        let generated_at = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let boards = vec![
            board(
                1,
                vec![ColumnBoard {
                    name: "Done".to_string(),
                    issues: vec![
                        issue(5, ActivityGroup::Closed),
                        issue(6, ActivityGroup::NoChange),
                    ],
                }],
            ),
            board(2, Vec::new()),
            board(3, Vec::new()),
        ];
        let report = assemble_report(
            boards,
            &ProjectSelection::parse("1,2"),
            14,
            generated_at,
        );
        assert_eq!(report.generated_at, generated_at);
        assert_eq!(report.projects.len(), 2);
        let first = &report.projects[0];
        assert_eq!(first.lookback_days, 14);
        assert_eq!(first.columns[0].issues[0].snapshot.issue_number, 6);
        assert_eq!(first.columns[0].issues[1].snapshot.issue_number, 5);
        assert!(report.projects[1].columns.is_empty());
    }

    #[test]
    fn regression_assemble_report_deduplicates_removed_issues() {
        let mut project = board(1, Vec::new());
        project.removed_issues = vec![
            IssueSnapshot::new(4, "https://github.com/o/r/issues/4", "Four"),
            IssueSnapshot::new(4, "https://github.com/o/r/issues/4", "Four"),
            IssueSnapshot::new(2, "https://github.com/o/r/issues/2", "Two"),
        ];
        let report = assemble_report(
            vec![project],
            &ProjectSelection::All,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        let removed = report.projects[0]
            .removed_issues
            .iter()
            .map(|issue| issue.issue_number)
            .collect::<Vec<_>>();
        assert_eq!(removed, vec![4, 2]);
    }

    #[test]
    fn regression_assemble_report_accepts_empty_input() {
        let report = assemble_report(
            Vec::new(),
            &ProjectSelection::All,
            7,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
        );
        assert!(report.projects.is_empty());
    }
}
