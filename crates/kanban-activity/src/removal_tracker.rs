use std::collections::{HashMap, HashSet};

use crate::project_event::{EventKind, ProjectEvent};
use crate::report_assembly::IssueSnapshot;

/// Returns issues whose removal from `project_id` was never followed by a re-add.
///
/// Works on the full membership history, not the lookback window. An
/// `added_to_project` cancels a removal only for the same issue and project and
/// only when it is later: a newer timestamp, or the same timestamp further down
/// the input. Issues are reported once, in the order their first surviving
/// removal appears.
pub fn permanently_removed_issue_numbers(events: &[ProjectEvent], project_id: u64) -> Vec<u64> {
    let mut seen = HashSet::new();
    let mut removed = Vec::new();
    for (index, removal) in events.iter().enumerate() {
        if removal.event != EventKind::RemovedFromProject || removal.project_id != Some(project_id)
        {
            continue;
        }
        let re_added = events.iter().enumerate().any(|(other_index, other)| {
            other.event == EventKind::AddedToProject
                && other.issue_number == removal.issue_number
                && other.project_id == removal.project_id
                && (other.created_at > removal.created_at
                    || (other.created_at == removal.created_at && other_index > index))
        });
        if !re_added && seen.insert(removal.issue_number) {
            removed.push(removal.issue_number);
        }
    }
    removed
}

/// Resolves permanently removed issues to snapshots using the caller's issue directory.
///
/// Issues missing from `issues` cannot be rendered and are left out.
pub fn track_removals(
    events: &[ProjectEvent],
    project_id: u64,
    issues: &HashMap<u64, IssueSnapshot>,
) -> Vec<IssueSnapshot> {
    permanently_removed_issue_numbers(events, project_id)
        .into_iter()
        .filter_map(|issue_number| issues.get(&issue_number).cloned())
        .collect()
}
