use crate::project_event::ProjectEvent;

const FLOW_SEPARATOR: &str = " -> ";

/// Renders the chronological column chain for an issue, e.g. `Backlog -> Doing -> Done`.
///
/// Only the first event contributes its previous column. Events without a
/// column render as their raw kind name.
pub fn summarize_flow(events: &[ProjectEvent]) -> String {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| match event.column_name.as_deref() {
            Some(column) if !column.is_empty() => match event.previous_column_name.as_deref() {
                Some(previous) if index == 0 && !previous.is_empty() => {
                    format!("{previous}{FLOW_SEPARATOR}{column}")
                }
                _ => column.to_string(),
            },
            _ => event.event.as_str().to_string(),
        })
        .collect::<Vec<_>>()
        .join(FLOW_SEPARATOR)
}
