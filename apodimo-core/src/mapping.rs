//! Work item to issue field mapping

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{IssuePayload, Iteration, WorkItem};

/// Placeholder rendered for fields the work item does not carry
const MISSING: &str = "undefined";

/// Build the issue payload for a work item
///
/// `iterations` are the iterations known for the work item's team; they
/// only feed the milestone lookup.
pub fn map_work_item(item: &WorkItem, iterations: &[Iteration]) -> IssuePayload {
    IssuePayload {
        title: item.title.clone(),
        body: issue_body(item),
        labels: issue_labels(item),
        milestone: milestone_for(item, iterations).map(str::to_string),
    }
}

/// Labels are the work item type followed by its area path
pub fn issue_labels(item: &WorkItem) -> Vec<String> {
    [&item.work_item_type, &item.area_path]
        .into_iter()
        .flatten()
        .filter(|label| !label.is_empty())
        .cloned()
        .collect()
}

/// Name of the iteration whose path equals the work item's iteration path
///
/// The first match wins when several iterations share a path.
pub fn milestone_for<'a>(item: &WorkItem, iterations: &'a [Iteration]) -> Option<&'a str> {
    let path = item.iteration_path.as_deref()?;
    iterations
        .iter()
        .find(|iteration| iteration.path == path)
        .map(|iteration| iteration.name.as_str())
}

/// Render the HTML body of the issue
pub fn issue_body(item: &WorkItem) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or(MISSING).to_string();

    let mut body = format!("<h1>{}</h1>\n", item.title);
    let rows = [
        ("Priority", &item.priority),
        ("Effort", &item.effort),
        ("RemainingWork", &item.remaining_work),
        ("IterationPath", &item.iteration_path),
        ("Reason", &item.reason),
        ("State", &item.state),
        ("CreatedDate", &item.created_date),
        ("CreatedBy", &item.created_by),
        ("ChangedDate", &item.changed_date),
        ("ChangedBy", &item.changed_by),
        ("Description", &item.description),
    ];

    for (label, value) in rows {
        body.push_str(&format!("<p>{}: {}</p>\n", label, field(value)));
    }

    body
}

/// Milestone due date for an iteration finish date
///
/// GitHub expects an ISO-8601 UTC timestamp; milliseconds are always
/// written, e.g. `2024-01-15T00:00:00.000Z`.
pub fn due_on(finish_date: &DateTime<Utc>) -> String {
    finish_date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
