//! Wire shapes of the Azure DevOps REST API and their conversion into core entities

use std::collections::HashMap;

use apodimo_core::model::{
    BacklogLevel, Board, BoardColumn, BoardDetail, Identity, Iteration, Repository, Team,
    TeamMember, Wiki, WikiPage, WikiPageText, WorkItem, WorkItemRef,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// `{ "count": n, "value": [...] }` list envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Error body returned alongside non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRepository {
    id: String,
    name: String,
    remote_url: String,
}

impl From<WireRepository> for Repository {
    fn from(repo: WireRepository) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            remote_url: repo.remote_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTeam {
    id: String,
    name: String,
    project_id: String,
    project_name: String,
}

impl From<WireTeam> for Team {
    fn from(team: WireTeam) -> Self {
        Self {
            id: team.id,
            name: team.name,
            project_id: team.project_id,
            project_name: team.project_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IterationAttributes {
    start_date: Option<DateTime<Utc>>,
    finish_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIteration {
    id: String,
    name: String,
    path: String,
    #[serde(default)]
    attributes: IterationAttributes,
}

impl From<WireIteration> for Iteration {
    fn from(iteration: WireIteration) -> Self {
        Self {
            id: iteration.id,
            name: iteration.name,
            path: iteration.path,
            start_date: iteration.attributes.start_date,
            finish_date: iteration.attributes.finish_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBacklogLevel {
    id: String,
    name: String,
}

impl From<WireBacklogLevel> for BacklogLevel {
    fn from(level: WireBacklogLevel) -> Self {
        Self {
            id: level.id,
            name: level.name,
        }
    }
}

/// `{ "workItems": [{ "target": { "id": 1 } }] }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BacklogWorkItems {
    #[serde(default)]
    pub work_items: Vec<BacklogLink>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BacklogLink {
    target: LinkTarget,
}

#[derive(Debug, Deserialize)]
struct LinkTarget {
    id: i64,
}

impl From<BacklogLink> for WorkItemRef {
    fn from(link: BacklogLink) -> Self {
        Self { id: link.target.id }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireWorkItem {
    id: i64,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl WireWorkItem {
    fn text(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name).and_then(field_text))
    }
}

impl From<WireWorkItem> for WorkItem {
    fn from(item: WireWorkItem) -> Self {
        Self {
            id: item.id,
            title: item.text(&["System.Title"]).unwrap_or_default(),
            work_item_type: item.text(&["System.WorkItemType"]),
            area_path: item.text(&["System.AreaPath"]),
            iteration_path: item.text(&["System.IterationPath"]),
            priority: item.text(&["Microsoft.VSTS.Common.Priority"]),
            effort: item.text(&[
                "Microsoft.VSTS.Scheduling.Effort",
                "Microsoft.VSTS.Common.Effort",
            ]),
            remaining_work: item.text(&[
                "Microsoft.VSTS.Scheduling.RemainingWork",
                "Microsoft.VSTS.Common.RemainingWork",
            ]),
            reason: item.text(&["System.Reason"]),
            state: item.text(&["System.State"]),
            created_date: item.text(&["System.CreatedDate"]),
            created_by: item.text(&["System.CreatedBy"]),
            changed_date: item.text(&["System.ChangedDate"]),
            changed_by: item.text(&["System.ChangedBy"]),
            description: item.text(&["System.Description"]),
        }
    }
}

/// Display form of a work item field value
///
/// Identity objects render as `Display Name <unique name>`.
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => {
            let display = map.get("displayName").and_then(Value::as_str);
            let unique = map.get("uniqueName").and_then(Value::as_str);
            match (display, unique) {
                (Some(display), Some(unique)) => Some(format!("{} <{}>", display, unique)),
                (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
                (None, None) => Some(value.to_string()),
            }
        }
        Value::Array(_) => Some(value.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBoard {
    id: String,
    name: String,
}

impl From<WireBoard> for Board {
    fn from(board: WireBoard) -> Self {
        Self {
            id: board.id,
            name: board.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBoardColumn {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBoardDetail {
    id: String,
    name: String,
    #[serde(default)]
    columns: Vec<WireBoardColumn>,
}

impl From<WireBoardDetail> for BoardDetail {
    fn from(board: WireBoardDetail) -> Self {
        Self {
            id: board.id,
            name: board.name,
            columns: board
                .columns
                .into_iter()
                .map(|c| BoardColumn {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireWiki {
    id: String,
    name: String,
}

impl From<WireWiki> for Wiki {
    fn from(wiki: WireWiki) -> Self {
        Self {
            id: wiki.id,
            name: wiki.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireWikiPage {
    path: String,
    #[serde(default)]
    sub_pages: Vec<WireWikiPage>,
    #[serde(default)]
    content: Option<String>,
}

impl From<WireWikiPage> for WikiPage {
    fn from(page: WireWikiPage) -> Self {
        Self {
            path: page.path,
            sub_pages: page.sub_pages.into_iter().map(WikiPage::from).collect(),
        }
    }
}

impl From<WireWikiPage> for WikiPageText {
    fn from(page: WireWikiPage) -> Self {
        Self {
            path: page.path,
            content: page.content.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIdentity {
    id: String,
    display_name: String,
    unique_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTeamMember {
    identity: WireIdentity,
}

impl From<WireTeamMember> for TeamMember {
    fn from(member: WireTeamMember) -> Self {
        Self {
            identity: Identity {
                id: member.identity.id,
                display_name: member.identity.display_name,
                unique_name: member.identity.unique_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!("Active")), Some("Active".to_string()));
        assert_eq!(field_text(&json!(2)), Some("2".to_string()));
        assert_eq!(field_text(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(field_text(&json!(null)), None);
        assert_eq!(
            field_text(&json!({
                "displayName": "Ann Lee",
                "uniqueName": "ann@contoso.com",
                "id": "a1"
            })),
            Some("Ann Lee <ann@contoso.com>".to_string())
        );
    }

    #[test]
    fn test_work_item_from_fields() {
        let wire: WireWorkItem = serde_json::from_value(json!({
            "id": 42,
            "rev": 3,
            "fields": {
                "System.Title": "Crash on save",
                "System.WorkItemType": "Bug",
                "System.AreaPath": "App\\Core",
                "System.IterationPath": "App\\Sprint 1",
                "Microsoft.VSTS.Common.Priority": 2,
                "Microsoft.VSTS.Scheduling.RemainingWork": 4.5,
                "System.CreatedBy": { "displayName": "Ann Lee", "uniqueName": "ann@contoso.com" }
            }
        }))
        .unwrap();

        let item = WorkItem::from(wire);
        assert_eq!(item.id, 42);
        assert_eq!(item.title, "Crash on save");
        assert_eq!(item.area_path.as_deref(), Some("App\\Core"));
        assert_eq!(item.priority.as_deref(), Some("2"));
        assert_eq!(item.remaining_work.as_deref(), Some("4.5"));
        assert_eq!(item.created_by.as_deref(), Some("Ann Lee <ann@contoso.com>"));
        assert!(item.effort.is_none());
        assert!(item.description.is_none());
    }

    #[test]
    fn test_iteration_dates() {
        let wire: WireIteration = serde_json::from_value(json!({
            "id": "it-1",
            "name": "Sprint 1",
            "path": "App\\Sprint 1",
            "attributes": {
                "startDate": "2024-01-01T00:00:00Z",
                "finishDate": "2024-01-15T00:00:00Z",
                "timeFrame": "past"
            }
        }))
        .unwrap();

        let iteration = Iteration::from(wire);
        assert_eq!(
            iteration.finish_date.map(|d| d.to_rfc3339()),
            Some("2024-01-15T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_iteration_without_dates() {
        let wire: WireIteration = serde_json::from_value(json!({
            "id": "it-0",
            "name": "Backlog",
            "path": "App",
            "attributes": { "startDate": null, "finishDate": null }
        }))
        .unwrap();
        assert!(Iteration::from(wire).finish_date.is_none());
    }
}
