//! Value types exchanged between the source, the mapper and the destination
//!
//! Everything here is request-scoped: fetched, transformed and written once
//! per run, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source (Azure DevOps) entities
// ---------------------------------------------------------------------------

/// A git repository in the source project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    /// Clone URL of the repository
    pub remote_url: String,
}

/// A team of the source project
///
/// Carries both id and name of itself and its project since the work APIs
/// address teams through that pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub project_name: String,
}

/// A team iteration (sprint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iteration {
    pub id: String,
    pub name: String,
    /// Full classification path, e.g. `Project\Sprint 1`
    pub path: String,
    pub start_date: Option<DateTime<Utc>>,
    pub finish_date: Option<DateTime<Utc>>,
}

/// A backlog level (epics, features, stories...) of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogLevel {
    pub id: String,
    pub name: String,
}

/// Reference to a work item listed on a backlog level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemRef {
    pub id: i64,
}

/// A hydrated work item
///
/// Field values are kept in their display form since they only ever end
/// up interpolated into an issue body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    pub title: String,
    pub work_item_type: Option<String>,
    pub area_path: Option<String>,
    pub iteration_path: Option<String>,
    pub priority: Option<String>,
    pub effort: Option<String>,
    pub remaining_work: Option<String>,
    pub reason: Option<String>,
    pub state: Option<String>,
    pub created_date: Option<String>,
    pub created_by: Option<String>,
    pub changed_date: Option<String>,
    pub changed_by: Option<String>,
    pub description: Option<String>,
}

/// A Kanban board of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// A board with its ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDetail {
    pub id: String,
    pub name: String,
    pub columns: Vec<BoardColumn>,
}

/// A status lane of a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub id: String,
    pub name: String,
}

/// A project wiki
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wiki {
    pub id: String,
    pub name: String,
}

/// A node of a wiki page tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    pub path: String,
    #[serde(default)]
    pub sub_pages: Vec<WikiPage>,
}

/// The markdown content of a wiki page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPageText {
    pub path: String,
    pub content: String,
}

/// An identity as the source reports it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    /// Account name, usually an email address; the dedup key for members
    pub unique_name: String,
}

/// A member of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub identity: Identity,
}

// ---------------------------------------------------------------------------
// Destination (GitHub) entities
// ---------------------------------------------------------------------------

/// A repository in the destination organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestRepository {
    pub id: u64,
    pub name: String,
    pub clone_url: String,
}

/// A classic project board, org- or repository-scoped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestProject {
    pub id: u64,
    pub name: String,
}

/// A column of a destination project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestColumn {
    pub id: u64,
    pub name: String,
}

/// A milestone of the destination repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestMilestone {
    pub number: u64,
    pub title: String,
}

/// Milestone state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    #[default]
    Open,
    Closed,
}

/// Payload for creating a milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMilestone {
    pub title: String,
    pub state: MilestoneState,
    pub description: String,
    /// ISO-8601 UTC instant with millisecond precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

/// Payload for creating an issue, as produced by the field mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    /// Title of the milestone the issue belongs to
    pub milestone: Option<String>,
}

/// Repository permission granted to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl Permission {
    /// Wire name of the permission
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Pull => "pull",
            Permission::Triage => "triage",
            Permission::Push => "push",
            Permission::Maintain => "maintain",
            Permission::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
