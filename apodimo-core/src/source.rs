//! Read-only capability over the migration source (Azure DevOps)

use async_trait::async_trait;

use crate::model::{
    BacklogLevel, Board, BoardDetail, Iteration, Repository, Team, TeamMember, Wiki, WikiPage,
    WikiPageText, WorkItem, WorkItemRef,
};
use crate::Result;

/// Typed read access to one Azure DevOps organization
///
/// Every call is a single network round trip (or a short sequence of them)
/// with no retry; callers decide how to recover from a failed call.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Git repositories of a project
    async fn repositories(&self, project: &str) -> Result<Vec<Repository>>;

    /// Teams of a project
    async fn teams(&self, project: &str) -> Result<Vec<Team>>;

    /// Iterations the team is subscribed to
    async fn team_iterations(&self, team: &Team) -> Result<Vec<Iteration>>;

    /// Backlog levels configured for the team
    async fn backlogs(&self, team: &Team) -> Result<Vec<BacklogLevel>>;

    /// Work item references on one backlog level
    async fn backlog_work_items(&self, team: &Team, backlog_id: &str) -> Result<Vec<WorkItemRef>>;

    /// Hydrate work items by id
    ///
    /// An empty id list yields an empty result without a request.
    async fn work_items(&self, ids: &[i64]) -> Result<Vec<WorkItem>>;

    /// Boards of the team
    async fn boards(&self, team: &Team) -> Result<Vec<Board>>;

    /// A single board with its columns
    async fn board(&self, team: &Team, board_id: &str) -> Result<BoardDetail>;

    /// Wikis of a project
    async fn wikis(&self, project: &str) -> Result<Vec<Wiki>>;

    /// Page tree of a wiki, rooted at `/`
    async fn wiki_pages(&self, project: &str, wiki_id: &str) -> Result<WikiPage>;

    /// Content of one wiki page
    async fn wiki_page_text(&self, project: &str, wiki_id: &str, path: &str)
        -> Result<WikiPageText>;

    /// Members of the team with their identities
    async fn team_members(&self, team: &Team) -> Result<Vec<TeamMember>>;
}
