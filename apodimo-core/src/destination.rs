//! Read/write capability over the migration destination (GitHub)

use async_trait::async_trait;

use crate::model::{
    DestColumn, DestMilestone, DestProject, DestRepository, IssuePayload, NewMilestone,
    Permission,
};
use crate::Result;

/// Typed access to a GitHub organization and its repositories
///
/// `find_*` lookups return `Ok(None)` when nothing matches by exact name;
/// an `Err` always means the lookup itself failed.
#[async_trait]
pub trait DestinationClient: Send + Sync {
    /// Repository of the organization with the given name
    async fn find_org_repository(&self, org: &str, name: &str) -> Result<Option<DestRepository>>;

    /// Create an organization repository
    async fn create_org_repository(&self, org: &str, name: &str) -> Result<DestRepository>;

    /// Delete a repository and everything in it
    async fn delete_repository(&self, owner: &str, name: &str) -> Result<()>;

    /// Organization-level project with the given name
    async fn find_org_project(&self, org: &str, name: &str) -> Result<Option<DestProject>>;

    /// Create an organization-level project
    async fn create_org_project(&self, org: &str, name: &str) -> Result<DestProject>;

    /// Repository-level project with the given name
    async fn find_repo_project(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<DestProject>>;

    /// Create a repository-level project
    async fn create_repo_project(&self, owner: &str, repo: &str, name: &str)
        -> Result<DestProject>;

    /// Delete a project and its columns
    async fn delete_project(&self, project_id: u64) -> Result<()>;

    /// Columns of a project, in board order
    async fn project_columns(&self, project_id: u64) -> Result<Vec<DestColumn>>;

    /// Append a column to a project
    async fn create_project_column(&self, project_id: u64, name: &str) -> Result<DestColumn>;

    /// All milestones of a repository, open and closed
    async fn milestones(&self, owner: &str, repo: &str) -> Result<Vec<DestMilestone>>;

    /// Create a milestone
    async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: &NewMilestone,
    ) -> Result<DestMilestone>;

    /// Create an issue, returning its number
    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &IssuePayload,
        milestone: Option<u64>,
    ) -> Result<u64>;

    /// Invite or add a collaborator to a repository
    async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
        permission: Permission,
    ) -> Result<()>;
}
