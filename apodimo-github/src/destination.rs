//! `DestinationClient` implementation for [`GitHubClient`]

use apodimo_core::model::{
    DestColumn, DestMilestone, DestProject, DestRepository, IssuePayload, NewMilestone,
    Permission,
};
use apodimo_core::{DestinationClient, Result};
use async_trait::async_trait;

use crate::GitHubClient;

#[async_trait]
impl DestinationClient for GitHubClient {
    async fn find_org_repository(&self, org: &str, name: &str) -> Result<Option<DestRepository>> {
        Ok(GitHubClient::find_org_repository(self, org, name).await?)
    }

    async fn create_org_repository(&self, org: &str, name: &str) -> Result<DestRepository> {
        Ok(GitHubClient::create_org_repository(self, org, name).await?)
    }

    async fn delete_repository(&self, owner: &str, name: &str) -> Result<()> {
        Ok(GitHubClient::delete_repository(self, owner, name).await?)
    }

    async fn find_org_project(&self, org: &str, name: &str) -> Result<Option<DestProject>> {
        Ok(GitHubClient::find_org_project(self, org, name).await?)
    }

    async fn create_org_project(&self, org: &str, name: &str) -> Result<DestProject> {
        Ok(GitHubClient::create_org_project(self, org, name).await?)
    }

    async fn find_repo_project(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<DestProject>> {
        Ok(GitHubClient::find_repo_project(self, owner, repo, name).await?)
    }

    async fn create_repo_project(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<DestProject> {
        Ok(GitHubClient::create_repo_project(self, owner, repo, name).await?)
    }

    async fn delete_project(&self, project_id: u64) -> Result<()> {
        Ok(GitHubClient::delete_project(self, project_id).await?)
    }

    async fn project_columns(&self, project_id: u64) -> Result<Vec<DestColumn>> {
        Ok(GitHubClient::project_columns(self, project_id).await?)
    }

    async fn create_project_column(&self, project_id: u64, name: &str) -> Result<DestColumn> {
        Ok(GitHubClient::create_project_column(self, project_id, name).await?)
    }

    async fn milestones(&self, owner: &str, repo: &str) -> Result<Vec<DestMilestone>> {
        Ok(self.list_milestones(owner, repo).await?)
    }

    async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: &NewMilestone,
    ) -> Result<DestMilestone> {
        Ok(GitHubClient::create_milestone(self, owner, repo, milestone).await?)
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &IssuePayload,
        milestone: Option<u64>,
    ) -> Result<u64> {
        Ok(GitHubClient::create_issue(self, owner, repo, issue, milestone).await?)
    }

    async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
        permission: Permission,
    ) -> Result<()> {
        Ok(GitHubClient::add_collaborator(self, owner, repo, username, permission).await?)
    }
}
