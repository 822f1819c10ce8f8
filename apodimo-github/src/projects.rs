//! Classic projects and their columns

use apodimo_core::model::{DestColumn, DestProject};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

impl GitHubClient {
    /// Find an organization project by exact name
    pub async fn find_org_project(&self, org: &str, name: &str) -> Result<Option<DestProject>> {
        debug!(org = %org, project = %name, "Looking up organization project");
        self.find_paged(
            &format!("/orgs/{}/projects", org),
            &[("state", "all")],
            |project: &DestProject| project.name == name,
        )
        .await
    }

    /// Create an organization project
    pub async fn create_org_project(&self, org: &str, name: &str) -> Result<DestProject> {
        let project: DestProject = self
            .client()
            .post(format!("/orgs/{}/projects", org), Some(&json!({ "name": name })))
            .await
            .map_err(Error::from_api)?;

        info!(org = %org, project = %project.name, id = project.id, "Created organization project");
        Ok(project)
    }

    /// Find a repository project by exact name
    pub async fn find_repo_project(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<DestProject>> {
        debug!(owner = %owner, repo = %repo, project = %name, "Looking up repository project");
        self.find_paged(
            &format!("/repos/{}/{}/projects", owner, repo),
            &[("state", "all")],
            |project: &DestProject| project.name == name,
        )
        .await
    }

    /// Create a repository project
    pub async fn create_repo_project(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<DestProject> {
        let project: DestProject = self
            .client()
            .post(
                format!("/repos/{}/{}/projects", owner, repo),
                Some(&json!({ "name": name })),
            )
            .await
            .map_err(Error::from_api)?;

        info!(
            repo = %format!("{}/{}", owner, repo),
            project = %project.name,
            id = project.id,
            "Created repository project"
        );
        Ok(project)
    }

    /// Delete a project with all its columns
    pub async fn delete_project(&self, project_id: u64) -> Result<()> {
        let id = project_id.to_string();
        self.send_no_content::<()>(Method::DELETE, &["projects", &id], None)
            .await?;
        info!(id = project_id, "Deleted project");
        Ok(())
    }

    /// Columns of a project in board order
    pub async fn project_columns(&self, project_id: u64) -> Result<Vec<DestColumn>> {
        self.all_pages(&format!("/projects/{}/columns", project_id), &[])
            .await
    }

    /// Append a column to a project
    pub async fn create_project_column(&self, project_id: u64, name: &str) -> Result<DestColumn> {
        let column: DestColumn = self
            .client()
            .post(
                format!("/projects/{}/columns", project_id),
                Some(&json!({ "name": name })),
            )
            .await
            .map_err(Error::from_api)?;

        debug!(project = project_id, column = %column.name, "Created column");
        Ok(column)
    }
}
