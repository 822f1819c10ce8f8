//! Organization repositories

use apodimo_core::model::DestRepository;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

impl GitHubClient {
    /// Find an organization repository by exact name
    pub async fn find_org_repository(&self, org: &str, name: &str) -> Result<Option<DestRepository>> {
        debug!(org = %org, repo = %name, "Looking up repository");
        self.find_paged(&format!("/orgs/{}/repos", org), &[], |repo: &DestRepository| {
            repo.name == name
        })
        .await
    }

    /// Create an organization repository with default settings
    pub async fn create_org_repository(&self, org: &str, name: &str) -> Result<DestRepository> {
        let repo: DestRepository = self
            .client()
            .post(format!("/orgs/{}/repos", org), Some(&json!({ "name": name })))
            .await
            .map_err(Error::from_api)?;

        info!(org = %org, repo = %repo.name, id = repo.id, "Created repository");
        Ok(repo)
    }

    /// Delete a repository; the token needs the `delete_repo` scope
    pub async fn delete_repository(&self, owner: &str, name: &str) -> Result<()> {
        self.send_no_content::<()>(Method::DELETE, &["repos", owner, name], None)
            .await?;
        info!(owner = %owner, repo = %name, "Deleted repository");
        Ok(())
    }
}
