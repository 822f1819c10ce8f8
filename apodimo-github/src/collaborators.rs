//! Repository collaborators

use apodimo_core::model::Permission;
use reqwest::Method;
use serde_json::json;
use tracing::info;

use crate::{GitHubClient, Result};

impl GitHubClient {
    /// Add a collaborator, or send them an invitation if they are not an
    /// organization member yet
    pub async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
        permission: Permission,
    ) -> Result<()> {
        let status = self
            .send_no_content(
                Method::PUT,
                &["repos", owner, repo, "collaborators", username],
                Some(&json!({ "permission": permission.as_str() })),
            )
            .await?;

        // 201 means an invitation was created, 204 an existing member was updated
        info!(
            user = %username,
            permission = %permission,
            invited = status == 201,
            "Added collaborator"
        );
        Ok(())
    }
}
