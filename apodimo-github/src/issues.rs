//! Issues and milestones

use apodimo_core::model::{DestMilestone, IssuePayload, NewMilestone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

/// Body of `POST /repos/{owner}/{repo}/issues`
#[derive(Debug, Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    milestone: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    number: u64,
}

impl GitHubClient {
    /// All milestones of a repository, open and closed
    pub async fn list_milestones(&self, owner: &str, repo: &str) -> Result<Vec<DestMilestone>> {
        let milestones: Vec<DestMilestone> = self
            .all_pages(
                &format!("/repos/{}/{}/milestones", owner, repo),
                &[("state", "all")],
            )
            .await?;
        debug!(owner = %owner, repo = %repo, count = milestones.len(), "Listed milestones");
        Ok(milestones)
    }

    /// Create a milestone
    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: &NewMilestone,
    ) -> Result<DestMilestone> {
        let created: DestMilestone = self
            .client()
            .post(format!("/repos/{}/{}/milestones", owner, repo), Some(milestone))
            .await
            .map_err(Error::from_api)?;

        info!(
            milestone = %created.title,
            number = created.number,
            "Created milestone"
        );
        Ok(created)
    }

    /// Create an issue and return its number
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &IssuePayload,
        milestone: Option<u64>,
    ) -> Result<u64> {
        let body = CreateIssue {
            title: &issue.title,
            body: &issue.body,
            labels: &issue.labels,
            milestone,
        };

        let created: CreatedIssue = self
            .client()
            .post(format!("/repos/{}/{}/issues", owner, repo), Some(&body))
            .await
            .map_err(Error::from_api)?;

        debug!(number = created.number, title = %issue.title, "Created issue");
        Ok(created.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apodimo_core::model::MilestoneState;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::builder("ghp_token")
            .api_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_milestones_all_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/contoso/public/milestones"))
            .and(query_param("state", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "number": 1, "title": "Sprint 1", "state": "closed" },
                { "number": 2, "title": "Sprint 2", "state": "open" }
            ])))
            .mount(&server)
            .await;

        let milestones = client(&server)
            .list_milestones("contoso", "public")
            .await
            .unwrap();
        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[1].title, "Sprint 2");
    }

    #[tokio::test]
    async fn test_create_milestone_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/contoso/public/milestones"))
            .and(body_json(json!({
                "title": "Sprint 1",
                "state": "open",
                "description": "",
                "due_on": "2024-01-15T00:00:00.000Z"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 5, "title": "Sprint 1", "state": "open"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let milestone = NewMilestone {
            title: "Sprint 1".to_string(),
            state: MilestoneState::Open,
            description: String::new(),
            due_on: Some("2024-01-15T00:00:00.000Z".to_string()),
        };
        let created = client(&server)
            .create_milestone("contoso", "public", &milestone)
            .await
            .unwrap();
        assert_eq!(created.number, 5);
    }

    #[tokio::test]
    async fn test_create_issue_with_milestone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/contoso/public/issues"))
            .and(body_json(json!({
                "title": "Crash on save",
                "body": "<h1>Crash on save</h1>\n",
                "labels": ["Bug", "App\\Core"],
                "milestone": 5
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 77, "title": "Crash on save"
            })))
            .mount(&server)
            .await;

        let issue = IssuePayload {
            title: "Crash on save".to_string(),
            body: "<h1>Crash on save</h1>\n".to_string(),
            labels: vec!["Bug".to_string(), "App\\Core".to_string()],
            milestone: Some("Sprint 1".to_string()),
        };
        let number = client(&server)
            .create_issue("contoso", "public", &issue, Some(5))
            .await
            .unwrap();
        assert_eq!(number, 77);
    }

    #[tokio::test]
    async fn test_create_issue_without_milestone_omits_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/contoso/public/issues"))
            .and(body_json(json!({
                "title": "Task",
                "body": "",
                "labels": []
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let issue = IssuePayload {
            title: "Task".to_string(),
            body: String::new(),
            labels: vec![],
            milestone: None,
        };
        client(&server)
            .create_issue("contoso", "public", &issue, None)
            .await
            .unwrap();
    }
}
