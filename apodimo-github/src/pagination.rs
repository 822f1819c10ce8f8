//! Page-number pagination over list endpoints

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Error, GitHubClient, Result};

/// Items requested per page (GitHub's maximum)
pub const PER_PAGE: usize = 100;

impl GitHubClient {
    /// Walk `route` page by page, returning the first item accepted by `matches`
    ///
    /// Stops at the first short page, so a miss costs one request per
    /// hundred items.
    pub(crate) async fn find_paged<T, F>(
        &self,
        route: &str,
        params: &[(&str, &str)],
        mut matches: F,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let mut page = 1;
        loop {
            let items: Vec<T> = self.get_page(route, params, page).await?;
            let count = items.len();

            if let Some(found) = items.into_iter().find(|item| matches(item)) {
                return Ok(Some(found));
            }
            if count < PER_PAGE {
                return Ok(None);
            }
            page += 1;
        }
    }

    /// Collect every item of every page of `route`
    pub(crate) async fn all_pages<T>(&self, route: &str, params: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let items: Vec<T> = self.get_page(route, params, page).await?;
            let count = items.len();
            all.extend(items);

            if count < PER_PAGE {
                return Ok(all);
            }
            page += 1;
        }
    }

    async fn get_page<T>(&self, route: &str, params: &[(&str, &str)], page: u32) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut query: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        query.push(("per_page", PER_PAGE.to_string()));
        query.push(("page", page.to_string()));

        debug!(route = %route, page, "Fetching page");
        self.client()
            .get(route, Some(&query))
            .await
            .map_err(Error::from_api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apodimo_core::model::DestColumn;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn columns(range: std::ops::Range<u64>) -> serde_json::Value {
        json!(range
            .map(|id| json!({ "id": id, "name": format!("col-{}", id) }))
            .collect::<Vec<_>>())
    }

    async fn server_with_two_pages() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/1/columns"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(columns(0..100)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/1/columns"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(columns(100..103)))
            .mount(&server)
            .await;
        server
    }

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::builder("token")
            .api_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_all_pages_stops_at_short_page() {
        let server = server_with_two_pages().await;

        let all: Vec<DestColumn> = client(&server)
            .all_pages("/projects/1/columns", &[])
            .await
            .unwrap();
        assert_eq!(all.len(), 103);
        assert_eq!(all[102].name, "col-102");
    }

    #[tokio::test]
    async fn test_find_paged_reaches_second_page() {
        let server = server_with_two_pages().await;

        let found: Option<DestColumn> = client(&server)
            .find_paged("/projects/1/columns", &[], |c: &DestColumn| c.name == "col-101")
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(101));
    }

    #[tokio::test]
    async fn test_find_paged_miss() {
        let server = server_with_two_pages().await;

        let found: Option<DestColumn> = client(&server)
            .find_paged("/projects/1/columns", &[], |c: &DestColumn| c.name == "absent")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_paged_stops_early() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/1/columns"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(columns(0..100)))
            .expect(1)
            .mount(&server)
            .await;

        let found: Option<DestColumn> = client(&server)
            .find_paged("/projects/1/columns", &[], |c: &DestColumn| c.id == 3)
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.name), Some("col-3".to_string()));
    }
}
