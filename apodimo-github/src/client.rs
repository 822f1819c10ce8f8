//! GitHub API client using octocrab

use std::time::Duration;

use octocrab::Octocrab;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API client for one token, usable across organizations
///
/// Typed calls go through octocrab. Calls answering with an empty body
/// (collaborator PUT, project DELETE) are sent with reqwest directly.
pub struct GitHubClient {
    client: Octocrab,
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

impl GitHubClient {
    /// Create a client against api.github.com
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Start building a client with a custom API URL or timeout
    pub fn builder(token: impl Into<String>) -> GitHubClientBuilder {
        GitHubClientBuilder {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    /// Build `<api url>/<segments...>`, percent-encoding each segment
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Url(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request whose response body is ignored
    pub(crate) async fn send_no_content<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<u16> {
        let url = self.endpoint(segments)?;
        let route = url.path().to_string();
        debug!(method = %method, route = %route, "GitHub request");

        let mut request = self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                route,
                message: text,
            });
        }

        Ok(status.as_u16())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for [`GitHubClient`]
pub struct GitHubClientBuilder {
    token: String,
    api_url: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for GitHubClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClientBuilder")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GitHubClientBuilder {
    /// REST API base URL, e.g. for GitHub Enterprise Server
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GitHubClient> {
        if self.token.trim().is_empty() {
            return Err(Error::Auth("GitHub token is empty".to_string()));
        }

        // join() drops the last path segment unless the base ends with '/'
        let mut api_url = self.api_url.trim().to_string();
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        let api_url = Url::parse(&api_url).map_err(|e| Error::Url(e.to_string()))?;

        let mut builder = Octocrab::builder()
            .personal_token(self.token.clone())
            .base_uri(api_url.as_str().trim_end_matches('/'))
            .map_err(|e| Error::Url(e.to_string()))?;
        if let Some(timeout) = self.timeout {
            builder = builder
                .set_connect_timeout(Some(timeout))
                .set_read_timeout(Some(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        let mut http = reqwest::Client::builder()
            .user_agent(concat!("apodimo/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build()?;

        info!(api_url = %api_url, "Created GitHub client");

        Ok(GitHubClient {
            client,
            http,
            api_url,
            token: self.token,
        })
    }
}
