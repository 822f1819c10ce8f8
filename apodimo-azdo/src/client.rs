//! Azure DevOps REST client using reqwest

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::models::ErrorResponse;
use crate::{Error, Result};

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "7.0";

/// Azure DevOps REST client scoped to one organization
///
/// Authenticates every request with a personal access token over basic auth.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    organization_url: Url,
    token: String,
    api_version: String,
}

impl AzureDevOpsClient {
    /// Create a client for an organization URL such as `https://dev.azure.com/contoso`
    pub fn new(organization_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::builder(organization_url, token).build()
    }

    /// Start building a client with a custom API version or timeout
    pub fn builder(organization_url: &str, token: impl Into<String>) -> AzureDevOpsClientBuilder {
        AzureDevOpsClientBuilder {
            organization_url: organization_url.to_string(),
            token: token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: None,
        }
    }

    /// Build `<organization>/<segments...>?api-version=...`
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.organization_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// GET a JSON resource
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(path = %url.path(), "Azure DevOps GET");

        let response = self
            .http
            .get(url.clone())
            .basic_auth("", Some(&self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        // An invalid PAT is answered with a sign-in page instead of a 401
        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION
            || status == StatusCode::UNAUTHORIZED
        {
            return Err(Error::Auth(url.path().to_string()));
        }

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(Error::Status {
                status: status.as_u16(),
                path: url.path().to_string(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse response of {}: {}", url.path(), e)))
    }
}

impl std::fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization_url", &self.organization_url.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AzureDevOpsClient`]
pub struct AzureDevOpsClientBuilder {
    organization_url: String,
    token: String,
    api_version: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for AzureDevOpsClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClientBuilder")
            .field("organization_url", &self.organization_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AzureDevOpsClientBuilder {
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<AzureDevOpsClient> {
        let organization_url = Url::parse(self.organization_url.trim())?;
        if organization_url.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let mut http = Client::builder().user_agent(concat!("apodimo/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build()?;

        info!(
            organization = %organization_url,
            api_version = %self.api_version,
            "Created Azure DevOps client"
        );

        Ok(AzureDevOpsClient {
            http,
            organization_url,
            token: self.token,
            api_version: self.api_version,
        })
    }
}
