//! HTTP/JSON implementation of the cluster API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error};

use crate::client::ClusterApi;
use crate::error::{ClusterApiError, RESOURCE_NOT_FOUND};
use crate::types::{
    Cluster, ClusterResponse, CreateClusterRequest, UpdateClusterConfigRequest,
    UpdateClusterVersionRequest,
};

/// Header carrying the remote API's error code.
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Identity the client acts as.
///
/// Passed in at construction so every activation decides explicitly which
/// identity it uses.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Cluster API client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClusterApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClusterApi {
    /// Create a new client for the API at `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Option<&Credentials>,
    ) -> Result<Self, ClusterApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClusterApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClusterApiError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(creds) = credentials {
            let value = HeaderValue::from_str(&format!("Bearer {}", creds.token))
                .map_err(|e| ClusterApiError::InvalidCredentials(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build a URL below the base path. Each segment is percent-encoded, so a
    /// cluster name can never escape its path position.
    fn url(&self, segments: &[&str]) -> Result<Url, ClusterApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClusterApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode a `{"cluster": ...}` response.
    async fn cluster_response(
        &self,
        name: &str,
        response: reqwest::Response,
    ) -> Result<Cluster, ClusterApiError> {
        let response = self.check_status(name, response).await?;
        let body: ClusterResponse = response
            .json()
            .await
            .map_err(|e| ClusterApiError::InvalidResponse(e.to_string()))?;
        Ok(body.cluster)
    }

    /// Pass successful responses through, convert everything else to an error.
    async fn check_status(
        &self,
        name: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClusterApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The header value may carry a documentation suffix after ':'.
        let header_code = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(':').next())
            .map(str::to_string);

        let body: ApiErrorResponse = response.json().await.unwrap_or_default();
        let code = header_code
            .or(body.error_type)
            .unwrap_or_else(|| "UnknownError".to_string());

        if status == StatusCode::NOT_FOUND || code == RESOURCE_NOT_FOUND {
            debug!(cluster = %name, code = %code, "Cluster not found");
            return Err(ClusterApiError::NotFound(name.to_string()));
        }

        let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
        error!(cluster = %name, status = %status, code = %code, message = %message, "Cluster API call failed");
        Err(ClusterApiError::api(status.as_u16(), code, message))
    }
}

#[async_trait]
impl ClusterApi for HttpClusterApi {
    async fn create_cluster(
        &self,
        request: &CreateClusterRequest,
    ) -> Result<Cluster, ClusterApiError> {
        debug!(cluster = %request.name, "Creating cluster");
        let response = self
            .client
            .post(self.url(&["clusters"])?)
            .json(request)
            .send()
            .await?;

        self.cluster_response(&request.name, response).await
    }

    async fn describe_cluster(&self, name: &str) -> Result<Cluster, ClusterApiError> {
        debug!(cluster = %name, "Describing cluster");
        let response = self
            .client
            .get(self.url(&["clusters", name])?)
            .send()
            .await?;

        self.cluster_response(name, response).await
    }

    async fn delete_cluster(&self, name: &str) -> Result<(), ClusterApiError> {
        debug!(cluster = %name, "Deleting cluster");
        let response = self
            .client
            .delete(self.url(&["clusters", name])?)
            .send()
            .await?;

        self.check_status(name, response).await?;
        Ok(())
    }

    async fn update_cluster_config(
        &self,
        request: &UpdateClusterConfigRequest,
    ) -> Result<(), ClusterApiError> {
        debug!(cluster = %request.name, "Updating cluster config");
        let response = self
            .client
            .post(self.url(&["clusters", request.name.as_str(), "update-config"])?)
            .json(request)
            .send()
            .await?;

        self.check_status(&request.name, response).await?;
        Ok(())
    }

    async fn update_cluster_version(
        &self,
        request: &UpdateClusterVersionRequest,
    ) -> Result<(), ClusterApiError> {
        debug!(cluster = %request.name, version = %request.version, "Updating cluster version");
        let response = self
            .client
            .post(self.url(&["clusters", request.name.as_str(), "updates"])?)
            .json(request)
            .send()
            .await?;

        self.check_status(&request.name, response).await?;
        Ok(())
    }
}

/// Error body returned by the remote API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorResponse {
    #[serde(default, rename = "__type")]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
