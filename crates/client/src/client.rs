//! HTTP implementation of [`CrudApi`]

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::trace;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::models::{Credentials, NewRole, NewUser, ResourceId};
use crate::response::ApiResponse;
use crate::traits::CrudApi;

/// Client settings (simple version for tests and the CLI)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let http = crudload_config::HttpConfig::default();
        Self {
            base_url: crudload_config::TargetConfig::default().base_url,
            timeout: http.timeout,
            user_agent: http.user_agent,
        }
    }
}

impl ClientConfig {
    /// Build from the `[target]` and `[http]` sections
    pub fn from_config(config: &crudload_config::Config) -> Self {
        Self {
            base_url: config.target.base_url.clone(),
            timeout: config.http.timeout,
            user_agent: config.http.user_agent.clone(),
        }
    }
}

/// HTTP client for the CRUD API
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(config.base_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            base_url,
            timeout: config.timeout,
            client,
        })
    }

    /// Create a client from the full configuration
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &crudload_config::Config) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_config(config))
    }

    /// Base URL with trailing slashes removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request for `endpoint` at `path`, attaching the token where the
    /// endpoint requires one
    fn request(
        &self,
        endpoint: Endpoint,
        path: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let request = self.client.request(endpoint.method(), self.url(path));
        match token {
            Some(token) if endpoint.requires_auth() => request.bearer_auth(token),
            _ => request,
        }
    }

    fn map_error(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::Http(error)
        }
    }

    /// Send a request and read the full body
    async fn send(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        trace!(endpoint = %endpoint, status, bytes = body.len(), "response received");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

impl CrudApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::Login;
        let request = self.request(endpoint, endpoint.path(), None).json(credentials);
        self.send(endpoint, request).await
    }

    async fn list_roles(&self, token: &str) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::ListRoles;
        let request = self.request(endpoint, endpoint.path(), Some(token));
        self.send(endpoint, request).await
    }

    async fn list_users(&self, token: &str) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::ListUsers;
        let request = self.request(endpoint, endpoint.path(), Some(token));
        self.send(endpoint, request).await
    }

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::CreateUser;
        let request = self.request(endpoint, endpoint.path(), Some(token)).json(user);
        self.send(endpoint, request).await
    }

    async fn get_user(&self, token: &str, id: &ResourceId) -> Result<ApiResponse, ClientError> {
        let request = self.request(Endpoint::GetUser, &format!("/users/{}", id), Some(token));
        self.send(Endpoint::GetUser, request).await
    }

    async fn create_role(&self, token: &str, role: &NewRole) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::CreateRole;
        let request = self.request(endpoint, endpoint.path(), Some(token)).json(role);
        self.send(endpoint, request).await
    }

    async fn get_role(&self, token: &str, id: &ResourceId) -> Result<ApiResponse, ClientError> {
        let request = self.request(Endpoint::GetRole, &format!("/roles/{}", id), Some(token));
        self.send(Endpoint::GetRole, request).await
    }
}
