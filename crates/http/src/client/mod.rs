//! Backoffice HTTP client

pub mod auth;
pub mod error;
pub mod health;
pub mod persons;
pub mod pipeline;
pub mod products;

use crate::messages::Locale;
use crate::session::SessionManager;
use error::{ApiError, ClientError, TransportError};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("backoffice-client/", env!("CARGO_PKG_VERSION"));

/// Backoffice API client.
///
/// Every request goes through the pipeline: the session's access token is
/// attached (except on the token endpoints) and failures are normalized into
/// [`ApiError`]. A 401 response ends the session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
    locale: Locale,
}

impl ApiClient {
    /// Create a client with an in-memory session
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Start a request to `path`, relative to the base URL
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Run `request` through the pipeline and return the successful response
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = request
            .build()
            .map_err(|e| self.reject(TransportError::Network(e)))?;
        pipeline::attach_token(&mut request, self.session.get_token().as_deref());

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.reject(TransportError::Network(e)))?;
        let status = response.status();

        if status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "Request succeeded");
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(self.reject(TransportError::Status { status, body }))
        }
    }

    /// Run `request` and decode the JSON body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.reject(TransportError::Network(e)))?;

        serde_json::from_slice(&body)
            .map_err(|source| self.reject(TransportError::Decode { status, source }))
    }

    /// Run `request` and discard the body
    pub async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    /// Normalize a failure, ending the session when it is a 401
    fn reject(&self, cause: TransportError) -> ApiError {
        if let Some(body) = cause.body().filter(|b| !b.is_empty()) {
            debug!(body, "Error response body");
        }

        let err = pipeline::normalize(cause, self.locale);
        error!(status = err.status(), cause = %err.cause(), "HTTP error: {}", err.message());

        if err.is_auth_expired() {
            self.session.logout();
        }

        err
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("locale", &self.locale)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    session: Option<Arc<SessionManager>>,
    locale: Locale,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use an existing session instead of a fresh in-memory one
    pub fn session(mut self, session: Arc<SessionManager>) -> Self {
        self.session = Some(session);
        self
    }

    /// Language of normalized error messages
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base_url '{base_url}': {e}"))
        })?;

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(SessionManager::in_memory())),
            locale: self.locale,
        })
    }
}
