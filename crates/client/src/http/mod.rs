use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::backend::{Backend, ClientError, QuizCatalog, QuizSource, SubmissionSink};

mod catalog;
mod mapping;
mod quiz_source;
mod submission;

/// Connection settings for the REST backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000/api";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Read `STUDY_API_URL`, `STUDY_API_TOKEN` and `STUDY_API_TIMEOUT_SECS`.
    ///
    /// Missing, blank or zero values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("STUDY_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.into());
        let token = env::var("STUDY_API_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let timeout = env::var("STUDY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Self::DEFAULT_TIMEOUT, |secs| {
                Self::timeout_or_default(Duration::from_secs(secs))
            });
        Self {
            base_url,
            token,
            timeout,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// A zero timeout would fail every request, so it falls back to
    /// [`Self::DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Self::timeout_or_default(timeout);
        self
    }

    fn timeout_or_default(timeout: Duration) -> Duration {
        if timeout.is_zero() {
            Self::DEFAULT_TIMEOUT
        } else {
            timeout
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// REST implementation of the quiz collaborators.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    /// Build a client for the given backend.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidBaseUrl` if the URL is not http(s), or
    /// `HttpInitError::Client` if the HTTP client cannot be built.
    pub fn connect(config: ApiConfig) -> Result<Self, HttpInitError> {
        let base = config.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HttpInitError::InvalidBaseUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        self.authorized(self.client.get(url))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        self.authorized(self.client.post(url))
    }

    /// Send a request and keep only successful responses.
    async fn send_checked(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.send_checked(request).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl Backend {
    /// Build a `Backend` that talks to the REST API.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the client cannot be built.
    pub fn http(config: ApiConfig) -> Result<Self, HttpInitError> {
        let repo = HttpBackend::connect(config)?;
        let quizzes: Arc<dyn QuizSource> = Arc::new(repo.clone());
        let submissions: Arc<dyn SubmissionSink> = Arc::new(repo.clone());
        let catalog: Arc<dyn QuizCatalog> = Arc::new(repo);
        Ok(Self {
            quizzes,
            submissions,
            catalog,
        })
    }
}
