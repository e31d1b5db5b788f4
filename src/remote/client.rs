//! Placeholder API client
//!
//! `RemoteSource` is the seam between the views and the network; the
//! production implementation is `HttpRemote`, tests substitute their own.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::error::AppError;
use crate::metrics::{REMOTE_FETCHES_TOTAL, REMOTE_FETCH_DURATION_SECONDS};

/// Resource collections exposed by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Posts,
    Albums,
    Photos,
    Comments,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Posts,
        Resource::Albums,
        Resource::Photos,
        Resource::Comments,
        Resource::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Posts => "posts",
            Resource::Albums => "albums",
            Resource::Photos => "photos",
            Resource::Comments => "comments",
            Resource::Users => "users",
        }
    }

    /// Collection path, e.g. `/posts`
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("unknown resource: {s}")))
    }
}

/// Query parameters for a collection request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteQuery {
    params: Vec<(String, String)>,
}

impl RemoteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by owning identifier, e.g. `owned_by("postId", 3)`
    pub fn owned_by(mut self, field: &str, id: u64) -> Self {
        self.params.push((field.to_string(), id.to_string()));
        self
    }

    /// Limit the number of returned records (`_limit`)
    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("_limit".to_string(), limit.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Raw JSON access to the remote API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// GET `path` with `query`
    ///
    /// # Errors
    /// `AppError::NotFound` for a 404, other errors for network or
    /// decoding failures
    async fn get_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<serde_json::Value, AppError>;
}

/// `RemoteSource` backed by reqwest
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Create new HTTP remote
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &RemoteConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn get_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "Fetching from remote API");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            return Err(AppError::Remote(format!("GET {path} returned {status}")));
        }

        Ok(response.json().await?)
    }
}

/// Typed access to remote records
#[derive(Clone)]
pub struct RemoteApi {
    source: Arc<dyn RemoteSource>,
}

impl RemoteApi {
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self { source }
    }

    /// Fetch a collection
    ///
    /// # Errors
    /// Returns error on network failure or when the body is not an array
    /// of `T`
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &RemoteQuery,
    ) -> Result<Vec<T>, AppError> {
        let value = self
            .timed(resource, self.source.get_json(&resource.path(), query.params().to_vec()))
            .await?;

        serde_json::from_value(value)
            .map_err(|e| AppError::Remote(format!("malformed {resource} payload: {e}")))
    }

    /// Fetch a collection, degrading any failure to an empty list
    pub async fn list_or_empty<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &RemoteQuery,
    ) -> Vec<T> {
        match self.list(resource, query).await {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%error, %resource, "Remote fetch failed; using empty result");
                Vec::new()
            }
        }
    }

    /// Fetch a single record; a 404 yields `Ok(None)`
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: u64,
    ) -> Result<Option<T>, AppError> {
        let path = format!("{}/{}", resource.path(), id);
        match self
            .timed(resource, self.source.get_json(&path, Vec::new()))
            .await
        {
            Ok(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| AppError::Remote(format!("malformed {resource} payload: {e}"))),
            Err(AppError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Fetch a single record, degrading network failures to `None`
    pub async fn get_or_none<T: DeserializeOwned>(&self, resource: Resource, id: u64) -> Option<T> {
        match self.get(resource, id).await {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%error, %resource, id, "Remote lookup failed");
                None
            }
        }
    }

    async fn timed<F>(&self, resource: Resource, fetch: F) -> Result<serde_json::Value, AppError>
    where
        F: std::future::Future<Output = Result<serde_json::Value, AppError>>,
    {
        let timer = REMOTE_FETCH_DURATION_SECONDS
            .with_label_values(&[resource.as_str()])
            .start_timer();
        let result = fetch.await;
        timer.observe_duration();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(AppError::NotFound) => "not_found",
            Err(_) => "error",
        };
        REMOTE_FETCHES_TOTAL
            .with_label_values(&[resource.as_str(), outcome])
            .inc();

        result
    }
}
