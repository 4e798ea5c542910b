//! Movie database API client
//!
//! [`MovieListApi`] is the seam the logics call through; [`TmdbClient`]
//! implements it over HTTP with reqwest.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::state::{null_as_default, MovieListItem};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response: connection refused, DNS, TLS, timeouts
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        status_message: Option<String>,
    },

    /// 2xx response whose body could not be read
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the server in the error body, if any
    pub fn status_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                status_message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

fn default_total_pages() -> u32 {
    1
}

fn total_pages_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(|pages| pages.unwrap_or_else(default_total_pages))
}

/// Body of `GET /account/{id}/lists`
///
/// Missing and `null` fields both fall back to one page of no results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListsResponse {
    #[serde(
        default = "default_total_pages",
        deserialize_with = "total_pages_or_default"
    )]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieListItem>,
}

/// Body of `POST /list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewList {
    pub name: String,
    pub description: String,
    pub language: String,
}

impl NewList {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: "en".into(),
        }
    }
}

/// TMDB error bodies: `{"status_code": 7, "status_message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[async_trait]
pub trait MovieListApi: Send + Sync + 'static {
    /// One page of the configured account's lists
    async fn fetch_lists(&self, page: u32) -> Result<ListsResponse, ApiError>;

    /// Create a list, returning the server payload
    async fn create_list(&self, list: &NewList) -> Result<Value, ApiError>;
}

/// HTTP client for the TMDB v3 API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl TmdbClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("movie-lists/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: ApiConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Turn a non-2xx response into [`ApiError::Status`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.status_message);

    Err(ApiError::Status {
        status: status.as_u16(),
        status_message,
    })
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> ApiError {
    ApiError::Decode(err.to_string())
}

#[async_trait]
impl MovieListApi for TmdbClient {
    async fn fetch_lists(&self, page: u32) -> Result<ListsResponse, ApiError> {
        let url = format!(
            "{}/account/{}/lists",
            self.config.base_api, self.config.account_id
        );
        tracing::debug!(%url, page, "GET lists");

        let response = self
            .http
            .get(&url)
            .query(&[("page", page)])
            .query(&[
                ("session_id", self.config.session_id.as_str()),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        check_status(response)
            .await?
            .json::<ListsResponse>()
            .await
            .map_err(decode)
    }

    async fn create_list(&self, list: &NewList) -> Result<Value, ApiError> {
        let url = format!("{}/list", self.config.base_api);
        tracing::debug!(%url, name = %list.name, "POST list");

        // `json` sets `Content-Type: application/json`
        let response = self
            .http
            .post(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("session_id", self.config.session_id.as_str()),
            ])
            .json(list)
            .send()
            .await
            .map_err(transport)?;

        check_status(response)
            .await?
            .json::<Value>()
            .await
            .map_err(decode)
    }
}
