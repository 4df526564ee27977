//! HTTP data client for a PostgREST-style endpoint.
//!
//! Every request carries the access key twice: as the `apikey` header and as
//! a bearer token. Collections live under `/rest/v1/<table>`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::repository::{StorageError, Storage};

mod repo;
mod rows;

const REST_PREFIX: &str = "/rest/v1";

/// Endpoint and credentials for the hosted data store.
#[derive(Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("rest endpoint url is empty")]
    EmptyUrl,
    #[error("rest access key is empty")]
    EmptyKey,
    #[error("rest access key is not a valid header value")]
    InvalidKey,
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    base_url: String,
}

impl RestRepository {
    /// Build a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the URL or key are blank, or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &RestConfig) -> Result<Self, RestInitError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(RestInitError::EmptyUrl);
        }
        let key = config.api_key.trim();
        if key.is_empty() {
            return Err(RestInitError::EmptyKey);
        }

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key).map_err(|_| RestInitError::InvalidKey)?;
        api_key.set_sensitive(true);
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| RestInitError::InvalidKey)?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{REST_PREFIX}/{table}", self.base_url))
    }
}

impl Storage {
    /// Build a `Storage` backed by the REST data client.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the client cannot be configured.
    pub fn rest(config: &RestConfig) -> Result<Self, RestInitError> {
        Ok(Self::from_repository(RestRepository::new(config)?))
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

/// Send a request and decode a JSON array of rows.
async fn fetch_rows<T: DeserializeOwned>(req: RequestBuilder) -> Result<Vec<T>, StorageError> {
    let resp = req.send().await.map_err(transport)?;
    let resp = check_status(resp).await?;
    resp.json::<Vec<T>>()
        .await
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

async fn check_status(resp: Response) -> Result<Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::CONFLICT => StorageError::Conflict(body),
        _ => StorageError::Connection(format!("status {status}: {body}")),
    })
}

/// Zero-or-one semantics: more than one row is a conflict.
fn at_most_one<T>(mut rows: Vec<T>, what: &str) -> Result<Option<T>, StorageError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(StorageError::Conflict(format!("expected at most one {what}, got {n}"))),
    }
}
