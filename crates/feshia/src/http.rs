use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::prelude::*;
use feshia_core::pagination::FetchError;

/// Anything that can resolve a URL to a JSON document.
///
/// The controllers only talk to this trait, so tests can swap the network for
/// canned responses.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Create the HTTP client shared by every command
pub fn create_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("feshia/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Build the network-backed source for `config`.
pub fn page_source(config: &ApiConfig) -> Result<Arc<dyn PageSource>> {
    let client = create_client(config)?;
    Ok(Arc::new(HttpPageSource::new(client)))
}

/// [`PageSource`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        debug!("Fetching URL: {url}");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Fetch a single JSON document and deserialize it as `T`.
pub async fn get_json<T: DeserializeOwned>(source: &dyn PageSource, url: &str) -> Result<T> {
    let raw = source.fetch(url).await.map_err(Error::from)?;
    let value = serde_json::from_value(raw).map_err(|e| Error::Shape(format!("{url}: {e}")))?;
    Ok(value)
}
