//! HTTP client for the photopress upload service.
//!
//! `ApiClient` talks to the credential service and to the object-storage
//! endpoint named by each credential. The orchestrator sequences those two
//! calls for one submission and the form controller adds validation and the
//! submission state machine on top.

pub mod api;
pub mod controller;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use photopress_core::ClientConfig;
use reqwest::Client;
use std::time::Duration;

pub use controller::FormController;
pub use orchestrator::{UploadOrchestrator, UploadTransport};

/// Credential endpoint, relative to the API base URL.
pub const CREDENTIAL_PATH: &str = "/get-presigned-url";

/// Multipart key the storage endpoint expects the file under.
pub const FILE_FIELD: &str = "file";

/// HTTP client for the credential service and the storage endpoint.
///
/// The client has no cookie store, and the API key is only attached to
/// requests sent to the credential service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Create client from environment: PHOTOPRESS_API_URL (or API_URL), optional
    /// PHOTOPRESS_API_KEY (or API_KEY).
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// Raw client for custom requests. No auth is applied.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
