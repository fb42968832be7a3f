//! Configuration module
//!
//! Client configuration is read from the environment (and a `.env` file when
//! present). Every setting except the API endpoint has a default.

use std::env;

pub const MIB: u64 = 1024 * 1024;

// Common constants
const MAX_FILE_SIZE_MB: u64 = 10;
const ALLOWED_CONTENT_TYPES: &str = "image/png,image/jpeg,image/jpg";
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Client-side limits applied to the selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * MIB,
            allowed_content_types: parse_list(ALLOWED_CONTENT_TYPES),
        }
    }
}

impl UploadLimits {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?;

        let allowed_content_types = parse_list(
            &lookup("ALLOWED_CONTENT_TYPES").unwrap_or_else(|| ALLOWED_CONTENT_TYPES.to_string()),
        );

        let max_file_size_bytes = max_file_size_mb
            .checked_mul(MIB)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let limits = UploadLimits {
            max_file_size_bytes,
            allowed_content_types,
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        Ok(())
    }

    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.trim().to_lowercase();
        self.allowed_content_types.iter().any(|ct| *ct == normalized)
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the credential service; `/get-presigned-url` is appended.
    pub api_url: String,
    /// Sent as `X-API-Key` to the credential service only.
    pub api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub limits: UploadLimits,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            limits: UploadLimits::default(),
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("PHOTOPRESS_API_URL")
            .or_else(|| lookup("API_URL"))
            .ok_or_else(|| anyhow::anyhow!("PHOTOPRESS_API_URL or API_URL must be set"))?;

        let api_key = lookup("PHOTOPRESS_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|s| !s.trim().is_empty());

        let limits = UploadLimits::from_lookup(&lookup)?;

        let http_timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid number"))?;

        let config = ClientConfig {
            api_url: api_url.trim().to_string(),
            api_key,
            http_timeout_secs,
            limits,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PHOTOPRESS_API_URL must be an http:// or https:// URL, got '{}'",
                self.api_url
            ));
        }

        self.limits.validate()?;

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
