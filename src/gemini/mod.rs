//! Gemini image generation client
//!
//! [`Client`] carries resolved connection settings and hands out resources
//! bound to itself. [`ClientFactory`] resolves those settings from explicit
//! overrides and a loaded [`Config`].

pub mod images;
pub mod mime;
pub mod response;

pub use images::{GenerateOptions, Images};
pub use response::GenerateResponse;

use crate::config::{Config, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;

/// Immutable Gemini REST client. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    timeout: u64,
    model: String,
    pub(crate) http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: u64) -> Self {
        Self::new_with_client(base_url, api_key, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: u64,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: api_key.into(),
            timeout,
            model: DEFAULT_MODEL.to_string(),
            http,
        }
    }

    pub fn factory() -> ClientFactory {
        ClientFactory::default()
    }

    /// Use a different model ID. A leading `models/` segment is dropped.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = model.strip_prefix("models/").unwrap_or(&model).to_string();
        self
    }

    pub fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Per-request timeout in seconds. Zero disables the timeout.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Fluent builder resolving client settings.
///
/// Precedence per field: explicit override, then the loaded [`Config`], then
/// the hardcoded default.
#[derive(Debug, Clone, Default)]
pub struct ClientFactory {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<u64>,
    model: Option<String>,
    http: Option<reqwest::Client>,
}

impl ClientFactory {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Reuse an existing HTTP connection pool.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn make(self, config: &Config) -> Client {
        let base_url = self
            .base_url
            .or_else(|| config.base_url.clone())
            .unwrap_or_default();
        let api_key = self
            .api_key
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();
        let timeout = self
            .timeout
            .or(config.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let model = self
            .model
            .or_else(|| Some(config.model.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        tracing::debug!(base_url = %base_url, model = %model, timeout, "Resolved Gemini client");

        Client::new_with_client(base_url, api_key, timeout, self.http.unwrap_or_default())
            .with_model(model)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> Config {
        Config {
            base_url: None,
            api_key: None,
            timeout: None,
            ..Config::default()
        }
    }

    #[test]
    fn test_factory_overrides_win_and_trim_base_url() {
        let config = Config {
            base_url: Some("https://conf.example.test".to_string()),
            api_key: Some("from-config".to_string()),
            timeout: Some(77),
            ..Config::default()
        };

        let client = Client::factory()
            .with_base_url("https://api.example.test/")
            .with_api_key("abc123")
            .with_timeout(42)
            .make(&config);

        assert_eq!(client.base_url(), "https://api.example.test");
        assert_eq!(client.api_key(), "abc123");
        assert_eq!(client.timeout(), 42);
    }

    #[test]
    fn test_factory_falls_back_to_config() {
        let config = Config {
            base_url: Some("https://conf.example.test/".to_string()),
            api_key: Some("from-config".to_string()),
            timeout: Some(77),
            model: "gemini-3-pro-image-preview".to_string(),
            ..Config::default()
        };

        let client = Client::factory().make(&config);

        assert_eq!(client.base_url(), "https://conf.example.test");
        assert_eq!(client.api_key(), "from-config");
        assert_eq!(client.timeout(), 77);
        assert_eq!(client.model(), "gemini-3-pro-image-preview");
    }

    #[test]
    fn test_factory_hardcoded_defaults() {
        let client = Client::factory().make(&empty_config());

        assert_eq!(client.base_url(), "");
        assert_eq!(client.api_key(), "");
        assert_eq!(client.timeout(), 60);
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_direct_construction_normalizes_base_url() {
        let client = Client::new("https://x/", "key", 30);
        assert_eq!(client.base_url(), "https://x");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_with_model_strips_prefix() {
        let client = Client::new("https://x", "key", 30).with_model("models/gemini-2.5-flash-image");
        assert_eq!(client.model(), "gemini-2.5-flash-image");
    }

    #[test]
    fn test_zero_timeout_disables_request_timeout() {
        assert_eq!(Client::new("https://x", "k", 0).request_timeout(), None);
        assert_eq!(
            Client::new("https://x", "k", 5).request_timeout(),
            Some(Duration::from_secs(5))
        );
    }
}
