//! Client for the generative weather lookup.

use std::sync::Arc;
use std::time::Duration;

use fastweather_core::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use fastweather_core::Config;
use reqwest::Client;
use tracing::instrument;

use crate::api::{extract_text, GenerateContentRequest};
use crate::error::QueryError;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{WeatherQuery, WeatherResult};

/// Plain connection parameters, injected by whoever owns configuration
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub model: String,
    /// Sent as the `key` query parameter; may be empty
    pub api_key: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            model: config.api.model.clone(),
            api_key: config.api.api_key.clone(),
            timeout: Duration::from_secs(config.api.timeout_secs),
            retry: RetryConfig::from(&config.retry),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherQueryClient {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
    retry: RetryConfig,
}

impl WeatherQueryClient {
    /// # Errors
    /// `Transport` if the HTTP client cannot be built.
    pub fn new(settings: ClientSettings) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            settings.model
        );

        Ok(Self {
            client: Arc::new(client),
            endpoint,
            api_key: settings.api_key,
            retry: settings.retry,
        })
    }

    /// Endpoint URL, without the key parameter
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up the weather for `city`.
    ///
    /// Blank input fails with `EmptyInput` before any request is sent.
    ///
    /// # Errors
    /// See [`QueryError`]; every variant except `Cancelled` can come from here.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherResult, QueryError> {
        let query = WeatherQuery::new(city)?;
        self.fetch(&query).await
    }

    /// # Errors
    /// See [`QueryError`].
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResult, QueryError> {
        let payload = GenerateContentRequest::for_query(query);
        tracing::debug!("Requesting weather for {} from {}", query.city(), self.endpoint);

        let response = with_retry(&self.retry, || {
            self.client
                .post(&self.endpoint)
                .query(&[("key", self.api_key.as_str())])
                .json(&payload)
                .send()
        })
        .await?;

        let body = response.text().await?;
        let text = extract_text(&body)?;
        let result = WeatherResult::from_payload_text(&text)?;

        tracing::info!(
            "Fetched weather for {}: {} ({})",
            query.city(),
            result.location,
            result.theme()
        );
        Ok(result)
    }
}
