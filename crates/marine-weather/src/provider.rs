//! StormGlass point API client.

use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::location::Coordinates;
use crate::types::{FetchError, ProviderPayload};

const STORMGLASS_API_BASE: &str = "https://api.stormglass.io";
const POINT_PATH: &str = "/v2/weather/point";
/// Measurements requested from the provider, in query order.
pub const REQUESTED_PARAMS: &str = "waveHeight,windSpeed,swellHeight,swellPeriod";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct StormGlassProvider {
    client: Client,
    base_url: String,
}

impl StormGlassProvider {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(STORMGLASS_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Provider against a custom endpoint (mock servers, proxies).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch hourly observations for `coords`.
    ///
    /// Issues exactly one request; nothing is retried.
    #[instrument(skip(self, credential), level = "info")]
    pub async fn fetch(
        &self,
        coords: Coordinates,
        credential: &str,
    ) -> Result<ProviderPayload, FetchError> {
        if credential.trim().is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let url = format!("{}{}", self.base_url, POINT_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[("lat", coords.latitude()), ("lng", coords.longitude())])
            .query(&[("params", REQUESTED_PARAMS)])
            .header("Authorization", credential)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("StormGlass returned status {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let payload: ProviderPayload =
            serde_json::from_str(&text).map_err(|e| FetchError::Malformed(e.to_string()))?;

        tracing::debug!(
            "StormGlass returned {} hourly records",
            payload.hours.as_ref().map_or(0, Vec::len)
        );
        Ok(payload)
    }
}
