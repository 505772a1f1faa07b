//! Weather provider HTTP client (OpenWeather-compatible current weather).

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use scout_core::conditions::UnitSystem;
use scout_core::models::CurrentWeather;

use crate::client::read_success_json;

pub const DEFAULT_WEATHER_API_BASE: &str = "https://api.openweathermap.org";

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Fetch current conditions at a coordinate, in the requested units.
    pub async fn fetch_current(&self, lat: f64, lon: f64, units: UnitSystem) -> Result<CurrentWeather> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!("Fetching weather at {:.4},{:.4} ({})", lat, lon, units.as_str());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.as_str().to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .context("Failed to fetch weather")?;

        let payload = read_success_json(response, "Weather API error").await?;
        serde_json::from_value(payload).context("Failed to parse weather response")
    }
}
