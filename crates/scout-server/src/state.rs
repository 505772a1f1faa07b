//! Shared, immutable application state.

use anyhow::Result;
use std::time::Duration;

use scout_cloud::{FleetClient, WeatherClient};

use crate::config::Config;

/// Application state - configuration plus upstream clients.
///
/// Nothing here is mutated after startup; requests share it through an `Arc`.
pub struct AppState {
    config: Config,
    fleet: FleetClient,
    weather: Option<WeatherClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.upstream_timeout_s);
        let fleet = FleetClient::new(
            config.fleet_api_base.clone(),
            config.fleet_api_token.clone(),
            timeout,
        )?;
        let weather = config
            .weather_api_key
            .as_deref()
            .map(|key| WeatherClient::new(config.weather_api_base.clone(), key, timeout))
            .transpose()?;

        Ok(Self {
            config,
            fleet,
            weather,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fleet(&self) -> &FleetClient {
        &self.fleet
    }

    /// `None` when no weather API key is configured.
    pub fn weather(&self) -> Option<&WeatherClient> {
        self.weather.as_ref()
    }
}
