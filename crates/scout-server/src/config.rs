//! Server configuration from environment.

use std::env;

use scout_cloud::{DEFAULT_FLEET_API_BASE, DEFAULT_WEATHER_API_BASE};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub fleet_api_base: String,
    /// Organization API token, forwarded verbatim.
    pub fleet_api_token: Option<String>,
    pub weather_api_base: String,
    pub weather_api_key: Option<String>,
    pub upstream_timeout_s: u64,
    pub flights_page_size: u32,
    pub flights_max_pages: u32,
    pub log_json: bool,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env_parse("SCOUT_PORT", 8787),
            fleet_api_base: env::var("SKYDIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_FLEET_API_BASE.to_string()),
            fleet_api_token: env_secret("SKYDIO_API_TOKEN"),
            weather_api_base: env::var("WEATHER_API_BASE")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_BASE.to_string()),
            weather_api_key: env_secret("WEATHER_API_KEY"),
            upstream_timeout_s: env_parse("SCOUT_UPSTREAM_TIMEOUT_S", 10),
            flights_page_size: env_parse("SCOUT_FLIGHTS_PAGE_SIZE", 50).max(1),
            flights_max_pages: env_parse("SCOUT_FLIGHTS_MAX_PAGES", 1).max(1),
            log_json: env::var("SCOUT_LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}
