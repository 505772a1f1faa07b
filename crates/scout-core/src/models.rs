//! Upstream records and the app-facing shapes they are reshaped into.
//!
//! Fleet API fields that are only passed through stay as raw JSON, so an
//! unexpected type on one record never fails the whole response.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conditions::{UnitSystem, WeatherObservation};

// === Fleet API records ===

/// A flight as returned by the fleet API (`/api/v0/flight/{id}` and the
/// flights list).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetFlight {
    pub flight_id: Option<Value>,
    pub vehicle_serial: Option<Value>,
    pub battery_serial: Option<Value>,
    pub user_email: Option<Value>,
    pub takeoff: Option<Value>,
    pub landing: Option<Value>,
    pub has_telemetry: Option<Value>,
    pub takeoff_latitude: Option<Value>,
    pub takeoff_longitude: Option<Value>,
    pub attachments: Option<Value>,
    pub sensor_package: Option<Value>,
}

impl FleetFlight {
    pub fn resolved_id(&self) -> Option<String> {
        self.flight_id.as_ref().and_then(id_text)
    }
}

/// A media or log file attached to a flight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetDataFile {
    pub file_id: Option<Value>,
    pub id: Option<Value>,
    pub file_name: Option<Value>,
    pub file_type: Option<Value>,
    pub size_bytes: Option<Value>,
    pub created_at: Option<Value>,
    pub metadata: Option<Value>,
}

impl FleetDataFile {
    /// `file_id`, falling back to `id`. Numeric IDs are rendered as strings.
    pub fn resolved_id(&self) -> Option<String> {
        [&self.file_id, &self.id]
            .into_iter()
            .flatten()
            .find_map(id_text)
    }
}

/// Non-empty strings and numbers; everything else counts as missing.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

// === App-facing shapes ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSummaryMetadata {
    pub vehicle_serial: Option<Value>,
    pub battery_serial: Option<Value>,
    pub user_email: Option<Value>,
    pub landing: Option<Value>,
    pub has_telemetry: Option<Value>,
    pub attachments: Option<Value>,
    pub sensor_package: Option<Value>,
}

/// Entry of the synced flight history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSummary {
    pub id: Option<Value>,
    pub name: String,
    pub created_at: Option<Value>,
    pub duration_seconds: i64,
    pub location: LatLon,
    /// Filled by a separate media fetch.
    pub media_urls: Vec<String>,
    pub metadata: FlightSummaryMetadata,
    pub synced: bool,
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value?.trim()).ok()
}

/// Whole seconds between takeoff and landing, 0 if either is unknown.
pub fn flight_duration_seconds(takeoff: Option<&str>, landing: Option<&str>) -> i64 {
    match (parse_timestamp(takeoff), parse_timestamp(landing)) {
        (Some(takeoff), Some(landing)) => (landing - takeoff).num_milliseconds().div_euclid(1000),
        _ => 0,
    }
}

impl FlightSummary {
    pub fn from_fleet(flight: &FleetFlight) -> Self {
        let serial = flight
            .vehicle_serial
            .as_ref()
            .and_then(id_text)
            .unwrap_or_else(|| "Drone".to_string());
        Self {
            id: flight.flight_id.clone(),
            name: format!("{} Flight", serial),
            created_at: flight.takeoff.clone(),
            duration_seconds: flight_duration_seconds(
                flight.takeoff.as_ref().and_then(Value::as_str),
                flight.landing.as_ref().and_then(Value::as_str),
            ),
            location: LatLon {
                lat: flight.takeoff_latitude.clone(),
                lon: flight.takeoff_longitude.clone(),
            },
            media_urls: Vec::new(),
            metadata: FlightSummaryMetadata {
                vehicle_serial: flight.vehicle_serial.clone(),
                battery_serial: flight.battery_serial.clone(),
                user_email: flight.user_email.clone(),
                landing: flight.landing.clone(),
                has_telemetry: flight.has_telemetry.clone(),
                attachments: flight.attachments.clone(),
                sensor_package: flight.sensor_package.clone(),
            },
            synced: true,
        }
    }
}

/// Flight metadata block of the flight-details response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetail {
    pub flight_id: String,
    pub vehicle_serial: Option<Value>,
    pub battery_serial: Option<Value>,
    pub user_email: Option<Value>,
    pub takeoff: Option<Value>,
    pub landing: Option<Value>,
    pub has_telemetry: Option<Value>,
    pub takeoff_latitude: Option<Value>,
    pub takeoff_longitude: Option<Value>,
    pub attachments: Option<Value>,
    pub sensor_package: Option<Value>,
}

impl FlightDetail {
    /// `requested_id` is used when the record carries no ID of its own.
    pub fn from_fleet(flight: &FleetFlight, requested_id: &str) -> Self {
        Self {
            flight_id: flight
                .resolved_id()
                .unwrap_or_else(|| requested_id.to_string()),
            vehicle_serial: flight.vehicle_serial.clone(),
            battery_serial: flight.battery_serial.clone(),
            user_email: flight.user_email.clone(),
            takeoff: flight.takeoff.clone(),
            landing: flight.landing.clone(),
            has_telemetry: flight.has_telemetry.clone(),
            takeoff_latitude: flight.takeoff_latitude.clone(),
            takeoff_longitude: flight.takeoff_longitude.clone(),
            attachments: flight.attachments.clone(),
            sensor_package: flight.sensor_package.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub file_id: Option<String>,
    pub file_name: Option<Value>,
    /// e.g. `VIDEO`, `PHOTO`, `LOG`
    pub file_type: Option<Value>,
    pub size_bytes: Option<Value>,
    pub created_at: Option<Value>,
    pub download_url: String,
    pub metadata: Value,
}

impl MediaItem {
    pub fn from_fleet(file: &FleetDataFile, api_base: &str) -> Self {
        let file_id = file.resolved_id();
        Self {
            download_url: format!(
                "{}/api/v0/flight_data_files/{}",
                api_base.trim_end_matches('/'),
                file_id.as_deref().unwrap_or_default()
            ),
            file_id,
            file_name: file.file_name.clone(),
            file_type: file.file_type.clone(),
            size_bytes: file.size_bytes.clone(),
            created_at: file.created_at.clone(),
            metadata: file
                .metadata
                .clone()
                .filter(|metadata| !metadata.is_null())
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

// === Weather provider records ===

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherCoord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherWind {
    pub speed: Option<f64>,
    pub gust: Option<f64>,
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherClouds {
    pub all: Option<f64>,
}

/// Current-weather payload from the weather provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: Option<String>,
    #[serde(default)]
    pub coord: WeatherCoord,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub main: WeatherMain,
    #[serde(default)]
    pub wind: WeatherWind,
    /// Meters.
    pub visibility: Option<f64>,
    #[serde(default)]
    pub clouds: WeatherClouds,
}

impl CurrentWeather {
    fn primary(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    pub fn observation(&self, units: UnitSystem) -> WeatherObservation {
        WeatherObservation {
            wind_speed: self.wind.speed,
            wind_gust: self.wind.gust,
            visibility_m: self.visibility,
            condition: self.primary().and_then(|condition| condition.main.clone()),
            temperature: self.main.temp,
            cloud_cover_pct: self.clouds.all,
            units,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Weather block of the weather response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: WeatherLocation,
    pub units: UnitSystem,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_direction: Option<f64>,
    pub visibility_meters: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

impl WeatherReport {
    pub fn from_current(current: &CurrentWeather, units: UnitSystem) -> Self {
        Self {
            location: WeatherLocation {
                name: current.name.clone(),
                lat: current.coord.lat,
                lon: current.coord.lon,
            },
            units,
            temperature: current.main.temp,
            feels_like: current.main.feels_like,
            humidity: current.main.humidity,
            wind_speed: current.wind.speed,
            wind_gust: current.wind.gust,
            wind_direction: current.wind.deg,
            visibility_meters: current.visibility,
            cloud_cover: current.clouds.all,
            condition: current.primary().and_then(|condition| condition.main.clone()),
            description: current
                .primary()
                .and_then(|condition| condition.description.clone()),
        }
    }
}
