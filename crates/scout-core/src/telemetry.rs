//! Telemetry normalization.
//!
//! The fleet API delivers telemetry as independent channels, each with a
//! `data` array and a `timestamps` array aligned by index to the `gps`
//! channel. This module resolves those channels once into typed samples and
//! merges them into a single ordered track.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Known telemetry channels.
///
/// Channels the fleet API adds later are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Gps,
    Altitude,
    Velocity,
    Heading,
    BatteryPercentage,
    Other(String),
}

impl Channel {
    pub fn from_name(name: &str) -> Self {
        match name {
            "gps" => Channel::Gps,
            "altitude" => Channel::Altitude,
            "velocity" => Channel::Velocity,
            "heading" => Channel::Heading,
            "battery_percentage" => Channel::BatteryPercentage,
            other => Channel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Channel::Gps => "gps",
            Channel::Altitude => "altitude",
            Channel::Velocity => "velocity",
            Channel::Heading => "heading",
            Channel::BatteryPercentage => "battery_percentage",
            Channel::Other(name) => name,
        }
    }

    /// Channels whose samples are multi-axis vectors reduced to a magnitude.
    pub fn is_vector(&self) -> bool {
        matches!(self, Channel::Velocity)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One sample of a telemetry channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleValue {
    Scalar(f64),
    /// Multi-axis sample. Non-numeric components are kept as `NaN`.
    Vector(Vec<f64>),
    #[default]
    Absent,
}

impl SampleValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => number
                .as_f64()
                .map(SampleValue::Scalar)
                .unwrap_or(SampleValue::Absent),
            Some(Value::Array(items)) => SampleValue::Vector(
                items
                    .iter()
                    .map(|item| item.as_f64().unwrap_or(f64::NAN))
                    .collect(),
            ),
            _ => SampleValue::Absent,
        }
    }

    /// Euclidean magnitude of a vector sample (`sqrt(sum of squares)`).
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            SampleValue::Vector(components) => {
                Some(components.iter().map(|c| c * c).sum::<f64>().sqrt())
            }
            _ => None,
        }
    }

    /// Interpret a `[lat, lon]` pair. Both components must be finite.
    pub fn as_coordinate(&self) -> Option<(f64, f64)> {
        match self {
            SampleValue::Vector(components) if components.len() >= 2 => {
                let (lat, lon) = (components[0], components[1]);
                (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
            }
            _ => None,
        }
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SampleValue::Scalar(value) if value.is_finite() => serializer.serialize_f64(*value),
            SampleValue::Scalar(_) | SampleValue::Absent => serializer.serialize_none(),
            SampleValue::Vector(components) => {
                let mut seq = serializer.serialize_seq(Some(components.len()))?;
                for component in components {
                    if component.is_finite() {
                        seq.serialize_element(component)?;
                    } else {
                        seq.serialize_element(&Option::<f64>::None)?;
                    }
                }
                seq.end()
            }
        }
    }
}

/// A raw telemetry channel as delivered by the fleet API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTelemetryField {
    /// `None` when the channel carries no `data` array at all.
    pub data: Option<Vec<SampleValue>>,
    pub timestamps: Vec<f64>,
}

impl RawTelemetryField {
    /// Parse a channel object. Returns `None` for non-object entries.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let data = object.get("data").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .map(|item| SampleValue::from_json(Some(item)))
                .collect()
        });
        let timestamps = object
            .get("timestamps")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| item.as_f64().unwrap_or(f64::NAN))
                    .collect()
            })
            .unwrap_or_default();
        Some(Self { data, timestamps })
    }

    pub fn sample(&self, index: usize) -> SampleValue {
        self.data
            .as_ref()
            .and_then(|data| data.get(index))
            .cloned()
            .unwrap_or_default()
    }
}

/// The `flight_telemetry` object, resolved into typed channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryRecord {
    channels: BTreeMap<Channel, RawTelemetryField>,
}

impl TelemetryRecord {
    pub fn from_json(raw: &Map<String, Value>) -> Self {
        let channels = raw
            .iter()
            .filter_map(|(name, value)| {
                RawTelemetryField::from_json(value).map(|field| (Channel::from_name(name), field))
            })
            .collect();
        Self { channels }
    }

    pub fn channel(&self, channel: &Channel) -> Option<&RawTelemetryField> {
        self.channels.get(channel)
    }

    /// Channels other than `gps` that carry a `data` array.
    pub fn instrument_channels(&self) -> impl Iterator<Item = (&Channel, &RawTelemetryField)> {
        self.channels
            .iter()
            .filter(|(channel, field)| **channel != Channel::Gps && field.data.is_some())
    }
}

/// One position of the reconstructed flight track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub timestamp: f64,
    pub lat: f64,
    pub lon: f64,
    pub fields: BTreeMap<Channel, SampleValue>,
}

impl TrackPoint {
    pub fn new(timestamp: f64, lat: f64, lon: f64) -> Self {
        Self {
            timestamp,
            lat,
            lon,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, channel: Channel, value: SampleValue) -> Self {
        self.fields.insert(channel, value);
        self
    }

    pub fn get(&self, channel: &Channel) -> Option<&SampleValue> {
        self.fields.get(channel)
    }

    pub fn has_position(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl Serialize for TrackPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.fields.len()))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("lat", &self.lat)?;
        map.serialize_entry("lon", &self.lon)?;
        for (channel, value) in &self.fields {
            map.serialize_entry(channel.as_str(), value)?;
        }
        map.end()
    }
}

/// Merge all channels into one track keyed on the GPS series.
///
/// Returns `None` when there is no usable GPS channel. GPS indices without a
/// valid `[lat, lon]` pair produce no point. The first altitude sample is
/// always reported as missing.
pub fn normalize_track(telemetry: &TelemetryRecord) -> Option<Vec<TrackPoint>> {
    let gps = telemetry.channel(&Channel::Gps)?;
    let gps_data = gps.data.as_deref()?;
    if gps.timestamps.is_empty() {
        return None;
    }

    let instruments: Vec<(&Channel, &RawTelemetryField)> =
        telemetry.instrument_channels().collect();

    let track = gps
        .timestamps
        .iter()
        .enumerate()
        .filter_map(|(index, &timestamp)| {
            let (lat, lon) = gps_data.get(index)?.as_coordinate()?;
            let fields = instruments
                .iter()
                .map(|(channel, field)| {
                    let value = if **channel == Channel::Altitude && index == 0 {
                        SampleValue::Absent
                    } else {
                        field.sample(index)
                    };
                    ((*channel).clone(), value)
                })
                .collect();
            Some(TrackPoint {
                timestamp,
                lat,
                lon,
                fields,
            })
        })
        .collect();

    Some(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TelemetryRecord {
        TelemetryRecord::from_json(value.as_object().expect("object"))
    }

    #[test]
    fn missing_gps_yields_no_track() {
        let telemetry = record(json!({
            "altitude": { "data": [1.0, 2.0], "timestamps": [0.0, 1.0] }
        }));
        assert!(normalize_track(&telemetry).is_none());
    }

    #[test]
    fn gps_without_timestamps_yields_no_track() {
        let telemetry = record(json!({
            "gps": { "data": [[40.0, -74.0]], "timestamps": [] }
        }));
        assert!(normalize_track(&telemetry).is_none());
    }

    #[test]
    fn merges_channels_by_index() {
        let telemetry = record(json!({
            "gps": {
                "data": [[40.0, -74.0], [40.001, -74.0], [40.002, -74.0]],
                "timestamps": [10.0, 11.0, 12.0]
            },
            "heading": { "data": [90.0, null, 92.0], "timestamps": [10.0, 11.0, 12.0] },
            "velocity": { "data": [[1.0, 0.0], [3.0, 4.0]], "timestamps": [10.0, 11.0] }
        }));

        let track = normalize_track(&telemetry).expect("track");
        assert_eq!(track.len(), 3);
        assert_eq!(track[1].timestamp, 11.0);
        assert_eq!(track[1].lat, 40.001);
        assert_eq!(track[0].get(&Channel::Heading), Some(&SampleValue::Scalar(90.0)));
        assert_eq!(track[1].get(&Channel::Heading), Some(&SampleValue::Absent));
        assert_eq!(
            track[1].get(&Channel::Velocity),
            Some(&SampleValue::Vector(vec![3.0, 4.0]))
        );
        // Shorter channel: no carry-forward.
        assert_eq!(track[2].get(&Channel::Velocity), Some(&SampleValue::Absent));
    }

    #[test]
    fn first_altitude_sample_is_dropped() {
        let telemetry = record(json!({
            "gps": { "data": [[40.0, -74.0], [40.0, -74.0]], "timestamps": [0.0, 1.0] },
            "altitude": { "data": [120.0, 35.5], "timestamps": [0.0, 1.0] }
        }));

        let track = normalize_track(&telemetry).expect("track");
        assert_eq!(track[0].get(&Channel::Altitude), Some(&SampleValue::Absent));
        assert_eq!(track[1].get(&Channel::Altitude), Some(&SampleValue::Scalar(35.5)));
    }

    #[test]
    fn points_without_gps_are_skipped() {
        let telemetry = record(json!({
            "gps": { "data": [[40.0, -74.0], null, [0.0, 0.0]], "timestamps": [0.0, 1.0, 2.0] }
        }));

        let track = normalize_track(&telemetry).expect("track");
        assert_eq!(track.len(), 2);
        assert_eq!((track[1].lat, track[1].lon), (0.0, 0.0));
    }

    #[test]
    fn non_object_entries_and_data_less_channels_are_ignored() {
        let telemetry = record(json!({
            "gps": { "data": [[40.0, -74.0]], "timestamps": [0.0] },
            "units": "metric",
            "heading": { "timestamps": [0.0] }
        }));

        let track = normalize_track(&telemetry).expect("track");
        assert!(track[0].fields.is_empty());
    }

    #[test]
    fn unknown_channels_pass_through() {
        let telemetry = record(json!({
            "gps": { "data": [[40.0, -74.0]], "timestamps": [0.0] },
            "gimbal_pitch": { "data": [-12.5], "timestamps": [0.0] }
        }));

        let track = normalize_track(&telemetry).expect("track");
        let channel = Channel::from_name("gimbal_pitch");
        assert_eq!(track[0].get(&channel), Some(&SampleValue::Scalar(-12.5)));
    }

    #[test]
    fn track_point_serializes_flat() {
        let point = TrackPoint::new(5.0, 40.0, -74.0)
            .with_field(Channel::Altitude, SampleValue::Absent)
            .with_field(Channel::Velocity, SampleValue::Vector(vec![1.0, f64::NAN]));

        let value = serde_json::to_value(&point).expect("serialize");
        assert_eq!(
            value,
            json!({
                "timestamp": 5.0,
                "lat": 40.0,
                "lon": -74.0,
                "altitude": null,
                "velocity": [1.0, null]
            })
        );
    }

    #[test]
    fn malformed_vector_components_become_nan() {
        let sample = SampleValue::from_json(Some(&json!([1.0, "x"])));
        let magnitude = sample.magnitude().expect("vector");
        assert!(magnitude.is_nan());
    }
}
