//! Per-channel summary statistics over a normalized track.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::spatial::{DistanceExtent, DistanceMetrics, DistanceTraveled};
use crate::telemetry::{Channel, SampleValue, TrackPoint};

/// Summary of one channel's valid samples across the whole flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub start: f64,
    pub end: f64,
    /// `start - end`; positive when the value decreased over the flight.
    pub change: f64,
    pub count: usize,
    pub has_non_zero: bool,
}

impl FieldStats {
    /// Returns `None` when there are no samples.
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        let (&start, &end) = (values.first()?, values.last()?);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            min,
            max,
            avg,
            start,
            end,
            change: start - end,
            count: values.len(),
            has_non_zero: values.iter().any(|value| *value != 0.0),
        })
    }
}

fn numeric_sample(channel: &Channel, value: &SampleValue) -> Option<f64> {
    let number = match value {
        SampleValue::Scalar(number) => *number,
        SampleValue::Vector(_) if channel.is_vector() => value.magnitude()?,
        _ => return None,
    };
    (!number.is_nan()).then_some(number)
}

/// Numeric samples of one channel in track order, nulls and `NaN` removed.
pub fn channel_samples(track: &[TrackPoint], channel: &Channel) -> Vec<f64> {
    track
        .iter()
        .filter_map(|point| point.get(channel))
        .filter_map(|value| numeric_sample(channel, value))
        .collect()
}

/// Compute stats for each requested channel.
///
/// Channels with no valid samples are left out of the result.
pub fn compute_field_stats<'a, I>(track: &[TrackPoint], channels: I) -> BTreeMap<String, FieldStats>
where
    I: IntoIterator<Item = &'a Channel>,
{
    channels
        .into_iter()
        .filter(|channel| **channel != Channel::Gps)
        .filter_map(|channel| {
            let samples = channel_samples(track, channel);
            FieldStats::from_samples(&samples).map(|stats| (channel.to_string(), stats))
        })
        .collect()
}

/// The `stats` object: per-channel stats plus the synthetic distance keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryStats {
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldStats>,
    #[serde(rename = "_distance_traveled")]
    pub distance_traveled: DistanceTraveled,
    #[serde(rename = "_max_distance_from_launch")]
    pub max_distance_from_launch: DistanceExtent,
    #[serde(rename = "_longest_segment")]
    pub longest_segment: DistanceExtent,
}

impl TelemetryStats {
    pub fn new(fields: BTreeMap<String, FieldStats>, distances: &DistanceMetrics) -> Self {
        Self {
            fields,
            distance_traveled: DistanceTraveled::from_meters(distances.total_distance_meters),
            max_distance_from_launch: DistanceExtent::from_meters(
                distances.max_distance_from_launch_meters,
            ),
            longest_segment: DistanceExtent::from_meters(distances.longest_segment_meters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(channel: Channel, values: Vec<SampleValue>) -> Vec<TrackPoint> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                TrackPoint::new(i as f64, 40.0, -74.0).with_field(channel.clone(), value)
            })
            .collect()
    }

    #[test]
    fn scalar_stats() {
        let track = track_with(
            Channel::BatteryPercentage,
            vec![
                SampleValue::Scalar(95.0),
                SampleValue::Absent,
                SampleValue::Scalar(80.0),
                SampleValue::Scalar(60.0),
            ],
        );

        let stats = compute_field_stats(&track, [&Channel::BatteryPercentage]);
        let battery = &stats["battery_percentage"];
        assert_eq!(battery.count, 3);
        assert_eq!(battery.min, 60.0);
        assert_eq!(battery.max, 95.0);
        assert!((battery.avg - 78.333_333).abs() < 1e-3);
        assert_eq!(battery.start, 95.0);
        assert_eq!(battery.end, 60.0);
        assert_eq!(battery.change, 35.0);
        assert!(battery.has_non_zero);
    }

    #[test]
    fn all_null_channel_is_omitted() {
        let track = track_with(Channel::Heading, vec![SampleValue::Absent, SampleValue::Absent]);
        let stats = compute_field_stats(&track, [&Channel::Heading]);
        assert!(stats.is_empty());
    }

    #[test]
    fn velocity_vectors_use_magnitude() {
        let track = track_with(Channel::Velocity, vec![SampleValue::Vector(vec![3.0, 4.0])]);
        let stats = compute_field_stats(&track, [&Channel::Velocity]);
        assert_eq!(stats["velocity"].avg, 5.0);
        assert_eq!(stats["velocity"].max, 5.0);
    }

    #[test]
    fn malformed_velocity_is_filtered() {
        let track = track_with(
            Channel::Velocity,
            vec![
                SampleValue::Vector(vec![f64::NAN, 1.0]),
                SampleValue::Vector(vec![0.0, 2.0, 0.0]),
            ],
        );
        let stats = compute_field_stats(&track, [&Channel::Velocity]);
        assert_eq!(stats["velocity"].count, 1);
        assert_eq!(stats["velocity"].start, 2.0);
    }

    #[test]
    fn vectors_on_scalar_channels_are_not_numeric() {
        let track = track_with(Channel::Heading, vec![SampleValue::Vector(vec![1.0, 2.0])]);
        assert!(compute_field_stats(&track, [&Channel::Heading]).is_empty());
    }

    #[test]
    fn all_zero_channel_reports_no_non_zero() {
        let track = track_with(
            Channel::Altitude,
            vec![SampleValue::Scalar(0.0), SampleValue::Scalar(0.0)],
        );
        let stats = compute_field_stats(&track, [&Channel::Altitude]);
        assert!(!stats["altitude"].has_non_zero);
    }

    #[test]
    fn gps_is_never_a_stats_key() {
        let track = track_with(Channel::Gps, vec![SampleValue::Scalar(1.0)]);
        assert!(compute_field_stats(&track, [&Channel::Gps]).is_empty());
    }

    #[test]
    fn stats_serialize_with_distance_keys() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "heading".to_string(),
            FieldStats::from_samples(&[1.0, 3.0]).expect("stats"),
        );
        let distances = DistanceMetrics {
            total_distance_meters: 1000.0,
            max_distance_from_launch_meters: 400.0,
            longest_segment_meters: 250.0,
        };

        let value = serde_json::to_value(TelemetryStats::new(fields, &distances)).expect("json");
        assert_eq!(value["heading"]["hasNonZero"], true);
        assert_eq!(value["heading"]["change"], -2.0);
        assert_eq!(value["_distance_traveled"]["total"], 1000.0);
        assert_eq!(value["_distance_traveled"]["kilometers"], 1.0);
        assert_eq!(value["_max_distance_from_launch"]["meters"], 400.0);
        assert_eq!(value["_longest_segment"]["meters"], 250.0);
    }
}
