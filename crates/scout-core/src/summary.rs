//! Telemetry block of the flight-details response.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::report::{build_field_report, FieldReport};
use crate::spatial::compute_distance_metrics;
use crate::stats::{compute_field_stats, TelemetryStats};
use crate::telemetry::{normalize_track, TelemetryRecord, TrackPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySummary {
    pub track: Vec<TrackPoint>,
    pub point_count: usize,
    pub stats: TelemetryStats,
    pub field_report: FieldReport,
}

/// Run the full reduction over a raw `flight_telemetry` object.
///
/// Returns `None` when the payload has no usable GPS channel.
pub fn summarize_telemetry(raw: &Map<String, Value>) -> Option<TelemetrySummary> {
    let record = TelemetryRecord::from_json(raw);
    let track = normalize_track(&record)?;

    let fields = compute_field_stats(&track, record.instrument_channels().map(|(channel, _)| channel));
    let distances = compute_distance_metrics(&track);

    Some(TelemetrySummary {
        point_count: track.len(),
        stats: TelemetryStats::new(fields, &distances),
        field_report: build_field_report(raw),
        track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "gps": {
                "data": [[40.0, -74.0], [40.001, -74.0], [40.002, -74.0]],
                "timestamps": [100.0, 101.0, 102.0]
            },
            "altitude": { "data": [999.0, 30.0, 45.0], "timestamps": [100.0, 101.0, 102.0] },
            "velocity": { "data": [[0.0, 0.0], [3.0, 4.0], null], "timestamps": [100.0, 101.0, 102.0] },
            "heading": { "data": [null, null, null], "timestamps": [100.0, 101.0, 102.0] }
        })
    }

    #[test]
    fn summarizes_track_stats_and_distances() {
        let payload = sample_payload();
        let summary = summarize_telemetry(payload.as_object().expect("object")).expect("summary");

        assert_eq!(summary.point_count, 3);
        let altitude = &summary.stats.fields["altitude"];
        assert_eq!(altitude.count, 2);
        assert_eq!(altitude.start, 30.0);
        assert_eq!(summary.stats.fields["velocity"].max, 5.0);
        assert!(!summary.stats.fields.contains_key("heading"));
        assert!((summary.stats.distance_traveled.total - 222.39).abs() < 1.0);
        assert_eq!(summary.field_report.field_count, 4);
    }

    #[test]
    fn summary_is_deterministic() {
        let payload = sample_payload();
        let raw = payload.as_object().expect("object");
        assert_eq!(summarize_telemetry(raw), summarize_telemetry(raw));
    }

    #[test]
    fn serializes_wire_shape() {
        let payload = sample_payload();
        let summary = summarize_telemetry(payload.as_object().expect("object")).expect("summary");
        let value = serde_json::to_value(&summary).expect("json");

        assert_eq!(value["pointCount"], 3);
        assert_eq!(value["track"][0]["altitude"], Value::Null);
        assert_eq!(value["track"][1]["velocity"], json!([3.0, 4.0]));
        assert!(value["stats"]["_longest_segment"]["feet"].as_f64().is_some());
        assert!(value["fieldReport"]["analysis"]["gps"].is_object());
    }

    #[test]
    fn no_gps_no_summary() {
        let payload = json!({ "altitude": { "data": [1.0], "timestamps": [0.0] } });
        assert!(summarize_telemetry(payload.as_object().expect("object")).is_none());
    }
}
