//! DroneScout core: pure telemetry reduction and flying-conditions logic.
//!
//! Nothing in this crate performs I/O or fails; degenerate inputs degrade to
//! `None` or empty outputs.

pub mod conditions;
pub mod models;
pub mod report;
pub mod rules;
pub mod spatial;
pub mod stats;
pub mod summary;
pub mod telemetry;

pub use conditions::{
    assess_flying_conditions, assess_with_rules, FlightRiskAssessment, RiskLevel, UnitSystem,
    WeatherObservation,
};
pub use models::{
    CurrentWeather, FleetDataFile, FleetFlight, FlightDetail, FlightSummary, MediaItem,
    WeatherReport,
};
pub use report::{build_field_report, FieldReport};
pub use rules::FlyingRules;
pub use spatial::{compute_distance_metrics, haversine_distance, DistanceMetrics};
pub use stats::{compute_field_stats, FieldStats, TelemetryStats};
pub use summary::{summarize_telemetry, TelemetrySummary};
pub use telemetry::{normalize_track, Channel, RawTelemetryField, SampleValue, TelemetryRecord, TrackPoint};
