//! Spatial math for track distances.

use serde::Serialize;

use crate::telemetry::TrackPoint;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const METERS_TO_MILES: f64 = 0.000621371;
pub const METERS_TO_FEET: f64 = 3.28084;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

fn point_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Distances accumulated over a whole track, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceMetrics {
    pub total_distance_meters: f64,
    pub max_distance_from_launch_meters: f64,
    pub longest_segment_meters: f64,
}

/// Walk consecutive pairs of the track.
///
/// The launch point is `track[0]`. A pair is skipped only when one of its
/// coordinates is not finite; `0.0` is a valid latitude or longitude.
pub fn compute_distance_metrics(track: &[TrackPoint]) -> DistanceMetrics {
    let mut metrics = DistanceMetrics::default();
    let Some(launch) = track.first() else {
        return metrics;
    };

    for pair in track.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if !prev.has_position() || !curr.has_position() {
            continue;
        }

        let segment = point_distance(prev, curr);
        metrics.total_distance_meters += segment;
        metrics.longest_segment_meters = metrics.longest_segment_meters.max(segment);

        if launch.has_position() {
            let from_launch = point_distance(launch, curr);
            metrics.max_distance_from_launch_meters =
                metrics.max_distance_from_launch_meters.max(from_launch);
        }
    }

    metrics
}

/// Total path length as reported under `_distance_traveled`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceTraveled {
    /// Meters.
    pub total: f64,
    pub miles: f64,
    pub kilometers: f64,
}

impl DistanceTraveled {
    pub fn from_meters(meters: f64) -> Self {
        Self {
            total: meters,
            miles: meters * METERS_TO_MILES,
            kilometers: meters / 1000.0,
        }
    }
}

/// A single extreme distance (furthest from launch, longest segment).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceExtent {
    pub meters: f64,
    pub kilometers: f64,
    pub miles: f64,
    pub feet: f64,
}

impl DistanceExtent {
    pub fn from_meters(meters: f64) -> Self {
        Self {
            meters,
            kilometers: meters / 1000.0,
            miles: meters * METERS_TO_MILES,
            feet: meters * METERS_TO_FEET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> TrackPoint {
        TrackPoint::new(0.0, lat, lon)
    }

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(33.6846, -117.8265, 33.6846, -117.8265);
        assert!(dist < 0.001);
    }

    #[test]
    fn haversine_is_symmetric() {
        let ab = haversine_distance(40.0, -74.0, 34.05, -118.25);
        let ba = haversine_distance(34.05, -118.25, 40.0, -74.0);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn short_north_step_is_about_111_meters() {
        let track = vec![point(40.0, -74.0), point(40.001, -74.0)];
        let metrics = compute_distance_metrics(&track);
        assert!((metrics.total_distance_meters - 111.19).abs() < 1.0);
        assert_eq!(metrics.longest_segment_meters, metrics.total_distance_meters);
        assert_eq!(
            metrics.max_distance_from_launch_meters,
            metrics.total_distance_meters
        );
    }

    #[test]
    fn identical_points_have_zero_distance() {
        let track = vec![point(40.0, -74.0), point(40.0, -74.0)];
        let metrics = compute_distance_metrics(&track);
        assert_eq!(metrics, DistanceMetrics::default());
    }

    #[test]
    fn single_point_and_empty_tracks_are_zero() {
        assert_eq!(compute_distance_metrics(&[]), DistanceMetrics::default());
        assert_eq!(
            compute_distance_metrics(&[point(40.0, -74.0)]),
            DistanceMetrics::default()
        );
    }

    #[test]
    fn out_and_back_separates_total_from_launch_distance() {
        let track = vec![
            point(40.0, -74.0),
            point(40.001, -74.0),
            point(40.002, -74.0),
            point(40.0, -74.0),
        ];
        let metrics = compute_distance_metrics(&track);
        assert!((metrics.total_distance_meters - 4.0 * 111.19).abs() < 2.0);
        assert!((metrics.max_distance_from_launch_meters - 2.0 * 111.19).abs() < 1.0);
        assert!((metrics.longest_segment_meters - 2.0 * 111.19).abs() < 1.0);
        assert!(metrics.longest_segment_meters <= metrics.total_distance_meters);
    }

    #[test]
    fn zero_coordinates_are_not_skipped() {
        let track = vec![point(0.0, 0.0), point(0.0, 0.001)];
        let metrics = compute_distance_metrics(&track);
        assert!(metrics.total_distance_meters > 100.0);
    }

    #[test]
    fn non_finite_pairs_are_skipped() {
        let track = vec![point(40.0, -74.0), point(f64::NAN, -74.0), point(40.001, -74.0)];
        let metrics = compute_distance_metrics(&track);
        assert_eq!(metrics.total_distance_meters, 0.0);
    }

    #[test]
    fn unit_conversions() {
        let traveled = DistanceTraveled::from_meters(1609.344);
        assert!((traveled.miles - 1.0).abs() < 1e-3);
        assert!((traveled.kilometers - 1.609344).abs() < 1e-9);

        let extent = DistanceExtent::from_meters(100.0);
        assert!((extent.feet - 328.084).abs() < 1e-9);
        assert!((extent.kilometers - 0.1).abs() < 1e-12);
    }
}
