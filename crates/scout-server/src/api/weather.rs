//! Current weather with a flying-conditions assessment.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use scout_core::conditions::{assess_flying_conditions, FlightRiskAssessment, UnitSystem};
use scout_core::models::WeatherReport;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
    /// `imperial` (default) or `metric`
    pub units: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub success: bool,
    pub weather: WeatherReport,
    pub flying_conditions: FlightRiskAssessment,
}

fn validate(query: &WeatherQuery) -> ApiResult<UnitSystem> {
    if !query.lat.is_finite() || !(-90.0..=90.0).contains(&query.lat) {
        return Err(ApiError::BadRequest("Latitude out of range".to_string()));
    }
    if !query.lon.is_finite() || !(-180.0..=180.0).contains(&query.lon) {
        return Err(ApiError::BadRequest("Longitude out of range".to_string()));
    }
    match query.units.as_deref() {
        None => Ok(UnitSystem::default()),
        Some(units) => UnitSystem::parse(units)
            .ok_or_else(|| ApiError::BadRequest(format!("Unsupported units: {}", units))),
    }
}

/// GET /weather?lat=..&lon=..&units=..
pub async fn current_weather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> ApiResult<Json<WeatherResponse>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let units = validate(&query)?;

    let client = state
        .weather()
        .ok_or(ApiError::Unavailable("Weather provider is not configured"))?;
    let current = client.fetch_current(query.lat, query.lon, units).await?;

    let flying_conditions = assess_flying_conditions(&current.observation(units));
    tracing::debug!(
        "Weather at {:.4},{:.4}: risk={:?} warnings={}",
        query.lat,
        query.lon,
        flying_conditions.risk,
        flying_conditions.warnings.len()
    );

    Ok(Json(WeatherResponse {
        success: true,
        weather: WeatherReport::from_current(&current, units),
        flying_conditions,
    }))
}
