//! Flight history, flight details and media endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use scout_core::models::{FlightDetail, FlightSummary, MediaItem};
use scout_core::{summarize_telemetry, TelemetrySummary};

use crate::api::request_id::RequestId;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFlightsResponse {
    pub success: bool,
    pub count: usize,
    pub flights: Vec<FlightSummary>,
    pub synced_at: String,
}

#[derive(Debug, Serialize)]
pub struct FlightDetailsResponse {
    pub success: bool,
    pub flight: FlightDetail,
    /// `null` when the flight has no usable telemetry.
    pub telemetry: Option<TelemetrySummary>,
}

#[derive(Debug, Serialize)]
pub struct FlightMediaResponse {
    pub success: bool,
    pub count: usize,
    pub media: Vec<MediaItem>,
}

/// Flight IDs are forwarded as a single upstream path segment; dot segments
/// would be collapsed by URL normalization, so they are refused here.
fn check_flight_id(flight_id: &str) -> ApiResult<()> {
    if matches!(flight_id.trim(), "" | "." | "..") {
        return Err(ApiError::BadRequest(format!("Invalid flight ID: {:?}", flight_id)));
    }
    Ok(())
}

/// POST /sync-flights
///
/// Pages through completed flights until a short page or the configured page
/// limit, reshaping each into a history entry.
pub async fn sync_flights(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<SyncFlightsResponse>> {
    let fleet = state.fleet().with_request_id(Some(request_id.0));
    let page_size = state.config().flights_page_size;
    let max_pages = state.config().flights_max_pages;

    let mut flights = Vec::new();
    for page in 1..=max_pages {
        let batch = fleet.fetch_completed_flights(page, page_size).await?;
        let fetched = batch.len();
        flights.extend(batch.iter().map(FlightSummary::from_fleet));
        tracing::info!("Fetched {} flights from page {}", fetched, page);

        if fetched < page_size as usize {
            break;
        }
    }

    Ok(Json(SyncFlightsResponse {
        success: true,
        count: flights.len(),
        flights,
        synced_at: Utc::now().to_rfc3339(),
    }))
}

/// GET /flight/:flight_id/details
///
/// Flight record and telemetry are fetched concurrently; the telemetry
/// reduction runs once both have resolved.
pub async fn flight_details(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(flight_id): Path<String>,
) -> ApiResult<Json<FlightDetailsResponse>> {
    check_flight_id(&flight_id)?;
    let fleet = state.fleet().with_request_id(Some(request_id.0));

    let (flight, telemetry) = tokio::join!(
        fleet.fetch_flight(&flight_id),
        fleet.fetch_telemetry(&flight_id)
    );
    let flight = flight?;
    let telemetry = telemetry?;

    let summary = telemetry.as_ref().and_then(summarize_telemetry);
    match &summary {
        Some(summary) => tracing::debug!(
            "Flight {} telemetry: {} points, {} channel stats",
            flight_id,
            summary.point_count,
            summary.stats.fields.len()
        ),
        None if telemetry.is_some() => {
            tracing::warn!("Flight {} telemetry has no usable GPS channel", flight_id)
        }
        None => {}
    }

    Ok(Json(FlightDetailsResponse {
        success: true,
        flight: FlightDetail::from_fleet(&flight, &flight_id),
        telemetry: summary,
    }))
}

/// GET /flight/:flight_id/media
pub async fn flight_media(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(flight_id): Path<String>,
) -> ApiResult<Json<FlightMediaResponse>> {
    check_flight_id(&flight_id)?;
    let fleet = state.fleet().with_request_id(Some(request_id.0));
    let files = fleet.fetch_flight_data_files(&flight_id).await?;

    let media: Vec<MediaItem> = files
        .iter()
        .map(|file| MediaItem::from_fleet(file, fleet.base_url()))
        .collect();

    Ok(Json(FlightMediaResponse {
        success: true,
        count: media.len(),
        media,
    }))
}
