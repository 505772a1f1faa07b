//! REST API routes.

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{debug, flights, request_id, weather};
use crate::error::ApiError;
use crate::state::AppState;

/// Create the API router.
///
/// A known path hit with the wrong method gets the same JSON 404 as an
/// unknown path.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }).fallback(not_found))
        .route("/debug", get(debug::debug_info).fallback(not_found))
        .route("/sync-flights", post(flights::sync_flights).fallback(not_found))
        .route(
            "/flight/:flight_id/details",
            get(flights::flight_details).fallback(not_found),
        )
        .route(
            "/flight/:flight_id/media",
            get(flights::flight_media).fallback(not_found),
        )
        .route("/weather", get(weather::current_weather).fallback(not_found))
        .fallback(not_found)
}

/// Attach state and the middleware stack (outermost last).
pub fn with_middleware(router: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    router
        .with_state(state)
        .layer(middleware::from_fn(answer_options))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(cors_layer())
}

/// Any origin, `GET`/`POST`/`OPTIONS`, `Content-Type`.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Bare `OPTIONS` requests (no CORS preflight headers) get an empty 200.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
