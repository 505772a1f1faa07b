//! API routes for the DroneScout edge server.

pub mod debug;
pub mod flights;
pub mod request_id;
mod routes;
pub mod weather;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

/// Full application: routes, state and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    routes::with_middleware(routes(), state)
}
