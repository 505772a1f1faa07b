//! Credential introspection for deployment checks.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

const TOKEN_PREFIX_LEN: usize = 8;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub token_exists: bool,
    pub token_length: usize,
    pub token_prefix: String,
    pub api_base: String,
}

/// Never reveals more than the first few characters of the token.
pub fn token_prefix(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("{}...", token.chars().take(TOKEN_PREFIX_LEN).collect::<String>()),
        None => "N/A".to_string(),
    }
}

/// GET /debug
pub async fn debug_info(State(state): State<Arc<AppState>>) -> Json<DebugResponse> {
    let config = state.config();
    let token = config.fleet_api_token.as_deref();
    Json(DebugResponse {
        token_exists: token.is_some(),
        token_length: token.map(str::len).unwrap_or(0),
        token_prefix: token_prefix(token),
        api_base: state.fleet().base_url().to_string(),
    })
}
