//! HTTP Handlers
//!
//! Thin transport shim: the inbound/outbound `{sessionId, text}`
//! contract maps one-to-one onto the orchestrator.

use axum::{extract::State, Json};
use serde::Serialize;

use assistant_core::{Inbound, Reply};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
    })
}

/// Main chat endpoint.
///
/// Always answers 200: the orchestrator degrades every failure to a
/// reply, so the transport never sees an error it would have to map.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(inbound): Json<Inbound>,
) -> Json<Reply> {
    tracing::info!(session = %inbound.session_id, "Inbound message");
    Json(state.orchestrator.handle(inbound).await)
}
