//! HTTP API — thin relay endpoints for the site's forms.

pub mod lead;
pub mod meet;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::config::ForwardConfig;
use crate::forward::Forwarder;

/// Application state shared across handlers. Forwarding targets are injected
/// here (not read from the environment per request) so the no-op branch is
/// testable without touching the process environment.
#[derive(Clone)]
pub struct AppState {
    pub config: ForwardConfig,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: ForwardConfig) -> Self {
        Self {
            config,
            forwarder: Forwarder::new(),
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "skeylo-backend"
    }))
}

/// Preflight answer for cross-origin lead submitters: 204 with the
/// allow-lists for POST and its two request headers.
async fn lead_preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/lead", post(lead::submit_lead).options(lead_preflight))
        .route("/api/meet", post(meet::book_meeting))
        .with_state(state)
}
