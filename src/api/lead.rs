//! `POST /api/lead` — accepts the wizard's collected values and relays them
//! to the configured webhook (Zapier/Make/n8n/Slack…).
//!
//! The body is deliberately unvalidated: whatever JSON the wizard collected
//! is wrapped in a [`LeadPayload`] and forwarded as-is. A missing or
//! malformed body degrades to an empty object rather than a client error.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use super::AppState;
use crate::forward::ForwardOutcome;

/// Source tag stamped on every lead.
const LEAD_SOURCE: &str = "skeylo-free-analysis";

/// Envelope relayed to the webhook: the submitted data plus audit metadata.
#[derive(Debug, Serialize)]
pub struct LeadPayload {
    #[serde(rename = "receivedAt")]
    pub received_at: DateTime<Utc>,
    pub source: &'static str,
    pub meta: LeadMeta,
    pub data: Value,
}

/// Request metadata captured for audit and campaign attribution.
#[derive(Debug, Serialize)]
pub struct LeadMeta {
    pub ip: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub utm: UtmParams,
}

/// Campaign-attribution query parameters, each independently optional.
#[derive(Debug, Serialize)]
pub struct UtmParams {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
}

impl UtmParams {
    fn from_uri(uri: &Uri) -> Self {
        Self {
            utm_source: query_param(uri, "utm_source"),
            utm_medium: query_param(uri, "utm_medium"),
            utm_campaign: query_param(uri, "utm_campaign"),
            utm_term: query_param(uri, "utm_term"),
            utm_content: query_param(uri, "utm_content"),
            gclid: query_param(uri, "gclid"),
            fbclid: query_param(uri, "fbclid"),
        }
    }
}

pub async fn submit_lead(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let data: Value = serde_json::from_str(&body).unwrap_or_else(|_| json!({}));

    let payload = LeadPayload {
        received_at: Utc::now(),
        source: LEAD_SOURCE,
        meta: LeadMeta {
            ip: client_ip(&headers),
            user_agent: header_str(&headers, "user-agent"),
            referer: header_str(&headers, "referer"),
            utm: UtmParams::from_uri(&uri),
        },
        data,
    };

    let Some(url) = state.config.lead_webhook_url.as_deref() else {
        warn!(
            payload = %serde_json::to_string(&payload).unwrap_or_default(),
            "WEBHOOK_URL is not set; lead accepted but not forwarded"
        );
        return (StatusCode::OK, Json(json!({ "ok": true, "forwarded": false })));
    };

    let body = match serde_json::to_value(&payload) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "Failed to serialize lead payload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "SERVER_ERROR" })),
            );
        }
    };

    match state
        .forwarder
        .send(url, state.config.lead_webhook_secret.as_ref(), &body)
        .await
    {
        Ok(ForwardOutcome::Delivered) => {
            (StatusCode::OK, Json(json!({ "ok": true, "forwarded": true })))
        }
        Ok(ForwardOutcome::Rejected { status, body }) => {
            error!(status, body = %body, "Lead webhook rejected the payload");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "ok": false, "error": "WEBHOOK_FAILED", "status": status })),
            )
        }
        Err(e) => {
            error!(error = %e, "Lead forward failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "SERVER_ERROR" })),
            )
        }
    }
}

/// Client IP: first entry of `x-forwarded-for`, else `x-real-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

fn query_param(uri: &Uri, key: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
