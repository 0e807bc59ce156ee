//! `POST /api/meet` — validates a booking request and relays it to the
//! configured webhook. Unlike the lead endpoint, the shape here is fixed and
//! the server is the authoritative validator.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, warn};

use super::AppState;
use crate::fields::is_email;
use crate::forward::ForwardOutcome;

/// Default source tag for bookings that don't carry one.
const MEET_SOURCE: &str = "meet-page";

/// How the meeting happens. Wire values are the site's literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingMode {
    #[serde(rename = "uzivo")]
    Uzivo,
    #[serde(rename = "online")]
    Online,
}

/// Raw booking request as sent by the meet page. Everything is optional at
/// the wire level; validation decides what is actually required.
#[derive(Debug, Default, Deserialize)]
pub struct MeetRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mode: Option<String>,
    #[serde(rename = "slotISO")]
    pub slot_iso: Option<String>,
    #[serde(rename = "slotLocal")]
    pub slot_local: Option<String>,
    pub timezone: Option<String>,
    pub source: Option<String>,
}

/// A validated, normalized booking — the only shape that reaches the wire.
#[derive(Debug, Clone, Serialize)]
pub struct MeetPayload {
    pub name: String,
    pub email: String,
    pub mode: MeetingMode,
    #[serde(rename = "slotISO")]
    pub slot_iso: String,
    #[serde(rename = "slotLocal", skip_serializing_if = "Option::is_none")]
    pub slot_local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub source: String,
}

impl MeetPayload {
    /// Validate a raw request, returning the first failure as the message
    /// the client sees. Checks run in a fixed order: name, email, mode,
    /// slot.
    fn from_request(req: MeetRequest) -> Result<Self, &'static str> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("Polje 'name' je obavezno.")?;

        let email = req
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && is_email(s))
            .ok_or("Neispravan email.")?;

        let mode = match req.mode.as_deref() {
            Some("uzivo") => MeetingMode::Uzivo,
            Some("online") => MeetingMode::Online,
            _ => return Err("Polje 'mode' mora biti 'uzivo' ili 'online'."),
        };

        let slot_iso = req
            .slot_iso
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("Polje 'slotISO' je obavezno.")?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            mode,
            slot_iso: slot_iso.to_string(),
            slot_local: req.slot_local,
            timezone: req.timezone,
            source: req.source.unwrap_or_else(|| MEET_SOURCE.to_string()),
        })
    }
}

pub async fn book_meeting(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let Some(request) = serde_json::from_str::<Option<MeetRequest>>(&body)
        .ok()
        .flatten()
    else {
        return bad_request("Prazan zahtev.");
    };

    let payload = match MeetPayload::from_request(request) {
        Ok(p) => p,
        Err(message) => return bad_request(message),
    };

    let Some(url) = state.config.meet_webhook_url.as_deref() else {
        warn!("MEET_WEBHOOK_URL is not set; returning the payload for inspection");
        return (
            StatusCode::OK,
            Json(json!({ "ok": true, "forwarded": false, "payload": payload })),
        );
    };

    let body: Value = match serde_json::to_value(&payload) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "Failed to serialize booking payload");
            return server_error();
        }
    };

    match state.forwarder.send(url, None, &body).await {
        Ok(ForwardOutcome::Delivered) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Ok(ForwardOutcome::Rejected { status, body }) => {
            error!(status, body = %body, "Booking webhook rejected the payload");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "message": "Greška pri slanju na webhook.",
                    "status": status,
                    "body": body,
                })),
            )
        }
        Err(e) => {
            error!(error = %e, "Booking forward failed");
            server_error()
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

fn server_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Neuspela obrada zahteva." })),
    )
}
