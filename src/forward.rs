//! Outbound webhook relay — one POST, no retries.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::error::ForwardError;

/// Result of one forwarding attempt against a configured target.
#[derive(Debug)]
pub enum ForwardOutcome {
    /// The target answered 2xx.
    Delivered,
    /// The target answered with a non-success status.
    Rejected { status: u16, body: String },
}

/// Shared HTTP relay client. Cheap to clone; handlers hold one instance in
/// the app state so every request reuses the same connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// POST `payload` to `url`, attaching a bearer token when configured.
    ///
    /// A non-2xx answer is an [`ForwardOutcome::Rejected`], not an error —
    /// only transport failures surface as `Err`.
    pub async fn send(
        &self,
        url: &str,
        secret: Option<&SecretString>,
        payload: &Value,
    ) -> Result<ForwardOutcome, ForwardError> {
        let mut request = self.client.post(url).json(payload);
        if let Some(secret) = secret {
            request = request.bearer_auth(secret.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(ForwardOutcome::Delivered);
        }

        let body = response.text().await.unwrap_or_default();
        Ok(ForwardOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}
