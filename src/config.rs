//! Configuration types, built from environment variables.
//!
//! Forwarding targets are optional by design: with no webhook URL configured
//! the API endpoints still accept submissions and report `forwarded: false`,
//! which keeps local development working without any external setup.

use secrecy::SecretString;

/// Where submitted form data gets relayed.
#[derive(Debug, Clone, Default)]
pub struct ForwardConfig {
    /// Target for lead submissions (`WEBHOOK_URL`). `None` = no-op mode.
    pub lead_webhook_url: Option<String>,
    /// Bearer token attached to lead forwards (`WEBHOOK_SECRET`).
    pub lead_webhook_secret: Option<SecretString>,
    /// Target for meeting bookings (`MEET_WEBHOOK_URL`). `None` = no-op mode.
    pub meet_webhook_url: Option<String>,
}

impl ForwardConfig {
    /// Build config from environment variables. Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            lead_webhook_url: non_empty_var("WEBHOOK_URL"),
            lead_webhook_secret: non_empty_var("WEBHOOK_SECRET").map(SecretString::from),
            meet_webhook_url: non_empty_var("MEET_WEBHOOK_URL"),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl ServerConfig {
    /// Build config from `BIND_ADDR` / `PORT`, with local-dev defaults.
    pub fn from_env() -> Self {
        let bind_addr = non_empty_var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8787);
        Self { bind_addr, port }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
