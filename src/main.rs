use skeylo::api::{self, AppState};
use skeylo::config::{ForwardConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let forward = ForwardConfig::from_env();
    let server = ServerConfig::from_env();

    eprintln!("skeylo backend v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Lead webhook: {}",
        forward
            .lead_webhook_url
            .as_deref()
            .unwrap_or("(not set — leads are logged, not forwarded)")
    );
    eprintln!(
        "   Meet webhook: {}",
        forward
            .meet_webhook_url
            .as_deref()
            .unwrap_or("(not set — bookings are echoed back)")
    );

    let app = api::router(AppState::new(forward));
    let addr = format!("{}:{}", server.bind_addr, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server started");
    axum::serve(listener, app).await?;

    Ok(())
}
