use logtap_api::{Settings, create_app, state::AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    // logging setup, RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    info!(directory = %settings.log_directory.display(), "Serving log files");

    if settings.api_key().is_some() {
        info!("API key authentication ENABLED");
    } else {
        info!("API key authentication DISABLED (set LOGTAP_API_KEY to enable)");
    }

    let addr = settings.bind_address();
    let app = create_app(Arc::new(AppState::new(settings)));

    // Server start
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
