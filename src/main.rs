use rust_analise_credito::api::handlers::AppState;
use rust_analise_credito::api::routes::{build_router, RateLimit};
use rust_analise_credito::config::Config;
use rust_analise_credito::integrations::services::CreditAnalysisService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads the configuration, builds the credit analysis service for
/// the configured variant and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_analise_credito=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let service = CreditAnalysisService::from_config(&config)?;
    tracing::info!(
        "✓ Credit analysis service initialized ({} variant): {}",
        config.variant,
        config.webhook_url
    );

    let rate_limit = RateLimit {
        per_second: config.rate_limit_per_second,
        burst_size: config.rate_limit_burst,
    };
    let port = config.port;

    let app_state = Arc::new(AppState { config, service });
    let app = build_router(app_state, Some(rate_limit))?;

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
