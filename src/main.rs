use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volfloor::application::handlers::volatility_handler::{health_check, robust_volatility};
use volfloor::application::services::volatility_service::VolatilityService;
use volfloor::config::{StoreConfig, VolatilityConfig};
use volfloor::infrastructure::price_store::{HttpPriceStore, PriceStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volfloor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let volatility_config = VolatilityConfig::from_env();
    let store_config = StoreConfig::from_env();

    info!("Robust Volatility Server starting...");
    info!(
        "Price store at {} (table {})",
        store_config.base_url, store_config.table
    );
    info!(
        "Pipeline: span={} min_periods={} floor_quant={} floor_min_periods={} floor_days={}",
        volatility_config.span,
        volatility_config.min_periods,
        volatility_config.floor_min_quant,
        volatility_config.floor_min_periods,
        volatility_config.floor_days
    );

    let store: Arc<dyn PriceStore> = Arc::new(HttpPriceStore::new(
        store_config.base_url,
        store_config.table,
    ));
    let service = Arc::new(VolatilityService::new(store, volatility_config));

    let app = Router::new()
        .route("/", get(|| async { "Robust Volatility Server is running!" }))
        .route("/health", get(health_check))
        .route("/robust_volatility", post(robust_volatility))
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    let shutdown_signal = async move {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    server.with_graceful_shutdown(shutdown_signal).await?;

    info!("Shutdown complete");
    Ok(())
}
