use axum::Router;
use mimalloc::MiMalloc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use walktrack::error::AppError;
use walktrack::{config, routes, state, ticker};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walktrack=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("walktrack failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = config::Config::from_env();
    let state = state::AppState::load(&config)?;

    // Dead-reckon between snapshots; stopped when dropped at shutdown.
    let ticker = ticker::Ticker::spawn(state.clone(), config.tick_interval);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::progress::router())
        .merge(routes::snapshot::router())
        .merge(routes::elevation::router())
        .merge(routes::route::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Io {
            path: addr.clone(),
            source,
        })?;

    tracing::info!("walktrack listening on {}", addr);
    tracing::info!("Progress: GET http://{}/api/progress", addr);
    tracing::info!("Snapshots: POST http://{}/api/snapshot", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    ticker.stop();
    tracing::info!("walktrack stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
