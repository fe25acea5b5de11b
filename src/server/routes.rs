use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::server::handlers;
use crate::server::state::AppState;

pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze_base64))
        .route("/upload", post(handlers::upload))
        .route("/enhance", post(handlers::enhance))
        .route("/api", post(handlers::echo))
        .route("/logs", get(handlers::logs))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(addr: &str, state: AppState, max_body_bytes: usize) -> std::io::Result<()> {
    let app = router(state, max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
