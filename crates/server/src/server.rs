use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::ServerConfig,
    routes::{self, AppState},
};

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the application router (shared between production startup and tests).
pub fn build_app(config: &ServerConfig) -> Router {
    let state = AppState {
        convert: config.convert_options(),
    };

    let transform = post(routes::transform)
        .fallback(routes::method_not_allowed)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let router = Router::new()
        .route("/health", get(routes::health))
        .route("/version", get(routes::version))
        .route("/transform", transform)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    }
}

/// Any origin; `OPTIONS` preflight is answered by the layer itself.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let app = build_app(&config);
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    info!(
        addr = %listener.local_addr()?,
        max_upload_bytes = config.max_upload_bytes,
        jpeg_quality = config.jpeg_quality,
        cors = config.cors_enabled,
        config_file = ?config.path,
        "fileshift server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
