use crate::stats::{PingResults, Stats};
use axum::{
    error_handling::HandleErrorLayer,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;

async fn metrics_handler(State(stats): State<Arc<Stats>>) -> Response {
    match stats.encode_text() {
        Ok((content_type, body)) => ([(CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!(target: "telemetry", error = %e, "Failed to encode prometheus metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn stats_handler(State(stats): State<Arc<Stats>>) -> Json<PingResults> {
    Json(stats.get_stats())
}

async fn healthz_handler() -> &'static str {
    "OK"
}

async fn handle_service_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else if err.is::<tower::load_shed::error::Overloaded>() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many concurrent scrapes".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

/// Routes for the scrape endpoint, a liveness probe and the JSON summary.
pub fn router(stats: Arc<Stats>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/stats", get(stats_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_service_error))
                .layer(TraceLayer::new_for_http())
                .load_shed()
                .concurrency_limit(8)
                .timeout(Duration::from_secs(2)),
        )
        .with_state(stats)
}

/// Serves [`router`] on `addr` until Ctrl-C.
pub async fn run_server(addr: SocketAddr, stats: Arc<Stats>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "telemetry", addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(stats).into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(target: "telemetry", error = %e, "Failed to install CTRL+C handler");
            }
            tracing::info!(target: "telemetry", "shutting down gracefully");
        })
        .await
}
