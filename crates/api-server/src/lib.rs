//! HTTP boundary for the screener. One route does the work:
//! `GET /api/risk/{symbol}` runs a full check and returns the JSON report.
//! Rendering is the caller's concern; the server only serializes.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use risk_checker::RiskChecker;
use screener_core::RiskReport;
use sina_client::SinaClient;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
struct AppState {
    checker: Arc<RiskChecker>,
}

pub fn router(checker: Arc<RiskChecker>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/risk/:symbol", get(check_risks))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { checker })
}

async fn health() -> &'static str {
    "ok"
}

/// `check_risks` is infallible, so this handler always answers 200 with a
/// report — worst case a fetch-error entry plus the policy classification.
async fn check_risks(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<RiskReport> {
    Json(state.checker.check_risks(&symbol).await)
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let checker = Arc::new(RiskChecker::new(Arc::new(SinaClient::new())));
    let app = router(checker);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
