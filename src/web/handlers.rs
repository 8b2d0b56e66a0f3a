use axum::{extract::State, http::Uri, response::Json};

use super::{ApiError, AppState, HealthResponse, ScrapeReply};

/// `GET /api/scrape`: the current deal list, cached or freshly collected.
pub async fn scrape(State(state): State<AppState>) -> ScrapeReply {
    tracing::debug!("Scrape requested");
    ScrapeReply(state.service.scrape().await)
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "discount-finder".to_string(),
        enabled_stores: state.service.pipeline().enabled_stores().to_vec(),
    })
}

/// Prometheus text exposition of the process metrics.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::not_found("Metrics endpoint"))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {}", uri.path()))
}
