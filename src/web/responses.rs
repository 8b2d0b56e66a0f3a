use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::StoreId;
use crate::service::ScrapeResponse;

/// Browsers may reuse a scrape document for five minutes.
pub const SCRAPE_CACHE_CONTROL: &str = "public, max-age=300";

/// A scrape document with its caching header. Always `200 OK`; failure is
/// reported in the body.
pub struct ScrapeReply(pub ScrapeResponse);

impl IntoResponse for ScrapeReply {
    fn into_response(self) -> Response {
        (
            [(header::CACHE_CONTROL, SCRAPE_CACHE_CONTROL)],
            Json(self.0),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub service: String,
    pub enabled_stores: Vec<StoreId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg) => msg,
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(format!("{} not found", resource.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
