// Integration tests for discount-finder
// These tests drive the real HTTP fetcher against local wiremock servers

pub mod api_tests;
pub mod fetcher_tests;
pub mod pipeline_tests;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use discount_finder::{
    config::ScraperConfig,
    web::{create_router, AppState},
    DealPipeline, DealService, ResultCache, StoreCatalog, StoreId,
};

pub const TEST_USER_AGENT: &str = "discount-finder-test/1.0";

/// An Iconic listing page with one discounted pair of jeans.
pub const ICONIC_JEANS_PAGE: &str = r#"<!DOCTYPE html>
<html><body><div class="catalog">
  <div class="product">
    <a href="/levis-511-slim-jeans-123.html">
      <span class="brand">Levi's</span>
      <span class="name">511 Slim Jeans</span>
    </a>
    <span class="price original">$60.00</span>
    <span class="price final">$30.00</span>
  </div>
</div></body></html>"#;

/// A Myer listing page with one shirt at 30% off.
pub const MYER_SHIRTS_PAGE: &str = r#"<html><body>
  <div class="product-tile">
    <a href="/p/oxford-shirt"><span class="brand">Blaq</span><span class="product-name">Oxford Shirt</span></a>
    <p class="price-was">Was $100.00</p>
    <p class="price-now">Now $70.00</p>
  </div>
</body></html>"#;

pub fn test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        enabled_stores: StoreId::ALL.to_vec(),
        request_timeout_secs: 2,
        connect_timeout_secs: 2,
        user_agent: TEST_USER_AGENT.to_string(),
        batch_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

/// The built-in catalog with every store pointed at `server`.
pub fn catalog_for(server: &MockServer) -> StoreCatalog {
    StoreId::ALL
        .iter()
        .fold(StoreCatalog::builtin(), |catalog, store| {
            catalog.with_base_url(*store, server.uri())
        })
}

/// Serves `body` for GET `page_path` on `server`.
pub async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn test_pipeline(server: &MockServer, stores: &[StoreId]) -> anyhow::Result<DealPipeline> {
    let config = ScraperConfig {
        enabled_stores: stores.to_vec(),
        ..test_scraper_config()
    };
    Ok(DealPipeline::from_config(&config, catalog_for(server))?)
}

pub fn create_test_app_state(server: &MockServer, stores: &[StoreId]) -> anyhow::Result<AppState> {
    let service = DealService::new(
        Arc::new(test_pipeline(server, stores)?),
        ResultCache::new(Duration::from_secs(900)),
    );

    Ok(AppState {
        service: Arc::new(service),
        metrics: None,
    })
}

pub fn create_test_app(state: AppState) -> Router {
    create_router(state)
}

/// Helper to make HTTP requests to the test app
pub async fn make_request(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
) -> anyhow::Result<Response> {
    let mut request = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = app.clone().oneshot(request.body(Body::empty())?).await?;
    Ok(response)
}

pub async fn body_json(response: Response) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
