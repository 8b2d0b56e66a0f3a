use axum::http::{header, Method, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;

use super::*;

async fn iconic_app(server: &MockServer) -> anyhow::Result<Router> {
    mount_page(server, "/mens-clothing-jeans-sale/", ICONIC_JEANS_PAGE).await;
    Ok(create_test_app(create_test_app_state(server, &[StoreId::Iconic])?))
}

#[tokio::test]
async fn test_scrape_returns_fresh_document() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = iconic_app(&server).await?;

    let response = make_request(&app, Method::GET, "/api/scrape", &[]).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
        Some(&b"public, max-age=300"[..])
    );

    let body = body_json(response).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["cached"], false);
    assert_eq!(body["total"], 1);
    assert!(body["scrape_time_seconds"].is_number());
    assert!(body.get("cache_age_seconds").is_none());
    assert!(body.get("error").is_none());

    let item = &body["items"][0];
    assert_eq!(item["source"], "The Iconic");
    assert_eq!(item["brand"], "Levi's");
    assert_eq!(item["discount_percent"], 50.0);
    assert_eq!(item["gender"], "Men");
    Ok(())
}

#[tokio::test]
async fn test_second_scrape_is_served_from_cache() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = iconic_app(&server).await?;

    let first = body_json(make_request(&app, Method::GET, "/api/scrape", &[]).await?).await?;
    let requests_after_first = server.received_requests().await.map(|r| r.len());

    let second = body_json(make_request(&app, Method::GET, "/api/scrape", &[]).await?).await?;

    assert_eq!(second["success"], true);
    assert_eq!(second["cached"], true);
    assert!(second["cache_age_seconds"].is_u64());
    assert!(second.get("scrape_time_seconds").is_none());
    assert_eq!(second["items"], first["items"]);
    assert_eq!(server.received_requests().await.map(|r| r.len()), requests_after_first);
    Ok(())
}

#[tokio::test]
async fn test_empty_batch_is_not_cached() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = create_test_app(create_test_app_state(&server, &[StoreId::Myer])?);

    let first = body_json(make_request(&app, Method::GET, "/api/scrape", &[]).await?).await?;
    let second = body_json(make_request(&app, Method::GET, "/api/scrape", &[]).await?).await?;

    assert_eq!(first["success"], true);
    assert_eq!(first["total"], 0);
    assert_eq!(second["cached"], false);
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(18));
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = create_test_app(create_test_app_state(&server, &[StoreId::Asos, StoreId::JbHifi])?);

    let response = make_request(&app, Method::GET, "/health", &[]).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "discount-finder");
    assert_eq!(body["enabled_stores"], serde_json::json!(["asos", "jbhifi"]));
    Ok(())
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = create_test_app(create_test_app_state(&server, &[StoreId::Iconic])?);

    let response = make_request(&app, Method::GET, "/metrics", &[]).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_metrics_enabled_renders() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let state = AppState {
        metrics: Some(PrometheusBuilder::new().build_recorder().handle()),
        ..create_test_app_state(&server, &[StoreId::Iconic])?
    };
    let app = create_test_app(state);

    let response = make_request(&app, Method::GET, "/metrics", &[]).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = create_test_app(create_test_app_state(&server, &[StoreId::Iconic])?);

    let response = make_request(
        &app,
        Method::GET,
        "/health",
        &[("origin", "https://deals.example.com")],
    )
    .await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.as_bytes()),
        Some(&b"*"[..])
    );

    let preflight = make_request(
        &app,
        Method::OPTIONS,
        "/api/scrape",
        &[
            ("origin", "https://deals.example.com"),
            ("access-control-request-method", "GET"),
        ],
    )
    .await?;
    assert_eq!(preflight.status(), StatusCode::OK);
    assert!(preflight
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let app = create_test_app(create_test_app_state(&server, &[StoreId::Iconic])?);

    let response = make_request(&app, Method::GET, "/api/products", &[]).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await?;
    assert_eq!(body["success"], false);
    Ok(())
}
