use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use discount_finder::Gender;

#[tokio::test]
async fn test_failed_store_does_not_affect_others() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "/mens-clothing-jeans-sale/", ICONIC_JEANS_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/au/men/sale/jeans/cat/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pipeline = test_pipeline(&server, &[StoreId::Iconic, StoreId::Asos])?;
    let records = pipeline.run().await;

    assert_eq!(records.len(), 1);
    let jeans = &records[0];
    assert_eq!(jeans.source, "The Iconic");
    assert_eq!(jeans.brand, "Levi's");
    assert_eq!(jeans.name, "511 Slim Jeans");
    assert_eq!(jeans.current_price, "$30.00");
    assert_eq!(jeans.original_price, "$60.00");
    assert_eq!(jeans.discount_percent, 50.0);
    assert_eq!(jeans.category, "Jeans");
    assert_eq!(jeans.gender, Gender::Men);
    assert_eq!(jeans.url, format!("{}/levis-511-slim-jeans-123.html", server.uri()));
    Ok(())
}

#[tokio::test]
async fn test_every_store_offline_yields_empty_batch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let pipeline = test_pipeline(&server, &StoreId::ALL)?;
    assert!(pipeline.run().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_myer_requests_carry_on_sale_filter() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/men/shirts"))
        .and(query_param("sortBy", "OnSale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MYER_SHIRTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = test_pipeline(&server, &[StoreId::Myer])?;
    let records = pipeline.run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, "Myer");
    assert_eq!(records[0].brand, "Blaq");
    assert_eq!(records[0].discount_percent, 30.0);
    Ok(())
}

#[tokio::test]
async fn test_results_are_ranked_across_stores() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "/mens-clothing-jeans-sale/", ICONIC_JEANS_PAGE).await;
    mount_page(&server, "/men/shirts", MYER_SHIRTS_PAGE).await;

    // Myer precedes The Iconic only in this request; ranking is by discount.
    let pipeline = test_pipeline(&server, &StoreId::ALL)?;
    let records = pipeline.run_for(&[StoreId::Myer, StoreId::Iconic]).await;

    let discounts: Vec<_> = records.iter().map(|r| r.discount_percent).collect();
    assert_eq!(discounts, vec![50.0, 30.0]);
    Ok(())
}

#[tokio::test]
async fn test_batch_fetches_every_category_once() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(10)
        .mount(&server)
        .await;

    let pipeline = test_pipeline(&server, &[StoreId::JbHifi])?;
    assert!(pipeline.run().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_store_does_not_affect_others() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "/mens-clothing-jeans-sale/", ICONIC_JEANS_PAGE).await;

    // Nothing listens on port 1, so every ASOS fetch is refused.
    let catalog = catalog_for(&server).with_base_url(StoreId::Asos, "http://127.0.0.1:1");
    let config = ScraperConfig {
        enabled_stores: vec![StoreId::Asos, StoreId::Iconic],
        ..test_scraper_config()
    };
    let pipeline = DealPipeline::from_config(&config, catalog)?;

    let records = pipeline.run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, "The Iconic");
    assert_eq!(records[0].discount_percent, 50.0);

    let asos_requests = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().starts_with("/au/"))
        .count();
    assert_eq!(asos_requests, 0);
    Ok(())
}
