use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use discount_finder::{FetchFailure, FetchTask, HttpFetcher, PageFetcher};

fn task(server: &MockServer, store: StoreId, page_path: &str) -> FetchTask {
    FetchTask {
        store,
        category: page_path.trim_matches('/').to_string(),
        url: format!("{}{}", server.uri(), page_path),
        referer: Some(server.uri()),
    }
}

#[tokio::test]
async fn test_fetch_returns_markup_in_task_order() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "<p>a</p>").await;
    mount_page(&server, "/b", "<p>b</p>").await;
    mount_page(&server, "/c", "<p>c</p>").await;

    let fetcher = HttpFetcher::new(&test_scraper_config())?;
    let tasks = vec![
        task(&server, StoreId::Asos, "/c"),
        task(&server, StoreId::Asos, "/a"),
        task(&server, StoreId::Myer, "/b"),
    ];

    let results = fetcher.fetch_all(&tasks).await;

    let bodies: Vec<_> = results.iter().map(|r| r.markup().unwrap_or("")).collect();
    assert_eq!(bodies, vec!["<p>c</p>", "<p>a</p>", "<p>b</p>"]);
    for (result, task) in results.iter().zip(&tasks) {
        assert_eq!(&result.task, task);
    }
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_recorded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let fetcher = HttpFetcher::new(&test_scraper_config())?;
    let tasks = vec![
        task(&server, StoreId::JbHifi, "/broken"),
        task(&server, StoreId::JbHifi, "/ok"),
    ];

    let results = fetcher.fetch_all(&tasks).await;
    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0].outcome,
        Err(FetchFailure::Status { status: 503, .. })
    ));
    assert_eq!(results[1].markup(), Some("<p>fine</p>"));
    Ok(())
}

#[tokio::test]
async fn test_unmocked_path_is_a_404_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let fetcher = HttpFetcher::new(&test_scraper_config())?;

    let results = fetcher
        .fetch_all(&[task(&server, StoreId::DavidJones, "/sale/men/shoes")])
        .await;

    assert!(matches!(
        results[0].outcome,
        Err(FetchFailure::Status { status: 404, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_slow_response_times_out() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ScraperConfig {
        request_timeout_secs: 1,
        ..test_scraper_config()
    };
    let fetcher = HttpFetcher::new(&config)?;

    let results = fetcher
        .fetch_all(&[task(&server, StoreId::Iconic, "/slow")])
        .await;

    assert!(matches!(results[0].outcome, Err(FetchFailure::Timeout { .. })));
    Ok(())
}

#[tokio::test]
async fn test_sends_browser_headers_and_referer() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/men/shirts"))
        .and(query_param("sortBy", "OnSale"))
        .and(header("user-agent", TEST_USER_AGENT))
        .and(header("dnt", "1"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header("referer", server.uri().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&test_scraper_config())?;
    let results = fetcher
        .fetch_all(&[task(&server, StoreId::Myer, "/men/shirts?sortBy=OnSale")])
        .await;

    assert_eq!(results[0].markup(), Some("<p>ok</p>"));
    Ok(())
}

#[tokio::test]
async fn test_many_tasks_against_one_host_all_resolve() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>page</p>")
                .set_delay(Duration::from_millis(20)),
        )
        .mount(&server)
        .await;

    let config = ScraperConfig {
        max_connections: 4,
        max_connections_per_host: 2,
        ..test_scraper_config()
    };
    let fetcher = HttpFetcher::new(&config)?;
    let tasks: Vec<_> = (0..25)
        .map(|i| task(&server, StoreId::DavidJones, &format!("/page/{}", i)))
        .collect();

    let results = fetcher.fetch_all(&tasks).await;
    assert_eq!(results.len(), 25);
    assert!(results.iter().all(|r| r.markup() == Some("<p>page</p>")));
    Ok(())
}
