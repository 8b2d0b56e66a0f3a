//! Concurrent page retrieval.
//!
//! Every task in a batch is turned into a future before anything is awaited,
//! and the batch resolves only once each of them has produced markup or a
//! [`FetchFailure`]. Concurrency is bounded twice: by a global limit shared
//! by all hosts, and by a per-host limit so one slow storefront cannot hold
//! every connection.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, REFERER, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::ScraperConfig;
use crate::models::{FetchFailure, FetchResult, FetchTask};
use crate::utils::text::host_key;
use crate::Result;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches every task, returning exactly one result per task in task order.
    async fn fetch_all(&self, tasks: &[FetchTask]) -> Vec<FetchResult>;
}

pub struct HttpFetcher {
    client: Client,
    global: Arc<Semaphore>,
    per_host_limit: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .gzip(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.max_connections_per_host)
            .build()?;

        Ok(Self {
            client,
            global: Arc::new(Semaphore::new(config.max_connections.max(1))),
            per_host_limit: config.max_connections_per_host.max(1),
            hosts: Mutex::new(HashMap::new()),
        })
    }

    fn host_semaphore(&self, url: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        hosts
            .entry(host_key(url))
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone()
    }

    async fn fetch_one(&self, task: &FetchTask) -> FetchResult {
        let host = self.host_semaphore(&task.url);

        // Requests queued behind a busy host must not hold a global slot.
        let Ok(_host_permit) = host.acquire().await else {
            return self.limiter_closed(task);
        };
        let Ok(_global_permit) = self.global.acquire().await else {
            return self.limiter_closed(task);
        };

        tracing::debug!("GET {} ({}/{})", task.url, task.store, task.category);

        let mut request = self.client.get(&task.url);
        if let Some(referer) = &task.referer {
            request = request.header(REFERER, referer);
        }

        let outcome = match request.send().await {
            Ok(response) if response.status().is_success() => {
                response.text().await.map_err(|e| classify(&task.url, e))
            }
            Ok(response) => Err(FetchFailure::Status {
                status: response.status().as_u16(),
                url: task.url.clone(),
            }),
            Err(e) => Err(classify(&task.url, e)),
        };

        self.record(task, outcome)
    }

    fn limiter_closed(&self, task: &FetchTask) -> FetchResult {
        self.record(
            task,
            Err(FetchFailure::Transport {
                url: task.url.clone(),
                message: "connection limiter closed".to_string(),
            }),
        )
    }

    fn record(&self, task: &FetchTask, outcome: std::result::Result<String, FetchFailure>) -> FetchResult {
        let label = match &outcome {
            Ok(_) => "ok",
            Err(failure @ FetchFailure::Status { .. }) => {
                tracing::warn!("{}/{}: {}", task.store, task.category, failure);
                "status"
            }
            Err(failure @ FetchFailure::Timeout { .. }) => {
                tracing::error!("{}/{}: {}", task.store, task.category, failure);
                "timeout"
            }
            Err(failure @ FetchFailure::Transport { .. }) => {
                tracing::error!("{}/{}: {}", task.store, task.category, failure);
                "transport"
            }
        };

        metrics::counter!(
            "deals_pages_fetched_total",
            "store" => task.store.as_str(),
            "outcome" => label
        )
        .increment(1);

        FetchResult {
            task: task.clone(),
            outcome,
        }
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchFailure::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_all(&self, tasks: &[FetchTask]) -> Vec<FetchResult> {
        join_all(tasks.iter().map(|task| self.fetch_one(task))).await
    }
}
