use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::StoreId;

/// One unit of fetch work: a single category listing page of one store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchTask {
    pub store: StoreId,
    pub category: String,
    pub url: String,
    pub referer: Option<String>,
}

/// Why a task produced no markup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

/// Outcome of exactly one [`FetchTask`].
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub task: FetchTask,
    pub outcome: Result<String, FetchFailure>,
}

impl FetchResult {
    pub fn page(task: FetchTask, markup: impl Into<String>) -> Self {
        Self {
            task,
            outcome: Ok(markup.into()),
        }
    }

    pub fn failed(task: FetchTask, failure: FetchFailure) -> Self {
        Self {
            task,
            outcome: Err(failure),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn markup(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }
}
