//! Model resolution for the vLLM path.
//!
//! Every resolution re-queries `/v1/models`. The last successful catalog is
//! kept as an atomically swapped snapshot for diagnostics only; nothing reads
//! it to make a decision.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use spark_core::{Backend, ModelList};
use tracing::debug;

use crate::config::endpoint_url;
use crate::forward::{Upstream, get_json};

/// Queries a backend's model catalog.
#[derive(Debug)]
pub struct ModelResolver {
    base_url: String,
    timeout: Duration,
    last: Mutex<Option<Arc<ModelList>>>,
}

impl ModelResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            last: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the catalog. On success the snapshot is replaced; on any
    /// failure it is left untouched and `None` is returned.
    pub async fn refresh(&self) -> Option<Arc<ModelList>> {
        let url = endpoint_url(&self.base_url, "/v1/models").ok()?;
        let upstream = Upstream::new(Backend::Vllm, &self.base_url, self.timeout);

        match get_json::<ModelList>(&upstream, &url).await {
            Ok(list) => {
                let list = Arc::new(list);
                *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&list));
                Some(list)
            }
            Err(e) => {
                debug!(url = %url, "Model catalog unavailable: {e}");
                None
            }
        }
    }

    /// Model identifiers in backend order; empty when the backend is down.
    pub async fn list_models(&self) -> Vec<String> {
        self.refresh().await.map(|list| list.ids()).unwrap_or_default()
    }

    /// First served model, re-queried on every call.
    pub async fn default_model(&self) -> Option<String> {
        self.refresh()
            .await
            .and_then(|list| list.first_id().map(str::to_string))
    }

    /// Last successfully fetched catalog, if any.
    pub fn last_snapshot(&self) -> Option<Arc<ModelList>> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
