//! Single-flight, cache-backed retrieval of JSON documents.
//!
//! Concurrent requests for the same URL are deduplicated into one shared
//! in-flight future, so N callers racing on a cold URL cost exactly one
//! network call and all observe the same outcome. Cached documents are held
//! for the life of the process; there is no eviction, retry, or timeout.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

/// Fetch-layer error taxonomy.
///
/// `Clone` is required so one shared in-flight future can hand the identical
/// failure to every waiter. "Not found" at the data level is never an error;
/// callers get `Option::None` from the layers above instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Response body was not valid JSON.
    #[error("error parsing response from {url} (not JSON): {message}")]
    Parse { url: String, message: String },

    /// Non-success response status.
    #[error("{status} {status_text}")]
    Http { status: u16, status_text: String },

    /// Transport-level failure.
    #[error("error requesting data from {url}: {message}")]
    Network { url: String, message: String },
}

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound port for the actual HTTP round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError>;
}

/// Production transport over `reqwest`.
///
/// Imposes no timeout; callers relying on this layer must bring their own.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
        let network_err = |e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(network_err)?;
        let status = response.status();
        let body = response.text().await.map_err(network_err)?;
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, FetchError>>>;

/// Deduplicating, memoizing JSON fetcher.
///
/// The in-flight map stores the shared future itself rather than a completion
/// flag, so a second caller arriving mid-request joins the pending request
/// instead of observing "not loaded yet" and starting another one.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    cache: Mutex<HashMap<String, Arc<Value>>>,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Request a JSON document, deduplicating concurrent requests for the
    /// same URL into a single network call.
    ///
    /// A document cached by an earlier call is always served from cache; a
    /// URL cached once stays cached even if a later call passes
    /// `use_cache = false`. On a miss, `use_cache` decides whether the parsed
    /// document is stored. Callers joining an in-flight request inherit the
    /// cache policy of the caller that opened it.
    pub async fn fetch_json(
        self: &Arc<Self>,
        url: &str,
        use_cache: bool,
    ) -> Result<Arc<Value>, FetchError> {
        if let Some(cached) = self.cache.lock().await.get(url) {
            tracing::debug!(url, "serving from cache");
            return Ok(Arc::clone(cached));
        }

        let request = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(url) {
                Some(pending) => {
                    tracing::debug!(url, "joining in-flight request");
                    pending.clone()
                }
                None => {
                    let request = Self::request(Arc::clone(self), url.to_string(), use_cache)
                        .boxed()
                        .shared();
                    in_flight.insert(url.to_string(), request.clone());
                    request
                }
            }
        };
        request.await
    }

    /// Perform the request and drop the in-flight entry once settled,
    /// success or failure.
    async fn request(this: Arc<Self>, url: String, use_cache: bool) -> Result<Arc<Value>, FetchError> {
        let result = this.perform(&url, use_cache).await;
        this.in_flight.lock().await.remove(&url);
        result
    }

    async fn perform(&self, url: &str, use_cache: bool) -> Result<Arc<Value>, FetchError> {
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }
        let value: Value = serde_json::from_str(&response.body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let value = Arc::new(value);

        if use_cache {
            self.cache
                .lock()
                .await
                .insert(url.to_string(), Arc::clone(&value));
        }
        Ok(value)
    }
}
