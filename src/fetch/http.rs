//! HTTP adapter for the remote search endpoint.
//!
//! The endpoint has no "list all" call, so the catalog is assembled by
//! querying once per partition key (one letter each) and unioning the
//! results.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::Meal;
use crate::config::SourceConfig;
use crate::fetch::error::FetchError;
use crate::fetch::source::{dedupe_last_wins, MealSource};
use crate::fetch::wire::SearchResponse;

/// Partitioned fetcher backed by `reqwest`.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// limiter.
#[derive(Clone)]
pub struct HttpMealSource {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: Url,
    config: SourceConfig,
    limiter: Semaphore,
}

impl HttpMealSource {
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| FetchError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("mealdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        let permits = (config.max_concurrent_requests as usize).max(1);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url,
                config,
                limiter: Semaphore::new(permits),
            }),
        })
    }

    /// URL queried for one partition key.
    pub fn partition_url(&self, partition: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.inner.config.partition_param, partition);
        url
    }

    /// Fetch one partition, retrying transient failures with exponential
    /// backoff.
    pub async fn fetch_partition(&self, partition: &str) -> Result<Vec<Meal>, FetchError> {
        let config = &self.inner.config;
        let mut attempt: u32 = 0;

        loop {
            match self.request_once(partition).await {
                Ok(meals) => return Ok(meals),
                Err(err) if err.is_transient() && attempt < config.max_retries => {
                    let backoff = config
                        .retry_backoff_base_ms
                        .saturating_mul(1u64 << attempt.min(16));
                    tracing::debug!(
                        partition = %partition,
                        attempt = attempt + 1,
                        backoff_ms = backoff,
                        error = %err,
                        "Retrying partition request"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn request_once(&self, partition: &str) -> Result<Vec<Meal>, FetchError> {
        let url = self.partition_url(partition);
        let request_error = |source| FetchError::Request {
            partition: partition.to_string(),
            source,
        };

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                partition: partition.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                partition: partition.to_string(),
                source,
            })?;

        Ok(parsed.into_meals())
    }
}

#[async_trait]
impl MealSource for HttpMealSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_all(&self) -> Vec<Meal> {
        let started = Instant::now();
        let partitions = self.inner.config.partitions.clone();
        let total = partitions.len();

        // Dropping the set aborts every request still running, so a
        // cancelled fetch stops hitting the network.
        let mut tasks = JoinSet::new();
        for (index, partition) in partitions.iter().enumerate() {
            let source = self.clone();
            let key = partition.clone();
            tasks.spawn(async move {
                let _permit = source.inner.limiter.acquire().await;
                (index, source.fetch_partition(&key).await)
            });
        }

        let mut results: Vec<Option<Vec<Meal>>> = vec![None; total];
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(meals))) => {
                    tracing::trace!(partition = %partitions[index], count = meals.len(), "Partition fetched");
                    results[index] = Some(meals);
                }
                Ok((index, Err(err))) => {
                    failed += 1;
                    tracing::warn!(partition = %partitions[index], error = %err, "Partition fetch failed, skipping");
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(error = %err, "Partition task aborted, skipping");
                }
            }
        }

        // Reassembled in partition order so dedup is deterministic.
        let batches = results.into_iter().flatten();

        if total > 0 && failed == total {
            tracing::warn!(partitions = total, "Every partition request failed; no meals fetched");
        }

        let meals = dedupe_last_wins(batches);
        tracing::info!(
            meals = meals.len(),
            partitions = total,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch complete"
        );
        meals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_url_appends_query() {
        let source = HttpMealSource::new(SourceConfig::default()).unwrap();
        let url = source.partition_url("b");
        assert_eq!(
            url.as_str(),
            "https://www.themealdb.com/api/json/v1/1/search.php?f=b"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = SourceConfig {
            base_url: "not a url".to_string(),
            ..SourceConfig::default()
        };
        assert!(matches!(
            HttpMealSource::new(config),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
    }
}
