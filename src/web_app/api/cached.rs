// web_app/api/cached.rs - Caching and retrying wrapper around a backend
//
// Reads are cached per query for `ttl`; concurrent identical reads share one
// backend call. Transient failures are retried with exponential backoff.
// A successful write clears everything, since a new comment changes both the
// product detail and its rating in listings. Entries are keyed by a cache
// generation as well, so a read that started before a write can never be
// served after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use moka::future::Cache;
use tracing::{debug, info, warn};

use super::client::{ProductFetchClient, SharedClient};
use crate::config::{Backend, Config};
use crate::web_app::error::FetchError;
use crate::web_app::model::{
    Comment, FetchKey, FilterState, NewComment, PageRequest, PagedResult, Product, ProductInput,
};
use crate::web_app::session::{Credentials, User};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub max_capacity: u64,
    /// Extra attempts after the first for transient failures
    pub retries: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1_000,
            retries: 2,
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl: config.cache_ttl(),
            retries: config.fetch_retries,
            min_delay: config.retry_min_delay(),
            ..Self::default()
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay.max(self.min_delay))
            .with_max_times(self.retries)
            .with_jitter()
    }
}

pub struct CachedFetchClient {
    inner: SharedClient,
    policy: CachePolicy,
    generation: AtomicU64,
    lists: Cache<(u64, FetchKey), PagedResult<Product>>,
    details: Cache<(u64, String), Option<Product>>,
}

impl CachedFetchClient {
    pub fn new(inner: SharedClient, policy: CachePolicy) -> Self {
        let lists = Cache::builder()
            .max_capacity(policy.max_capacity)
            .time_to_live(policy.ttl)
            .build();
        let details = Cache::builder()
            .max_capacity(policy.max_capacity)
            .time_to_live(policy.ttl)
            .build();
        Self {
            inner,
            policy,
            generation: AtomicU64::new(0),
            lists,
            details,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Drop every cached response, including loads still in flight
    pub fn invalidate_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Invalidating product cache (generation {})", generation);
        self.lists.invalidate_all();
        self.details.invalidate_all();
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

fn log_retry(what: &'static str) -> impl Fn(&FetchError, Duration) {
    move |e, dur| {
        warn!(
            "{} failed, retrying after {:.2}s: {}",
            what,
            dur.as_secs_f64(),
            e
        )
    }
}

fn unshare(e: Arc<FetchError>) -> FetchError {
    Arc::unwrap_or_clone(e)
}

#[async_trait]
impl ProductFetchClient for CachedFetchClient {
    fn backend(&self) -> Backend {
        self.inner.backend()
    }

    async fn fetch_products(
        &self,
        filters: &FilterState,
        page: PageRequest,
    ) -> Result<PagedResult<Product>, FetchError> {
        let key = (self.current_generation(), FetchKey::new(filters, page));
        if self.lists.contains_key(&key) {
            debug!("Product cache hit for {}", key.1);
        }
        let load = || async { self.inner.fetch_products(filters, page).await };
        self.lists
            .try_get_with(
                key,
                load.retry(self.policy.backoff())
                    .when(FetchError::is_retryable)
                    .notify(log_retry("Product list fetch")),
            )
            .await
            .map_err(unshare)
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, FetchError> {
        let load = || async { self.inner.get_product(id).await };
        self.details
            .try_get_with(
                (self.current_generation(), id.to_string()),
                load.retry(self.policy.backoff())
                    .when(FetchError::is_retryable)
                    .notify(log_retry("Product fetch")),
            )
            .await
            .map_err(unshare)
    }

    async fn post_comment(&self, comment: &NewComment, token: &str) -> Result<Comment, FetchError> {
        let created = self.inner.post_comment(comment, token).await?;
        self.invalidate_all();
        Ok(created)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, FetchError> {
        self.inner.login(credentials).await
    }

    async fn create_product(&self, input: &ProductInput, token: &str) -> Result<Product, FetchError> {
        let created = self.inner.create_product(input, token).await?;
        self.invalidate_all();
        Ok(created)
    }

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, FetchError> {
        let updated = self.inner.update_product(id, input, token).await?;
        self.invalidate_all();
        Ok(updated)
    }
}
