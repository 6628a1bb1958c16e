// Response cache in front of the upstream API. Successful documents are kept
// for the configured TTL, keyed by the full request URL. Failures are never
// stored so a transient upstream error does not stick.
use crate::client::{Document, Fetch};
use crate::errors::UpstreamError;
use crate::metrics_defs::{CACHE_HIT, CACHE_MISS};
use async_trait::async_trait;
use moka::future::Cache;
use shared::counter;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct CachedFetch {
    inner: Arc<dyn Fetch>,
    cache: Cache<String, Document>,
}

impl CachedFetch {
    pub fn new(inner: Arc<dyn Fetch>, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        CachedFetch { inner, cache }
    }
}

#[async_trait]
impl Fetch for CachedFetch {
    async fn get(&self, url: &Url) -> Result<Document, UpstreamError> {
        let key = url.as_str().to_owned();

        if let Some(document) = self.cache.get(&key).await {
            counter!(CACHE_HIT).increment(1);
            return Ok(document);
        }
        counter!(CACHE_MISS).increment(1);

        // Concurrent misses on the same URL share a single upstream request.
        self.cache
            .try_get_with(key, self.inner.get(url))
            .await
            .map_err(|e| e.as_ref().clone())
    }
}
