pub mod storage;
pub mod types;

use crate::cache::storage::CacheStorage;
use crate::error::CacheError;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::Path;
use std::time::Instant;
use tokio::task::JoinHandle;

pub use types::{Beta, CacheEntry, Computed};

const CACHE_FILE_NAME: &str = "app.cache";

/// Key-value cache with per-entry expiry and tags, persisted to one file per
/// environment.
#[derive(Clone)]
pub struct CachePool {
    storage: CacheStorage,
}

impl CachePool {
    /// Opens (or creates) `<cache_root>/<env>/app.cache`.
    pub async fn open(cache_root: &Path, env: &str) -> Result<Self, CacheError> {
        let cache_dir = cache_root.join(env);
        tokio::fs::create_dir_all(&cache_dir).await?;

        let storage = CacheStorage::new(cache_dir.join(CACHE_FILE_NAME));
        storage.load_cache().await?;

        Ok(Self { storage })
    }

    /// Returns the cached value for `key`, running `supplier` once when the
    /// entry is missing, stale, or picked for early refresh by `beta`.
    ///
    /// Whatever the supplier returns is stored, including its expiry; a
    /// supplier that failed should return `Computed::expired_now` so the next
    /// call tries again.
    pub async fn get<T, F, Fut>(&self, key: &str, beta: Beta, supplier: F) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Computed<T>>,
    {
        if let Some(entry) = self.storage.get(key).await {
            if !beta.should_recompute(&entry, Utc::now()) {
                match serde_json::from_str::<T>(&entry.payload) {
                    Ok(value) => return Ok(value),
                    Err(e) => tracing::warn!(key, "Cached payload unreadable, recomputing: {}", e),
                }
            }
        }

        let started = Instant::now();
        let computed = supplier().await;
        let compute_ms = started.elapsed().as_millis() as u64;

        let payload =
            serde_json::to_string(&computed.value).map_err(|e| CacheError::Encode(e.to_string()))?;
        self.storage
            .insert(CacheEntry {
                key: key.to_string(),
                payload,
                expires_at: computed.expires_at,
                tags: computed.tags,
                compute_ms,
            })
            .await;

        Ok(computed.value)
    }

    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.storage.get(key).await
    }

    /// Drops every entry carrying at least one of `tags`.
    pub async fn invalidate_tags(&self, tags: &[&str]) -> usize {
        let removed = self.storage.remove_tagged(tags).await;
        tracing::debug!("Invalidated {} cache entries tagged {:?}", removed, tags);
        removed
    }

    pub async fn len(&self) -> usize {
        self.storage.len().await
    }

    pub async fn flush(&self) -> Result<(), CacheError> {
        self.storage.write_if_dirty().await
    }

    pub fn start_periodic_writes(&self) -> JoinHandle<()> {
        self.storage.start_periodic_writes()
    }

    pub fn file_path(&self) -> &Path {
        self.storage.path()
    }
}
