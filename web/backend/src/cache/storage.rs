use crate::cache::types::CacheEntry;
use crate::error::CacheError;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

const WRITE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct CacheStorage {
    cache_file_path: PathBuf,
    entries: Arc<RwLock<FxHashMap<String, CacheEntry>>>,
    dirty: Arc<RwLock<bool>>,
}

impl CacheStorage {
    pub fn new(cache_file_path: PathBuf) -> Self {
        Self {
            cache_file_path,
            entries: Arc::new(RwLock::new(FxHashMap::default())),
            dirty: Arc::new(RwLock::new(false)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_file_path
    }

    pub async fn load_cache(&self) -> Result<(), CacheError> {
        if !self.cache_file_path.exists() {
            tracing::info!("No existing cache file found, starting with empty cache");
            return Ok(());
        }

        tracing::info!("Loading cache from {:?}", self.cache_file_path);

        let file_contents = tokio::fs::read(&self.cache_file_path).await?;

        match bincode::deserialize::<FxHashMap<String, CacheEntry>>(&file_contents) {
            Ok(loaded) => {
                let mut entries = self.entries.write().await;
                *entries = loaded;
                tracing::debug!("Loaded {} cache entries", entries.len());
            }
            Err(e) => {
                tracing::warn!("Failed to deserialize cache (will start fresh): {}", e);
            }
        }
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    pub async fn insert(&self, entry: CacheEntry) {
        {
            let mut entries = self.entries.write().await;
            entries.insert(entry.key.clone(), entry);
        }
        self.mark_dirty().await;
    }

    pub async fn remove_tagged(&self, tags: &[&str]) -> usize {
        let removed = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|_, entry| !entry.has_any_tag(tags));
            before - entries.len()
        };

        if removed > 0 {
            self.mark_dirty().await;
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn mark_dirty(&self) {
        let mut dirty = self.dirty.write().await;
        *dirty = true;
    }

    pub fn start_periodic_writes(&self) -> JoinHandle<()> {
        let storage = self.clone();
        tokio::spawn(async move {
            storage.periodic_write_task().await;
        })
    }

    async fn periodic_write_task(&self) {
        let mut interval = interval(WRITE_INTERVAL);

        loop {
            interval.tick().await;
            if let Err(e) = self.write_if_dirty().await {
                tracing::error!("Failed to write cache to disk: {}", e);
            }
        }
    }

    /// Inserts that land while the file is being written set the flag again
    /// and are picked up by the next write.
    pub async fn write_if_dirty(&self) -> Result<(), CacheError> {
        if !self.take_dirty().await {
            return Ok(());
        }

        if let Err(e) = self.write_cache_to_disk().await {
            self.mark_dirty().await;
            return Err(e);
        }
        Ok(())
    }

    async fn take_dirty(&self) -> bool {
        let mut dirty = self.dirty.write().await;
        std::mem::replace(&mut *dirty, false)
    }

    async fn write_cache_to_disk(&self) -> Result<(), CacheError> {
        let serialized = {
            let entries = self.entries.read().await;
            bincode::serialize(&*entries).map_err(|e| CacheError::Encode(e.to_string()))?
        };

        // Write to temp file first, then atomic rename
        let temp_path = self.cache_file_path.with_extension("cache.tmp");
        tokio::fs::write(&temp_path, serialized).await?;
        tokio::fs::rename(&temp_path, &self.cache_file_path).await?;

        tracing::debug!("Wrote cache to {:?}", self.cache_file_path);
        Ok(())
    }
}
