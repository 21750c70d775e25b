//! JSON file host repository
//!
//! Keeps every host in a single JSON document. File I/O runs on the
//! blocking pool; the parsed document is cached after the first read.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use hostedit_core::error::{CoreError, CoreResult};
use hostedit_core::traits::HostRepository;
use hostedit_core::types::{HostId, HostRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// On-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostStoreFile {
    next_id: i64,
    hosts: Vec<HostRecord>,
}

impl HostStoreFile {
    fn allocate_id(&mut self) -> HostId {
        let highest = self
            .hosts
            .iter()
            .filter_map(|h| h.id.map(HostId::get))
            .max()
            .unwrap_or(0);
        let id = self.next_id.max(highest + 1).max(1);
        self.next_id = id + 1;
        HostId::new(id)
    }
}

/// Host repository persisted to a JSON file
pub struct JsonFileHostRepository {
    path: PathBuf,
    cache: Arc<RwLock<Option<HostStoreFile>>>,
}

impl JsonFileHostRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sync(path: &Path) -> CoreResult<HostStoreFile> {
        if !path.exists() {
            log::debug!("Host store {path:?} does not exist yet");
            return Ok(HostStoreFile::default());
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store metadata: {e}")))?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(HostStoreFile::default());
        }
        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid host store format: {e}")))
    }

    fn write_sync(path: &Path, store: &HostStoreFile) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }
        let json = serde_json::to_string_pretty(store)?;

        // write-then-rename so a crash never leaves a truncated store
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| CoreError::StorageError(format!("Failed to write store file: {e}")))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| CoreError::StorageError(format!("Failed to replace store file: {e}")))
    }

    async fn load(&self) -> CoreResult<HostStoreFile> {
        {
            let cache = self.cache.read().await;
            if let Some(ref store) = *cache {
                return Ok(store.clone());
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(ref store) = *cache {
            return Ok(store.clone());
        }

        let path = self.path.clone();
        let store = tokio::task::spawn_blocking(move || Self::read_sync(&path))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;
        log::info!("Loaded {} hosts from {:?}", store.hosts.len(), self.path);
        *cache = Some(store.clone());
        Ok(store)
    }

    /// Apply `change` to the document and persist it, holding the cache
    /// lock for the whole read-modify-write.
    async fn modify<T, F>(&self, change: F) -> CoreResult<T>
    where
        F: FnOnce(&mut HostStoreFile) -> T + Send,
        T: Send,
    {
        let mut cache = self.cache.write().await;

        let mut store = match cache.take() {
            Some(store) => store,
            None => {
                let path = self.path.clone();
                tokio::task::spawn_blocking(move || Self::read_sync(&path))
                    .await
                    .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??
            }
        };

        let result = change(&mut store);

        let path = self.path.clone();
        let to_write = store.clone();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, &to_write))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;

        *cache = Some(store);
        Ok(result)
    }
}

#[async_trait]
impl HostRepository for JsonFileHostRepository {
    async fn find_all(&self) -> CoreResult<Vec<HostRecord>> {
        Ok(self.load().await?.hosts)
    }

    async fn find_by_id(&self, id: HostId) -> CoreResult<Option<HostRecord>> {
        Ok(self
            .load()
            .await?
            .hosts
            .into_iter()
            .find(|h| h.id == Some(id)))
    }

    async fn save(&self, host: &HostRecord) -> CoreResult<HostId> {
        let mut host = host.clone();
        let id = self
            .modify(move |store| {
                let id = match host.id {
                    Some(id) => id,
                    None => store.allocate_id(),
                };
                host.id = Some(id);
                match store.hosts.iter_mut().find(|h| h.id == Some(id)) {
                    Some(existing) => *existing = host,
                    None => store.hosts.push(host),
                }
                id
            })
            .await?;
        log::debug!("Host {id} written to {:?}", self.path);
        Ok(id)
    }

    async fn delete(&self, id: HostId) -> CoreResult<()> {
        self.modify(|store| store.hosts.retain(|h| h.id != Some(id)))
            .await
    }
}
