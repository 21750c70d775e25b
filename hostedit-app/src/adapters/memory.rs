//! In-memory storage adapters

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use hostedit_core::error::CoreResult;
use hostedit_core::traits::{HostRepository, PubkeyRepository};
use hostedit_core::types::{HostId, HostRecord, PubkeyChoice};
use tokio::sync::RwLock;

/// Host repository that lives as long as the process
pub struct InMemoryHostRepository {
    hosts: RwLock<BTreeMap<HostId, HostRecord>>,
    next_id: AtomicI64,
}

impl InMemoryHostRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosts: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryHostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostRepository for InMemoryHostRepository {
    async fn find_all(&self) -> CoreResult<Vec<HostRecord>> {
        Ok(self.hosts.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: HostId) -> CoreResult<Option<HostRecord>> {
        Ok(self.hosts.read().await.get(&id).cloned())
    }

    async fn save(&self, host: &HostRecord) -> CoreResult<HostId> {
        let id = match host.id {
            Some(id) => {
                // keep the counter ahead of ids assigned elsewhere
                self.next_id.fetch_max(id.get() + 1, Ordering::SeqCst);
                id
            }
            None => HostId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
        };

        let mut stored = host.clone();
        stored.id = Some(id);
        self.hosts.write().await.insert(id, stored);
        Ok(id)
    }

    async fn delete(&self, id: HostId) -> CoreResult<()> {
        self.hosts.write().await.remove(&id);
        Ok(())
    }
}

/// Fixed list of stored keys
#[derive(Default)]
pub struct InMemoryPubkeyRepository {
    keys: RwLock<Vec<PubkeyChoice>>,
}

impl InMemoryPubkeyRepository {
    #[must_use]
    pub fn new(keys: Vec<PubkeyChoice>) -> Self {
        Self {
            keys: RwLock::new(keys),
        }
    }

    pub async fn add(&self, key: PubkeyChoice) {
        self.keys.write().await.push(key);
    }
}

#[async_trait]
impl PubkeyRepository for InMemoryPubkeyRepository {
    async fn list_aliases(&self) -> CoreResult<Vec<PubkeyChoice>> {
        Ok(self.keys.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_assigns_ids_to_new_hosts() {
        let repo = InMemoryHostRepository::new();
        let first = repo
            .save(&HostRecord::new_ssh("a", "root", "a.example"))
            .await
            .unwrap();
        let second = repo
            .save(&HostRecord::new_ssh("b", "root", "b.example"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(repo.find_by_id(first).await.unwrap().unwrap().id, Some(first));
    }

    #[tokio::test]
    async fn save_updates_existing_host_in_place() {
        let repo = InMemoryHostRepository::new();
        let id = repo
            .save(&HostRecord::new_ssh("a", "root", "a.example"))
            .await
            .unwrap();

        let mut edited = repo.find_by_id(id).await.unwrap().unwrap();
        edited.encoding = "KOI8-R".to_string();
        assert_eq!(repo.save(&edited).await.unwrap(), id);

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].encoding, "KOI8-R");
    }

    #[tokio::test]
    async fn explicit_ids_do_not_collide_with_new_ones() {
        let repo = InMemoryHostRepository::new();
        let mut imported = HostRecord::new_ssh("imported", "root", "i.example");
        imported.id = Some(HostId::new(10));
        repo.save(&imported).await.unwrap();

        let fresh = repo
            .save(&HostRecord::new_ssh("fresh", "root", "f.example"))
            .await
            .unwrap();
        assert_eq!(fresh, HostId::new(11));
    }

    #[tokio::test]
    async fn delete_removes_host() {
        let repo = InMemoryHostRepository::new();
        let id = repo
            .save(&HostRecord::new_ssh("a", "root", "a.example"))
            .await
            .unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
