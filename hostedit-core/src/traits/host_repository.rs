//! Host persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{HostId, HostRecord};

/// Host record storage Trait
///
/// Platform implementation:
/// - `InMemoryHostRepository` (tests, ephemeral sessions)
/// - `JsonFileHostRepository` (CLI)
#[async_trait]
pub trait HostRepository: Send + Sync {
    /// Get all hosts
    async fn find_all(&self) -> CoreResult<Vec<HostRecord>>;

    /// Get host based on ID
    ///
    /// # Returns
    /// * `Ok(Some(host))` - host exists
    /// * `Ok(None)` - no host with this id
    async fn find_by_id(&self, id: HostId) -> CoreResult<Option<HostRecord>>;

    /// Save host (new or update)
    ///
    /// Records without an id are assigned one. Returns the stored id.
    async fn save(&self, host: &HostRecord) -> CoreResult<HostId>;

    /// Delete host
    async fn delete(&self, id: HostId) -> CoreResult<()>;
}
