//! Public key listing abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::PubkeyChoice;

/// Read access to stored public keys, used only to fill the editor's key selector
#[async_trait]
pub trait PubkeyRepository: Send + Sync {
    /// Stored keys as (nickname, row id) pairs, in storage order
    async fn list_aliases(&self) -> CoreResult<Vec<PubkeyChoice>>;
}

/// Repository for front-ends without key storage
pub struct NoPubkeys;

#[async_trait]
impl PubkeyRepository for NoPubkeys {
    async fn list_aliases(&self) -> CoreResult<Vec<PubkeyChoice>> {
        Ok(Vec::new())
    }
}
