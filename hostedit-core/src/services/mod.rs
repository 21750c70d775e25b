//! Editing workflow services

mod editor_coordinator;
mod session_binder;

pub use editor_coordinator::{CommitAction, CommitLabel, EditMode, EditorCoordinator, Validity};
pub use session_binder::{LinkState, SessionBinder};

use std::sync::Arc;

use crate::charset::CharsetCatalog;
use crate::traits::{HostRepository, PubkeyRepository, SessionService};

/// Service context - holds all collaborators of an editing session
///
/// The platform layer creates this once and injects its storage and session
/// service implementations.
pub struct EditorContext {
    host_repository: Arc<dyn HostRepository>,
    pubkey_repository: Arc<dyn PubkeyRepository>,
    session_service: Arc<dyn SessionService>,
    catalog: Arc<CharsetCatalog>,
}

impl EditorContext {
    #[must_use]
    pub fn new(
        host_repository: Arc<dyn HostRepository>,
        pubkey_repository: Arc<dyn PubkeyRepository>,
        session_service: Arc<dyn SessionService>,
        catalog: Arc<CharsetCatalog>,
    ) -> Self {
        Self {
            host_repository,
            pubkey_repository,
            session_service,
            catalog,
        }
    }

    pub fn host_repository(&self) -> &Arc<dyn HostRepository> {
        &self.host_repository
    }

    pub fn pubkey_repository(&self) -> &Arc<dyn PubkeyRepository> {
        &self.pubkey_repository
    }

    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.session_service
    }

    pub fn catalog(&self) -> &Arc<CharsetCatalog> {
        &self.catalog
    }
}
