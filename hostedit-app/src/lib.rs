//! Platform-agnostic application bootstrap for the host editor.
//!
//! Provides `AppState` (collaborator container) and `AppStateBuilder`
//! (adapter injection). Every frontend builds one `AppState` at startup and
//! opens editing sessions through it.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use hostedit_core::charset::CharsetCatalog;
use hostedit_core::error::{CoreError, CoreResult};
use hostedit_core::services::{EditorContext, EditorCoordinator};
use hostedit_core::traits::{
    EditorView, EncodingSource, HostRepository, NoPubkeys, PubkeyRepository, SessionService,
};
use hostedit_core::types::{EditRequest, HostRecord};
use tokio::task::JoinHandle;

use config::AppConfig;

/// Platform-agnostic application state.
pub struct AppState {
    /// Collaborators shared by every editing session
    pub ctx: Arc<EditorContext>,
    pub config: AppConfig,
}

impl AppState {
    /// Run the startup sequence.
    ///
    /// Schedules the charset catalog build in the background when
    /// `prewarm_catalog` is set, so the first editor gets it without waiting.
    /// Must be called from within a tokio runtime.
    pub fn run_startup(&self) -> Option<JoinHandle<()>> {
        let catalog = self.ctx.catalog();
        if !self.config.prewarm_catalog || catalog.is_ready() {
            return None;
        }
        log::debug!("Prewarming charset catalog");
        Some(catalog.request(|map| {
            log::debug!("Charset catalog prewarmed ({} entries)", map.len());
        }))
    }

    /// Open an editing session for a new or existing host
    pub async fn open_editor(
        &self,
        request: EditRequest,
        view: Arc<dyn EditorView>,
    ) -> CoreResult<EditorCoordinator> {
        EditorCoordinator::open(Arc::clone(&self.ctx), request, view).await
    }

    /// Unsaved host carrying the configured defaults
    #[must_use]
    pub fn blank_host(&self, nickname: &str, username: &str, hostname: &str) -> HostRecord {
        HostRecord::new_ssh(nickname, username, hostname)
            .with_encoding(self.config.default_encoding.clone())
    }

    /// All stored hosts, ordered by nickname
    pub async fn list_hosts(&self) -> CoreResult<Vec<HostRecord>> {
        let mut hosts = self.ctx.host_repository().find_all().await?;
        hosts.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(hosts)
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `host_repository`: where host records live
/// - `session_service`: the session-management service
///
/// # Optional
/// - `pubkey_repository`: defaults to no stored keys
/// - `catalog` / `encoding_source`: defaults to the process-wide catalog
/// - `config`: defaults to `AppConfig::default()`
pub struct AppStateBuilder {
    host_repository: Option<Arc<dyn HostRepository>>,
    pubkey_repository: Option<Arc<dyn PubkeyRepository>>,
    session_service: Option<Arc<dyn SessionService>>,
    catalog: Option<Arc<CharsetCatalog>>,
    config: Option<AppConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            host_repository: None,
            pubkey_repository: None,
            session_service: None,
            catalog: None,
            config: None,
        }
    }

    #[must_use]
    pub fn host_repository(mut self, repo: Arc<dyn HostRepository>) -> Self {
        self.host_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn pubkey_repository(mut self, repo: Arc<dyn PubkeyRepository>) -> Self {
        self.pubkey_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn session_service(mut self, service: Arc<dyn SessionService>) -> Self {
        self.session_service = Some(service);
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Arc<CharsetCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a private catalog over `source` instead of the process-wide one
    #[must_use]
    pub fn encoding_source(mut self, source: Arc<dyn EncodingSource>) -> Self {
        self.catalog = Some(Arc::new(CharsetCatalog::new(source)));
        self
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let host_repository = self.host_repository.ok_or_else(|| {
            CoreError::ValidationError("host_repository is required".to_string())
        })?;
        let session_service = self.session_service.ok_or_else(|| {
            CoreError::ValidationError("session_service is required".to_string())
        })?;
        let pubkey_repository = self
            .pubkey_repository
            .unwrap_or_else(|| Arc::new(NoPubkeys));
        let catalog = self.catalog.unwrap_or_else(CharsetCatalog::global);

        let ctx = Arc::new(EditorContext::new(
            host_repository,
            pubkey_repository,
            session_service,
            catalog,
        ));

        Ok(AppState {
            ctx,
            config: self.config.unwrap_or_default(),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
