//! Host editing session
//!
//! Owns the record under edit for one editing session and gates the commit
//! action on the editor view's validation feedback.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult};
use crate::services::{EditorContext, SessionBinder};
use crate::traits::{EditorView, TerminalBridge};
use crate::types::{EditRequest, HostId, HostRecord, PubkeyChoice};

/// Fixed for the lifetime of one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Creating,
    EditingExisting(HostId),
}

impl EditMode {
    pub const fn host_id(self) -> Option<HostId> {
        match self {
            Self::Creating => None,
            Self::EditingExisting(id) => Some(id),
        }
    }
}

/// Whether the record under edit may be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Not committable. The last valid record is kept for display.
    Invalid { last_known: Option<HostRecord> },
    Valid(HostRecord),
}

impl Validity {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub const fn record(&self) -> Option<&HostRecord> {
        match self {
            Self::Valid(host) => Some(host),
            Self::Invalid { last_known } => last_known.as_ref(),
        }
    }
}

/// How front-ends should label the commit action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitLabel {
    Create,
    Save,
}

/// Editing session for a single host
pub struct EditorCoordinator {
    ctx: Arc<EditorContext>,
    view: Arc<dyn EditorView>,
    mode: EditMode,
    validity: Validity,
    pubkeys: Vec<PubkeyChoice>,
    binder: SessionBinder,
    catalog_delivery: Option<JoinHandle<()>>,
    finished: bool,
}

impl EditorCoordinator {
    /// Open an editing session.
    ///
    /// Editing an existing host loads it from storage first; an id that does
    /// not resolve aborts the session with `CoreError::HostNotFound`.
    pub async fn open(
        ctx: Arc<EditorContext>,
        request: EditRequest,
        view: Arc<dyn EditorView>,
    ) -> CoreResult<Self> {
        let (mode, validity) = match request.existing {
            None => (EditMode::Creating, Validity::Invalid { last_known: None }),
            Some(id) => {
                let host = ctx
                    .host_repository()
                    .find_by_id(id)
                    .await?
                    .ok_or(CoreError::HostNotFound(id))?;
                (EditMode::EditingExisting(id), Validity::Valid(host))
            }
        };

        let mut pubkeys = PubkeyChoice::builtin();
        pubkeys.extend(ctx.pubkey_repository().list_aliases().await?);

        view.show_host(validity.record(), &pubkeys);
        log::debug!("Opened host editor in {mode:?} mode");

        let binder = SessionBinder::new(Arc::clone(ctx.session_service()));
        Ok(Self {
            ctx,
            view,
            mode,
            validity,
            pubkeys,
            binder,
            catalog_delivery: None,
            finished: false,
        })
    }

    /// The editor became visible: deliver the charset catalog and bind to the
    /// session service. Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.finished {
            return;
        }
        self.deliver_catalog();
        self.binder.bind(self.mode.host_id());
    }

    /// The editor went to the background
    pub fn suspend(&mut self) {
        self.binder.unbind();
    }

    fn deliver_catalog(&mut self) {
        let catalog = self.ctx.catalog();
        if let Some(map) = catalog.try_get() {
            self.view.set_catalog(map);
            return;
        }

        if self
            .catalog_delivery
            .as_ref()
            .is_some_and(|task| !task.is_finished())
        {
            return;
        }

        log::debug!("Charset catalog not ready, building in background");
        let view = Arc::clone(&self.view);
        self.catalog_delivery = Some(catalog.request(move |map| view.set_catalog(map)));
    }

    /// Wait for a background catalog delivery scheduled by `start`, if any
    pub async fn wait_for_catalog(&mut self) {
        if let Some(task) = self.catalog_delivery.take() {
            if let Err(e) = task.await {
                log::error!("Charset catalog delivery failed: {e}");
            }
        }
    }

    /// Wait until the session service bind attempt settled. Returns whether
    /// the service is connected.
    pub async fn session_settled(&self) -> bool {
        self.binder.settled().await
    }

    /// The editor view validated its form
    pub fn on_validated(&mut self, mut host: HostRecord) {
        if self.finished {
            return;
        }
        // the identity belongs to the session, not to the form; storage
        // assigns one to new hosts
        host.id = self.mode.host_id();
        self.validity = Validity::Valid(host);
    }

    /// The editor view's form no longer validates
    pub fn on_invalidated(&mut self) {
        if self.finished {
            return;
        }
        let last_known = match std::mem::replace(
            &mut self.validity,
            Validity::Invalid { last_known: None },
        ) {
            Validity::Valid(host) => Some(host),
            Validity::Invalid { last_known } => last_known,
        };
        self.validity = Validity::Invalid { last_known };
    }

    pub fn can_commit(&self) -> bool {
        !self.finished && self.validity.is_valid()
    }

    /// The commit capability. Only exists while the record is valid.
    pub fn commit_action(&mut self) -> Option<CommitAction<'_>> {
        if self.finished {
            return None;
        }
        let host = match &self.validity {
            Validity::Valid(host) => host.clone(),
            Validity::Invalid { .. } => return None,
        };
        Some(CommitAction {
            host,
            coordinator: self,
        })
    }

    /// Front-end commit trigger.
    ///
    /// Returns `Ok(None)` without touching storage when nothing is
    /// committable.
    pub async fn on_commit(&mut self) -> CoreResult<Option<HostId>> {
        match self.commit_action() {
            Some(action) => action.run().await.map(Some),
            None => {
                log::warn!("Commit requested while the host is not committable");
                Ok(None)
            }
        }
    }

    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    pub const fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Record shown in the editor, committable or not
    pub const fn current_host(&self) -> Option<&HostRecord> {
        self.validity.record()
    }

    pub fn pubkey_choices(&self) -> &[PubkeyChoice] {
        &self.pubkeys
    }

    pub const fn commit_label(&self) -> CommitLabel {
        match self.mode {
            EditMode::Creating => CommitLabel::Create,
            EditMode::EditingExisting(_) => CommitLabel::Save,
        }
    }

    /// Live session of the host under edit, if the service reported one
    pub fn live_bridge(&self) -> Option<Arc<dyn TerminalBridge>> {
        self.binder.current_bridge()
    }

    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Permission to commit a validated record
pub struct CommitAction<'a> {
    host: HostRecord,
    coordinator: &'a mut EditorCoordinator,
}

impl CommitAction<'_> {
    /// Record that will be saved
    pub const fn host(&self) -> &HostRecord {
        &self.host
    }

    /// Save the record, push its encoding into a live session if one is
    /// open, and end the editing session.
    ///
    /// A storage failure leaves the session open and the record valid so the
    /// commit can be retried.
    pub async fn run(self) -> CoreResult<HostId> {
        let Self {
            mut host,
            coordinator,
        } = self;

        let id = coordinator.ctx.host_repository().save(&host).await?;
        host.id = Some(id);
        log::info!("Saved host {id} ({})", host.nickname);

        coordinator.binder.push_encoding_change(&host.encoding);

        coordinator.binder.unbind();
        coordinator.validity = Validity::Valid(host);
        coordinator.finished = true;
        Ok(id)
    }
}
