//! In-process session-management service
//!
//! Tracks the terminal sessions this process has open. Editors connect to it
//! through the `SessionService` trait and only ever hold weak references to
//! its bridges.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use async_trait::async_trait;
use hostedit_core::error::{CoreError, CoreResult};
use hostedit_core::traits::{SessionHandle, SessionService, TerminalBridge};
use hostedit_core::types::{HostId, HostRecord};
use tokio::sync::watch;

/// A terminal session opened by [`LocalTerminalManager`]
pub struct LocalBridge {
    host_id: HostId,
    nickname: String,
    charset: Mutex<String>,
}

impl LocalBridge {
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Charset the session currently decodes with
    pub fn charset(&self) -> String {
        self.charset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TerminalBridge for LocalBridge {
    fn host_id(&self) -> HostId {
        self.host_id
    }

    fn set_charset(&self, charset: &str) {
        log::info!("Session {} switching charset to {charset}", self.nickname);
        *self.charset.lock().unwrap_or_else(PoisonError::into_inner) = charset.to_string();
    }
}

type Sessions = Arc<RwLock<HashMap<HostId, Arc<LocalBridge>>>>;

/// In-process session-management service
pub struct LocalTerminalManager {
    sessions: Sessions,
    shutdown: watch::Sender<bool>,
}

impl LocalTerminalManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            shutdown: watch::channel(false).0,
        }
    }

    /// Open a session for a saved host, or return the one already open
    pub fn open_session(&self, host: &HostRecord) -> CoreResult<Arc<LocalBridge>> {
        if *self.shutdown.borrow() {
            return Err(CoreError::ServiceUnavailable(
                "terminal manager is shut down".to_string(),
            ));
        }
        let id = host.id.ok_or_else(|| {
            CoreError::ValidationError("cannot open a session for an unsaved host".to_string())
        })?;

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let bridge = sessions.entry(id).or_insert_with(|| {
            log::info!("Opening session for host {id} ({})", host.nickname);
            Arc::new(LocalBridge {
                host_id: id,
                nickname: host.nickname.clone(),
                charset: Mutex::new(host.encoding.clone()),
            })
        });
        Ok(Arc::clone(bridge))
    }

    pub fn close_session(&self, id: HostId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            log::info!("Closed session for host {id}");
        }
        removed
    }

    pub fn session(&self, id: HostId) -> Option<Arc<LocalBridge>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Close every session and disconnect every connected editor
    pub fn shutdown(&self) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.shutdown.send_replace(true);
        log::info!("Terminal manager shut down");
    }
}

impl Default for LocalTerminalManager {
    fn default() -> Self {
        Self::new()
    }
}

struct LocalSessionHandle {
    sessions: Sessions,
    shutdown: watch::Receiver<bool>,
}

#[async_trait]
impl SessionHandle for LocalSessionHandle {
    fn resolve_bridge(&self, host: HostId) -> Option<Weak<dyn TerminalBridge>> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(&host).map(|bridge| {
            let weak = Arc::downgrade(bridge);
            weak as Weak<dyn TerminalBridge>
        })
    }

    async fn closed(&self) {
        let mut shutdown = self.shutdown.clone();
        let _ = shutdown.wait_for(|down| *down).await;
    }
}

#[async_trait]
impl SessionService for LocalTerminalManager {
    async fn connect(&self) -> CoreResult<Arc<dyn SessionHandle>> {
        if *self.shutdown.borrow() {
            return Err(CoreError::ServiceUnavailable(
                "terminal manager is shut down".to_string(),
            ));
        }
        Ok(Arc::new(LocalSessionHandle {
            sessions: Arc::clone(&self.sessions),
            shutdown: self.shutdown.subscribe(),
        }))
    }
}
