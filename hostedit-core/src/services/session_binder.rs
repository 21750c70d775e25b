//! Session service binding
//!
//! Connects to the session-management service for the duration of an
//! editing session and resolves the live bridge of the host under edit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::traits::{SessionHandle, SessionService, TerminalBridge};
use crate::types::HostId;

/// Observable connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    /// A connect request is in flight
    Connecting,
    Connected,
}

enum Connection {
    Disconnected,
    Connected {
        // keeps the service connection alive while bound
        _handle: Arc<dyn SessionHandle>,
        bridge: Option<Weak<dyn TerminalBridge>>,
    },
}

struct BinderState {
    connection: Connection,
    /// Bumped on every bind/unbind so late connects can tell they are stale
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct Shared {
    state: Mutex<BinderState>,
    link: watch::Sender<LinkState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BinderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bind/unbind lifecycle to the session-management service
pub struct SessionBinder {
    service: Arc<dyn SessionService>,
    shared: Arc<Shared>,
}

impl SessionBinder {
    #[must_use]
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        let (link, _) = watch::channel(LinkState::Disconnected);
        Self {
            service,
            shared: Arc::new(Shared {
                state: Mutex::new(BinderState {
                    connection: Connection::Disconnected,
                    generation: 0,
                    task: None,
                }),
                link,
            }),
        }
    }

    /// Start connecting to the service in the background.
    ///
    /// Rebinding drops any previous connection first. `host` is `None` for a
    /// host that has never been saved; no bridge can exist for it. Must be
    /// called from within a tokio runtime.
    pub fn bind(&self, host: Option<HostId>) {
        let mut state = self.shared.lock();
        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.generation += 1;
        state.connection = Connection::Disconnected;
        self.shared.link.send_replace(LinkState::Connecting);

        let generation = state.generation;
        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        state.task = Some(tokio::spawn(async move {
            let handle = match service.connect().await {
                Ok(handle) => handle,
                Err(e) => {
                    log::warn!("Session service unavailable, live updates disabled: {e}");
                    let state = shared.lock();
                    if state.generation == generation {
                        shared.link.send_replace(LinkState::Disconnected);
                    }
                    return;
                }
            };

            let bridge = host.and_then(|id| handle.resolve_bridge(id));
            {
                let mut state = shared.lock();
                if state.generation != generation {
                    return;
                }
                match host {
                    Some(id) if bridge.is_some() => {
                        log::debug!("Bound to session service, live session found for host {id}");
                    }
                    _ => log::debug!("Bound to session service, no live session for this host"),
                }
                state.connection = Connection::Connected {
                    _handle: Arc::clone(&handle),
                    bridge,
                };
                shared.link.send_replace(LinkState::Connected);
            }

            handle.closed().await;

            let mut state = shared.lock();
            if state.generation == generation {
                log::info!("Session service disconnected");
                state.connection = Connection::Disconnected;
                shared.link.send_replace(LinkState::Disconnected);
            }
        }));
    }

    /// Tear the connection down. The bridge is gone for every later read.
    pub fn unbind(&self) {
        if self.disconnect() {
            log::debug!("Unbound from session service");
        }
    }

    /// Drop the connection after the service went away out-of-band
    pub fn on_service_disconnected(&self) {
        if self.disconnect() {
            log::info!("Session service connection lost");
        }
    }

    /// Returns whether anything was bound
    fn disconnect(&self) -> bool {
        let mut state = self.shared.lock();
        state.generation += 1;
        let had_task = state.task.take().map(|task| task.abort()).is_some();
        let was_connected = matches!(state.connection, Connection::Connected { .. });
        state.connection = Connection::Disconnected;
        self.shared.link.send_replace(LinkState::Disconnected);
        had_task || was_connected
    }

    /// Point-in-time read of the live bridge for the bound host
    pub fn current_bridge(&self) -> Option<Arc<dyn TerminalBridge>> {
        match &self.shared.lock().connection {
            Connection::Connected {
                bridge: Some(bridge),
                ..
            } => bridge.upgrade(),
            Connection::Connected { bridge: None, .. } | Connection::Disconnected => None,
        }
    }

    pub fn link_state(&self) -> LinkState {
        *self.shared.link.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.link_state() == LinkState::Connected
    }

    /// Wait until no connect request is in flight. Returns whether connected.
    pub async fn settled(&self) -> bool {
        let mut rx = self.shared.link.subscribe();
        let connected = match rx.wait_for(|link| *link != LinkState::Connecting).await {
            Ok(link) => *link == LinkState::Connected,
            Err(_) => false,
        };
        connected
    }

    /// Apply a new encoding to the live session, if there is one.
    ///
    /// Best effort: nothing is queued when no session is open; the next
    /// session reads the setting from storage. Returns whether a bridge
    /// received the change.
    pub fn push_encoding_change(&self, encoding: &str) -> bool {
        match self.current_bridge() {
            Some(bridge) => {
                log::info!(
                    "Applying encoding {encoding} to live session of host {}",
                    bridge.host_id()
                );
                bridge.set_charset(encoding);
                true
            }
            None => {
                log::debug!("No live session, encoding {encoding} applies on next connect");
                false
            }
        }
    }
}

impl Drop for SessionBinder {
    fn drop(&mut self) {
        if let Some(task) = self.shared.lock().task.take() {
            task.abort();
        }
    }
}
