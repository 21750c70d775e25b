//! Session-management service abstraction
//!
//! The service owns every live terminal session. Editors only borrow a weak
//! reference to the bridge of the host they edit.

use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::HostId;

/// A live, already-open remote session
pub trait TerminalBridge: Send + Sync {
    /// Host this session was opened for
    fn host_id(&self) -> HostId;

    /// Switch the session's text encoding in place
    fn set_charset(&self, charset: &str);
}

/// Connection to the session-management service
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Bridge of the session currently open for `host`, if any
    fn resolve_bridge(&self, host: HostId) -> Option<Weak<dyn TerminalBridge>>;

    /// Resolves once the service side of this connection goes away
    async fn closed(&self);
}

/// Entry point to the session-management service
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Connect to the service.
    ///
    /// May fail, or never resolve when the service process is unavailable.
    async fn connect(&self) -> CoreResult<Arc<dyn SessionHandle>>;
}
