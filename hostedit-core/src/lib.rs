//! Host Editor Core Library
//!
//! The editing workflow for a single host configuration of a remote-session
//! client:
//! - Charset catalog (process-wide, built once in the background)
//! - Session binding (live bridge of the host under edit)
//! - Editor coordination (validity state machine gating the commit action)
//!
//! Storage, the session-management service and the editor view are external
//! collaborators, abstracted through traits.

pub mod charset;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use charset::CharsetCatalog;
pub use error::{CoreError, CoreResult};
pub use services::{EditorContext, EditorCoordinator, SessionBinder};
pub use traits::{EditorView, HostRepository, PubkeyRepository, SessionService};
