//! Collaborator abstraction trait definition

mod editor_view;
mod encoding_source;
mod host_repository;
mod pubkey_repository;
mod session_service;

pub use editor_view::EditorView;
pub use encoding_source::EncodingSource;
pub use host_repository::HostRepository;
pub use pubkey_repository::{NoPubkeys, PubkeyRepository};
pub use session_service::{SessionHandle, SessionService, TerminalBridge};
