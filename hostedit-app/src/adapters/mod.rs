//! Platform-agnostic storage and session adapters for non-mobile frontends (CLI, tests).

mod json_file;
mod memory;
mod terminal_manager;

pub use json_file::JsonFileHostRepository;
pub use memory::{InMemoryHostRepository, InMemoryPubkeyRepository};
pub use terminal_manager::{LocalBridge, LocalTerminalManager};
