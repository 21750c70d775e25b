//! Editor view abstraction

use std::sync::Arc;

use crate::types::{CharsetMap, HostRecord, PubkeyChoice};

/// The form the user edits a host in.
///
/// Validation happens in the view; results come back through
/// `EditorCoordinator::on_validated` / `on_invalidated`.
pub trait EditorView: Send + Sync {
    /// Populate the form. `host` is `None` when creating a new host.
    fn show_host(&self, host: Option<&HostRecord>, pubkeys: &[PubkeyChoice]);

    /// Deliver the charset catalog. May arrive after the user started editing
    /// and must not reset in-progress input.
    fn set_catalog(&self, catalog: Arc<CharsetMap>);
}
