//! Headless editor view
//!
//! The command line has no form to populate; the view records what the
//! editor handed it so commands can check input against the catalog.

use std::sync::{Arc, Mutex, PoisonError};

use hostedit_core::traits::EditorView;
use hostedit_core::types::{CharsetMap, HostRecord, PubkeyChoice};

#[derive(Default)]
pub struct ConsoleView {
    catalog: Mutex<Option<Arc<CharsetMap>>>,
}

impl ConsoleView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn catalog(&self) -> Option<Arc<CharsetMap>> {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve user input to an encoding name. Accepts either the name or
    /// its display name, case-insensitively.
    pub fn resolve_encoding(&self, input: &str) -> Option<String> {
        let catalog = self.catalog()?;
        catalog.iter().find_map(|(display, name)| {
            (display.eq_ignore_ascii_case(input) || name.eq_ignore_ascii_case(input))
                .then(|| name.clone())
        })
    }
}

impl EditorView for ConsoleView {
    fn show_host(&self, host: Option<&HostRecord>, pubkeys: &[PubkeyChoice]) {
        match host {
            Some(host) => tracing::debug!(
                "Editing {} ({}@{}:{}), {} key choices",
                host.nickname,
                host.username,
                host.hostname,
                host.port,
                pubkeys.len()
            ),
            None => tracing::debug!("Creating a new host, {} key choices", pubkeys.len()),
        }
    }

    fn set_catalog(&self, catalog: Arc<CharsetMap>) {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Some(catalog);
    }
}
