//! Process-wide charset catalog
//!
//! The catalog maps charset display names to the identifiers stored in host
//! records. Building it probes every installed encoding, so it is built at
//! most once per process and shared afterwards.
//!
//! State moves `Uninitialized -> Building -> Ready` and never back. The
//! caller that observes `Uninitialized` becomes the only builder; everyone
//! arriving while `Building` waits on the condition variable until the
//! finished mapping is published.

mod platform;

pub use platform::PlatformEncodings;

use std::sync::{Arc, Condvar, LazyLock, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::traits::EncodingSource;
use crate::types::{CharsetMap, EncodingInfo};

/// Legacy charset kept selectable so older saved hosts still resolve
pub const LEGACY_CHARSET: &str = "CP437";

/// Any selectable encoding named with this prefix pulls in [`LEGACY_CHARSET`]
const LEGACY_TRIGGER_PREFIX: &str = "cp";

static GLOBAL_CATALOG: LazyLock<Arc<CharsetCatalog>> =
    LazyLock::new(|| Arc::new(CharsetCatalog::new(Arc::new(PlatformEncodings::new()))));

enum CatalogState {
    Uninitialized,
    Building,
    Ready(Arc<CharsetMap>),
}

/// Lazily built, exactly-once charset catalog
pub struct CharsetCatalog {
    source: Arc<dyn EncodingSource>,
    state: Mutex<CatalogState>,
    published: Condvar,
}

impl CharsetCatalog {
    /// Catalog over an explicit encoding source
    #[must_use]
    pub fn new(source: Arc<dyn EncodingSource>) -> Self {
        Self {
            source,
            state: Mutex::new(CatalogState::Uninitialized),
            published: Condvar::new(),
        }
    }

    /// The process-wide catalog over the platform's encodings
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_CATALOG)
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.lock(), CatalogState::Ready(_))
    }

    /// The published mapping, without building or waiting
    pub fn try_get(&self) -> Option<Arc<CharsetMap>> {
        match &*self.lock() {
            CatalogState::Ready(map) => Some(Arc::clone(map)),
            CatalogState::Uninitialized | CatalogState::Building => None,
        }
    }

    /// The completed mapping, building it on this thread if nobody has yet.
    ///
    /// Blocks while another thread is building. Never call this from a
    /// latency-sensitive context unless [`is_ready`](Self::is_ready) holds;
    /// use [`fetch`](Self::fetch) or [`request`](Self::request) instead.
    pub fn get(&self) -> Arc<CharsetMap> {
        let mut state = self.lock();
        loop {
            if let CatalogState::Ready(map) = &*state {
                return Arc::clone(map);
            }
            if matches!(*state, CatalogState::Uninitialized) {
                break;
            }
            state = self
                .published
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        *state = CatalogState::Building;
        drop(state);

        let guard = BuildGuard { catalog: self };
        log::debug!("Building charset catalog");
        let map = Arc::new(build_catalog(self.source.scan()));
        log::info!("Charset catalog ready with {} entries", map.len());
        std::mem::forget(guard);

        *self.lock() = CatalogState::Ready(Arc::clone(&map));
        self.published.notify_all();
        map
    }

    /// Whatever has been published, without building or waiting
    fn published_or_empty(&self) -> Arc<CharsetMap> {
        self.try_get().unwrap_or_default()
    }

    /// Non-blocking path: the scan (or the wait for another builder) runs on
    /// the blocking pool, never on the calling task.
    pub async fn fetch(self: &Arc<Self>) -> Arc<CharsetMap> {
        if let Some(map) = self.try_get() {
            return map;
        }

        let catalog = Arc::clone(self);
        match tokio::task::spawn_blocking(move || catalog.get()).await {
            Ok(map) => map,
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                // only happens while the runtime shuts down
                Err(e) => {
                    log::warn!("Charset catalog task was cancelled: {e}");
                    self.published_or_empty()
                }
            },
        }
    }

    /// Schedule the build in the background and hand the mapping to
    /// `on_ready` once it is published.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// handle does not cancel the build.
    pub fn request<F>(self: &Arc<Self>, on_ready: F) -> JoinHandle<()>
    where
        F: FnOnce(Arc<CharsetMap>) + Send + 'static,
    {
        let catalog = Arc::clone(self);
        tokio::spawn(async move {
            let map = catalog.fetch().await;
            on_ready(map);
        })
    }
}

/// Hands the catalog back to `Uninitialized` when the builder unwinds, so
/// waiters wake up and one of them retries.
struct BuildGuard<'a> {
    catalog: &'a CharsetCatalog,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        log::error!("Charset catalog build panicked, another caller will retry");
        let mut state = self.catalog.lock();
        if matches!(*state, CatalogState::Building) {
            *state = CatalogState::Uninitialized;
        }
        drop(state);
        self.catalog.published.notify_all();
    }
}

/// Turn a raw scan into the display-name mapping
pub(crate) fn build_catalog(encodings: Vec<EncodingInfo>) -> CharsetMap {
    let mut map = CharsetMap::new();
    let mut include_legacy = false;

    for encoding in encodings.into_iter().filter(EncodingInfo::is_selectable) {
        include_legacy |= encoding.name.starts_with(LEGACY_TRIGGER_PREFIX)
            || encoding
                .aliases
                .iter()
                .any(|alias| alias.starts_with(LEGACY_TRIGGER_PREFIX));
        map.insert(encoding.display_name, encoding.name);
    }

    if include_legacy {
        map.insert(LEGACY_CHARSET.to_string(), LEGACY_CHARSET.to_string());
    }
    map
}
