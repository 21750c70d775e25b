//! Test helper module
//!
//! Provides mock collaborators and convenient test factory methods.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use crate::charset::CharsetCatalog;
use crate::error::{CoreError, CoreResult};
use crate::services::EditorContext;
use crate::traits::{
    EditorView, EncodingSource, HostRepository, PubkeyRepository, SessionHandle, SessionService,
    TerminalBridge,
};
use crate::types::{CharsetMap, EncodingInfo, HostId, HostRecord, PubkeyChoice};

// ===== MockHostRepository =====

pub struct MockHostRepository {
    hosts: RwLock<HashMap<HostId, HostRecord>>,
    next_id: AtomicI64,
    /// Every record passed to `save`, as received
    saved: RwLock<Vec<HostRecord>>,
    /// If Some, save returns this error
    save_error: RwLock<Option<String>>,
}

impl MockHostRepository {
    pub fn new() -> Self {
        Self {
            hosts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            saved: RwLock::new(Vec::new()),
            save_error: RwLock::new(None),
        }
    }

    /// Seed a host without going through `save`
    pub async fn insert(&self, mut host: HostRecord) -> HostId {
        let id = HostId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        host.id = Some(id);
        self.hosts.write().await.insert(id, host);
        id
    }

    pub async fn saved(&self) -> Vec<HostRecord> {
        self.saved.read().await.clone()
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl HostRepository for MockHostRepository {
    async fn find_all(&self) -> CoreResult<Vec<HostRecord>> {
        Ok(self.hosts.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: HostId) -> CoreResult<Option<HostRecord>> {
        Ok(self.hosts.read().await.get(&id).cloned())
    }

    async fn save(&self, host: &HostRecord) -> CoreResult<HostId> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.saved.write().await.push(host.clone());

        let id = host
            .id
            .unwrap_or_else(|| HostId::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
        let mut stored = host.clone();
        stored.id = Some(id);
        self.hosts.write().await.insert(id, stored);
        Ok(id)
    }

    async fn delete(&self, id: HostId) -> CoreResult<()> {
        self.hosts.write().await.remove(&id);
        Ok(())
    }
}

// ===== MockPubkeyRepository =====

pub struct MockPubkeyRepository {
    keys: RwLock<Vec<PubkeyChoice>>,
}

impl MockPubkeyRepository {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(Vec::new()),
        }
    }

    pub async fn add(&self, nickname: &str, id: &str) {
        self.keys.write().await.push(PubkeyChoice::new(nickname, id));
    }
}

#[async_trait]
impl PubkeyRepository for MockPubkeyRepository {
    async fn list_aliases(&self) -> CoreResult<Vec<PubkeyChoice>> {
        Ok(self.keys.read().await.clone())
    }
}

// ===== Session service mocks =====

pub struct MockBridge {
    host: HostId,
    charsets: Mutex<Vec<String>>,
}

impl MockBridge {
    /// Charsets pushed into this session, in order
    pub fn charsets(&self) -> Vec<String> {
        self.charsets
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl TerminalBridge for MockBridge {
    fn host_id(&self) -> HostId {
        self.host
    }

    fn set_charset(&self, charset: &str) {
        if let Ok(mut charsets) = self.charsets.lock() {
            charsets.push(charset.to_string());
        }
    }
}

type Bridges = Arc<Mutex<HashMap<HostId, Arc<MockBridge>>>>;

pub struct MockSessionHandle {
    bridges: Bridges,
    resolves: Arc<AtomicUsize>,
    crashed: watch::Receiver<bool>,
}

#[async_trait]
impl SessionHandle for MockSessionHandle {
    fn resolve_bridge(&self, host: HostId) -> Option<Weak<dyn TerminalBridge>> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let bridges = self.bridges.lock().ok()?;
        bridges.get(&host).map(|bridge| {
            let weak = Arc::downgrade(bridge);
            weak as Weak<dyn TerminalBridge>
        })
    }

    async fn closed(&self) {
        let mut crashed = self.crashed.clone();
        let _ = crashed.wait_for(|crashed| *crashed).await;
    }
}

pub struct MockSessionService {
    bridges: Bridges,
    resolves: Arc<AtomicUsize>,
    failure: Mutex<Option<String>>,
    /// `false` holds every connect until released
    gate: watch::Sender<bool>,
    crashed: watch::Sender<bool>,
}

impl MockSessionService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            bridges: Arc::new(Mutex::new(HashMap::new())),
            resolves: Arc::new(AtomicUsize::new(0)),
            failure: Mutex::new(None),
            gate: watch::channel(true).0,
            crashed: watch::channel(false).0,
        })
    }

    /// Open a live session; the service keeps the only strong reference
    /// besides the returned one.
    pub fn open_session(&self, host: HostId) -> Arc<MockBridge> {
        let bridge = Arc::new(MockBridge {
            host,
            charsets: Mutex::new(Vec::new()),
        });
        if let Ok(mut bridges) = self.bridges.lock() {
            bridges.insert(host, Arc::clone(&bridge));
        }
        bridge
    }

    pub fn close_session(&self, host: HostId) {
        if let Ok(mut bridges) = self.bridges.lock() {
            bridges.remove(&host);
        }
    }

    pub fn fail_connects(&self, reason: &str) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(reason.to_string());
        }
    }

    pub fn hold_connects(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_connects(&self) {
        self.gate.send_replace(true);
    }

    /// Simulate the service process dying
    pub fn crash(&self) {
        self.crashed.send_replace(true);
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionService for MockSessionService {
    async fn connect(&self) -> CoreResult<Arc<dyn SessionHandle>> {
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        if let Some(reason) = failure {
            return Err(CoreError::ServiceUnavailable(reason));
        }
        Ok(Arc::new(MockSessionHandle {
            bridges: Arc::clone(&self.bridges),
            resolves: Arc::clone(&self.resolves),
            crashed: self.crashed.subscribe(),
        }))
    }
}

// ===== RecordingView =====

#[derive(Default)]
pub struct RecordingView {
    shown: Mutex<Vec<(Option<HostRecord>, Vec<PubkeyChoice>)>>,
    catalogs: Mutex<Vec<Arc<CharsetMap>>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown_hosts(&self) -> Vec<Option<HostRecord>> {
        self.shown
            .lock()
            .map(|shown| shown.iter().map(|(host, _)| host.clone()).collect())
            .unwrap_or_default()
    }

    pub fn shown_pubkeys(&self) -> Vec<PubkeyChoice> {
        self.shown
            .lock()
            .ok()
            .and_then(|shown| shown.last().map(|(_, keys)| keys.clone()))
            .unwrap_or_default()
    }

    pub fn catalogs(&self) -> Vec<Arc<CharsetMap>> {
        self.catalogs
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl EditorView for RecordingView {
    fn show_host(&self, host: Option<&HostRecord>, pubkeys: &[PubkeyChoice]) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push((host.cloned(), pubkeys.to_vec()));
        }
    }

    fn set_catalog(&self, catalog: Arc<CharsetMap>) {
        if let Ok(mut catalogs) = self.catalogs.lock() {
            catalogs.push(catalog);
        }
    }
}

// ===== StaticEncodings =====

pub struct StaticEncodings {
    scans: AtomicUsize,
}

impl StaticEncodings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scans: AtomicUsize::new(0),
        })
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl EncodingSource for StaticEncodings {
    fn scan(&self) -> Vec<EncodingInfo> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        vec![
            EncodingInfo::named("UTF-8").with_aliases(["utf8"]),
            EncodingInfo::named("ISO-8859-1").with_aliases(["latin1"]),
            EncodingInfo::named("windows-1252").with_aliases(["cp1252"]),
        ]
    }
}

// ===== Factory method =====

pub struct TestContext {
    pub ctx: Arc<EditorContext>,
    pub host_repo: Arc<MockHostRepository>,
    pub pubkey_repo: Arc<MockPubkeyRepository>,
    pub sessions: Arc<MockSessionService>,
    pub encodings: Arc<StaticEncodings>,
}

/// Create test `EditorContext` with a private (non-global) catalog
pub fn create_test_context() -> TestContext {
    let host_repo = Arc::new(MockHostRepository::new());
    let pubkey_repo = Arc::new(MockPubkeyRepository::new());
    let sessions = MockSessionService::new();
    let encodings = StaticEncodings::new();
    let catalog = Arc::new(CharsetCatalog::new(encodings.clone()));

    let ctx = Arc::new(EditorContext::new(
        host_repo.clone(),
        pubkey_repo.clone(),
        sessions.clone(),
        catalog,
    ));

    TestContext {
        ctx,
        host_repo,
        pubkey_repo,
        sessions,
        encodings,
    }
}

/// Create an unsaved SSH host for testing
pub fn test_host(nickname: &str) -> HostRecord {
    HostRecord::new_ssh(nickname, "user", "example.com")
}
