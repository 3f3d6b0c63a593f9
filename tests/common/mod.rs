//! In-memory telemetry backend and providers shared by integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reportgate::backend::{BackendOptions, BackendProvider, ScopeHandle, TelemetryBackend};
use reportgate::error::GatewayError;
use reportgate::event::{Breadcrumb, ErrorEvent, EventHint};
use tokio::sync::Notify;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordedScope {
    pub user_id: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl ScopeHandle for RecordedScope {
    fn set_user_id(&mut self, id: Option<String>) {
        self.user_id = id;
    }

    fn set_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    fn remove_tag(&mut self, key: &str) {
        self.tags.remove(key);
    }
}

/// Records everything and applies the configured filter to events, the
/// way a real SDK runs its `before_send` hook.
pub struct RecordingBackend {
    pub options: BackendOptions,
    pub breadcrumbs: Mutex<Vec<Breadcrumb>>,
    pub exceptions: Mutex<Vec<String>>,
    pub sent_events: Mutex<Vec<ErrorEvent>>,
    pub scope: Mutex<RecordedScope>,
}

impl RecordingBackend {
    fn new(options: BackendOptions) -> Self {
        Self {
            options,
            breadcrumbs: Mutex::new(Vec::new()),
            exceptions: Mutex::new(Vec::new()),
            sent_events: Mutex::new(Vec::new()),
            scope: Mutex::new(RecordedScope::default()),
        }
    }

    pub fn user_id(&self) -> Option<String> {
        self.scope.lock().unwrap().user_id.clone()
    }
}

impl TelemetryBackend for RecordingBackend {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.breadcrumbs.lock().unwrap().push(breadcrumb);
    }

    fn capture_exception(&self, error: &(dyn std::error::Error + 'static)) {
        self.exceptions.lock().unwrap().push(error.to_string());
    }

    fn capture_event(&self, event: ErrorEvent, hint: EventHint) {
        if let Some(event) = self.options.filter.before_send(event, &hint) {
            self.sent_events.lock().unwrap().push(event);
        }
    }

    fn configure_scope(&self, f: &mut dyn FnMut(&mut dyn ScopeHandle)) {
        let mut guard = self.scope.lock().unwrap();
        let scope: &mut dyn ScopeHandle = &mut *guard;
        f(scope);
    }
}

/// Resolves immediately; remembers every backend it hands out.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    pub acquisitions: Arc<AtomicUsize>,
    pub backends: Arc<Mutex<Vec<Arc<RecordingBackend>>>>,
    /// When set, `acquire` waits for a notification before resolving.
    pub gate: Option<Arc<Notify>>,
}

impl RecordingProvider {
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let provider = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn backend(&self) -> Arc<RecordingBackend> {
        self.backends
            .lock()
            .unwrap()
            .first()
            .cloned()
            .expect("no backend acquired")
    }
}

#[async_trait]
impl BackendProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn acquire(
        &self,
        options: BackendOptions,
    ) -> Result<Arc<dyn TelemetryBackend>, GatewayError> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        let backend = Arc::new(RecordingBackend::new(options));
        self.backends.lock().unwrap().push(backend.clone());
        let session: Arc<dyn TelemetryBackend> = backend;
        Ok(session)
    }
}

/// Always fails to load the backend.
pub struct FailingProvider;

#[async_trait]
impl BackendProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn acquire(
        &self,
        _options: BackendOptions,
    ) -> Result<Arc<dyn TelemetryBackend>, GatewayError> {
        Err(GatewayError::BackendUnavailable {
            source: "chunk failed to load".into(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub &'static str);
