//! The reporting gateway: a gated facade over a telemetry backend.
//!
//! [`ReportingGateway`] starts `Uninitialized`. [`initialize`] moves it to
//! `Disabled` when the [`PrivacySignal`] is set, otherwise to `Initializing`
//! while the [`BackendProvider`] acquires a session, then to `Active` or
//! `Failed`. Only `Active` relays anything; in every other state the facade
//! calls are silent no-ops. Nothing here returns an error or panics.
//!
//! [`initialize`]: ReportingGateway::initialize

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::backend::{BackendOptions, BackendProvider, ScopeHandle, TelemetryBackend};
use crate::event::{Breadcrumb, ErrorEvent, EventHint};
use crate::filter::EventFilter;

/// Process-wide opt-out from monitoring, read once by
/// [`ReportingGateway::initialize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivacySignal {
    opted_out: bool,
}

impl PrivacySignal {
    #[must_use]
    pub const fn new(opted_out: bool) -> Self {
        Self { opted_out }
    }

    #[must_use]
    pub const fn opted_out(&self) -> bool {
        self.opted_out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Uninitialized,
    Initializing,
    Active,
    Disabled,
    Failed,
}

impl GatewayState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Failed => "failed",
        }
    }
}

/// What a call to [`ReportingGateway::initialize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Active,
    /// The privacy signal was set; monitoring stays off for this gateway.
    Disabled,
    /// Backend acquisition failed; monitoring stays off for this gateway.
    Failed,
    /// Initialization already ran or is running; nothing changed.
    AlreadyInitialized,
}

enum Session {
    Uninitialized,
    Initializing,
    Active(Arc<dyn TelemetryBackend>),
    Disabled,
    Failed,
}

impl Session {
    const fn state(&self) -> GatewayState {
        match self {
            Self::Uninitialized => GatewayState::Uninitialized,
            Self::Initializing => GatewayState::Initializing,
            Self::Active(_) => GatewayState::Active,
            Self::Disabled => GatewayState::Disabled,
            Self::Failed => GatewayState::Failed,
        }
    }
}

/// Fails an initialization whose future is dropped before the backend
/// resolves, so the gateway never stays `Initializing`.
struct PendingInit<'a> {
    session: &'a RwLock<Session>,
    armed: bool,
}

impl PendingInit<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingInit<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*session, Session::Initializing) {
            *session = Session::Failed;
            tracing::warn!("initialization abandoned before the backend resolved");
        }
    }
}

pub struct ReportingGateway {
    provider: Box<dyn BackendProvider>,
    privacy: PrivacySignal,
    filter: Arc<EventFilter>,
    release: String,
    environment: Option<String>,
    session: RwLock<Session>,
}

impl ReportingGateway {
    #[must_use]
    pub fn new(
        provider: Box<dyn BackendProvider>,
        privacy: PrivacySignal,
        filter: EventFilter,
    ) -> Self {
        Self {
            provider,
            privacy,
            filter: Arc::new(filter),
            release: crate::RELEASE.to_string(),
            environment: None,
            session: RwLock::new(Session::Uninitialized),
        }
    }

    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn state(&self) -> GatewayState {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }

    /// Acquires and configures the backend unless monitoring is opted out.
    ///
    /// Only the first call does anything; later calls, including ones made
    /// while the first is still pending, return
    /// [`InitOutcome::AlreadyInitialized`].
    pub async fn initialize(&self, endpoint: &str) -> InitOutcome {
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            if !matches!(*session, Session::Uninitialized) {
                tracing::debug!(
                    state = session.state().as_str(),
                    "reporting gateway already initialized, ignoring"
                );
                return InitOutcome::AlreadyInitialized;
            }
            if self.privacy.opted_out() {
                *session = Session::Disabled;
                tracing::info!("do-not-track is set, error reporting disabled");
                return InitOutcome::Disabled;
            }
            *session = Session::Initializing;
        }

        let options = BackendOptions {
            endpoint: endpoint.to_string(),
            release: self.release.clone(),
            environment: self.environment.clone(),
            filter: self.filter.clone(),
        };

        let pending = PendingInit {
            session: &self.session,
            armed: true,
        };
        let acquired = self.provider.acquire(options).await;
        pending.disarm();

        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        match acquired {
            Ok(backend) => {
                *session = Session::Active(backend);
                tracing::info!(
                    backend = self.provider.name(),
                    release = %self.release,
                    "error reporting active"
                );
                InitOutcome::Active
            }
            Err(e) => {
                *session = Session::Failed;
                tracing::warn!(
                    backend = self.provider.name(),
                    error = %e,
                    "telemetry backend unavailable, error reporting disabled"
                );
                InitOutcome::Failed
            }
        }
    }

    /// The active backend, with the lock already released.
    fn backend(&self) -> Option<Arc<dyn TelemetryBackend>> {
        match &*self.session.read().unwrap_or_else(PoisonError::into_inner) {
            Session::Active(backend) => Some(backend.clone()),
            _ => None,
        }
    }

    pub fn log_breadcrumb(&self, breadcrumb: Breadcrumb) {
        if let Some(backend) = self.backend() {
            backend.add_breadcrumb(breadcrumb);
        }
    }

    pub fn capture_exception(&self, err: &(dyn std::error::Error + 'static)) {
        if let Some(backend) = self.backend() {
            backend.capture_exception(err);
        }
    }

    /// Relays a pre-built report; the backend's filter sees `hint`.
    pub fn capture_report(&self, event: ErrorEvent, hint: EventHint) {
        if let Some(backend) = self.backend() {
            backend.capture_event(event, hint);
        }
    }

    /// Runs `f` against the session scope. Never invoked when inactive.
    pub fn configure_scope<F>(&self, f: F)
    where
        F: FnOnce(&mut dyn ScopeHandle),
    {
        let Some(backend) = self.backend() else {
            return;
        };
        let mut f = Some(f);
        backend.configure_scope(&mut |scope: &mut dyn ScopeHandle| {
            if let Some(f) = f.take() {
                f(scope);
            }
        });
    }

    pub fn set_user_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.configure_scope(|scope| scope.set_user_id(Some(id)));
    }

    pub fn reset_user_id(&self) {
        self.configure_scope(|scope| scope.set_user_id(None));
    }

    /// Waits for queued events, blocking the calling thread for up to
    /// `timeout`. `true` when inactive.
    #[must_use]
    pub fn flush(&self, timeout: Duration) -> bool {
        self.backend().map_or(true, |backend| backend.flush(timeout))
    }
}

impl std::fmt::Debug for ReportingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingGateway")
            .field("provider", &self.provider.name())
            .field("privacy", &self.privacy)
            .field("release", &self.release)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
