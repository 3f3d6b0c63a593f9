//! The telemetry backend contract the gateway relays to.
//!
//! [`TelemetryBackend`] is the live monitoring session, [`ScopeHandle`]
//! its mutable context, and [`BackendProvider`] the deferred acquisition
//! step that produces a session from [`BackendOptions`]. The Sentry
//! implementation lives in [`crate::sentry_integration`] behind the `sentry-integration`
//! feature.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::event::{Breadcrumb, ErrorEvent, EventHint};
use crate::filter::EventFilter;

/// Mutable per-session context attached to subsequently captured events.
pub trait ScopeHandle {
    /// Replaces the current user as a whole; `None` clears it.
    fn set_user_id(&mut self, id: Option<String>);
    fn set_tag(&mut self, key: &str, value: &str);
    fn remove_tag(&mut self, key: &str);
}

pub trait TelemetryBackend: Send + Sync {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb);
    fn capture_exception(&self, error: &(dyn std::error::Error + 'static));
    fn capture_event(&self, event: ErrorEvent, hint: EventHint);
    fn configure_scope(&self, f: &mut dyn FnMut(&mut dyn ScopeHandle));

    /// Blocks until queued events are sent or `timeout` elapses.
    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Everything a backend is configured with at acquisition time.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub endpoint: String,
    pub release: String,
    pub environment: Option<String>,
    pub filter: Arc<EventFilter>,
}

// async_trait is required here because BackendProvider is used as Box<dyn BackendProvider>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn acquire(
        &self,
        options: BackendOptions,
    ) -> Result<Arc<dyn TelemetryBackend>, GatewayError>;
}
