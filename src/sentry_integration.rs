//! Sentry implementation of the telemetry backend.
//!
//! [`SentryProvider`] builds a client from the DSN and release, installs the
//! [`EventFilter`] as Sentry's `before_send` hook, and binds the client to the
//! main hub. [`SentryBackend`] relays gateway calls to that hub. Hubs are
//! per-thread in the SDK; everything here goes through `Hub::main()` so
//! scope changes made on one Tokio worker are seen by events from another.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sentry::protocol::{self, Event};
use sentry::{Client, Hub};

use crate::backend::{BackendOptions, BackendProvider, ScopeHandle, TelemetryBackend};
use crate::error::GatewayError;
use crate::event::{
    Breadcrumb, ErrorEvent, EventHint, ExceptionRecord, Level, Mechanism, StackFrame,
};
use crate::filter::EventFilter;

/// Key in `Event::extra` carrying the hint's original raised value.
pub const ORIGINAL_EXCEPTION_KEY: &str = "original_exception";

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
pub struct SentryProvider;

#[async_trait]
impl BackendProvider for SentryProvider {
    fn name(&self) -> &'static str {
        "sentry"
    }

    async fn acquire(
        &self,
        options: BackendOptions,
    ) -> Result<Arc<dyn TelemetryBackend>, GatewayError> {
        let client = Arc::new(Client::with_options(client_options(options)?));
        let hub = Hub::main();
        hub.bind_client(Some(client.clone()));

        tracing::debug!(enabled = client.is_enabled(), "sentry client bound to main hub");
        Ok(Arc::new(SentryBackend { client, hub }))
    }
}

/// Client options with the SDK's default integrations applied; the panic
/// integration among them installs the panic hook when the client is built.
fn client_options(options: BackendOptions) -> Result<sentry::ClientOptions, GatewayError> {
    let dsn = options
        .endpoint
        .parse::<sentry::types::Dsn>()
        .map_err(|e| GatewayError::InvalidEndpoint {
            endpoint: options.endpoint.clone(),
            reason: e.to_string(),
        })?;

    let filter = options.filter;
    Ok(sentry::apply_defaults(sentry::ClientOptions {
        dsn: Some(dsn),
        release: Some(options.release.into()),
        environment: options.environment.map(Into::into),
        before_send: Some(Arc::new(move |event: Event<'static>| {
            before_send(&filter, event)
        })),
        ..Default::default()
    }))
}

pub struct SentryBackend {
    client: Arc<Client>,
    hub: Arc<Hub>,
}

impl TelemetryBackend for SentryBackend {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.hub.add_breadcrumb(to_sentry_breadcrumb(breadcrumb));
    }

    fn capture_exception(&self, error: &(dyn std::error::Error + 'static)) {
        self.hub.capture_error(error);
    }

    fn capture_event(&self, event: ErrorEvent, hint: EventHint) {
        self.hub.capture_event(to_sentry_event(event, hint));
    }

    fn configure_scope(&self, f: &mut dyn FnMut(&mut dyn ScopeHandle)) {
        self.hub.configure_scope(|scope| {
            let scope: &mut dyn ScopeHandle = scope;
            f(scope);
        });
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.client.flush(Some(timeout))
    }
}

impl Drop for SentryBackend {
    fn drop(&mut self) {
        self.client.close(Some(CLOSE_TIMEOUT));
    }
}

impl ScopeHandle for sentry::Scope {
    fn set_user_id(&mut self, id: Option<String>) {
        self.set_user(id.map(|id| sentry::User {
            id: Some(id),
            ..Default::default()
        }));
    }

    fn set_tag(&mut self, key: &str, value: &str) {
        sentry::Scope::set_tag(self, key, value);
    }

    fn remove_tag(&mut self, key: &str) {
        sentry::Scope::remove_tag(self, key);
    }
}

/// Forwarded events leave without the original raised value; it only
/// exists for the filter.
fn before_send(filter: &EventFilter, mut event: Event<'static>) -> Option<Event<'static>> {
    let (view, hint) = view_of(&event);
    if !filter.decide(&view, &hint).is_forward() {
        return None;
    }
    event.extra.remove(ORIGINAL_EXCEPTION_KEY);
    Some(event)
}

/// Projects a Sentry event onto the filter's view of it.
///
/// Sentry lists chained exceptions root cause first; the view wants the
/// top-level error first.
#[must_use]
pub fn view_of(event: &Event<'_>) -> (ErrorEvent, EventHint) {
    let exceptions = event
        .exception
        .values
        .iter()
        .rev()
        .map(|e| ExceptionRecord {
            ty: Some(e.ty.clone()).filter(|t| !t.is_empty()),
            value: e.value.clone(),
            frames: e
                .stacktrace
                .as_ref()
                .map(|st| {
                    st.frames
                        .iter()
                        .map(|f| StackFrame {
                            filename: f.filename.clone().or_else(|| f.abs_path.clone()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            mechanism: e.mechanism.as_ref().map(|m| Mechanism { handled: m.handled }),
        })
        .collect();

    let view = ErrorEvent {
        message: event.message.clone(),
        exceptions,
    };
    let hint = EventHint {
        original_exception: event.extra.get(ORIGINAL_EXCEPTION_KEY).cloned(),
    };
    (view, hint)
}

fn to_sentry_event(event: ErrorEvent, hint: EventHint) -> Event<'static> {
    let exceptions: Vec<protocol::Exception> = event
        .exceptions
        .into_iter()
        .rev()
        .map(|e| protocol::Exception {
            ty: e.ty.unwrap_or_else(|| "Error".into()),
            value: e.value,
            stacktrace: (!e.frames.is_empty()).then(|| protocol::Stacktrace {
                frames: e
                    .frames
                    .into_iter()
                    .map(|f| protocol::Frame {
                        filename: f.filename,
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }),
            mechanism: e.mechanism.map(|m| protocol::Mechanism {
                ty: "generic".into(),
                handled: m.handled,
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect();

    let mut out = Event {
        message: event.message,
        exception: exceptions.into(),
        level: sentry::Level::Error,
        ..Default::default()
    };
    if let Some(original) = hint.original_exception {
        out.extra.insert(ORIGINAL_EXCEPTION_KEY.to_string(), original);
    }
    out
}

fn to_sentry_breadcrumb(breadcrumb: Breadcrumb) -> sentry::Breadcrumb {
    sentry::Breadcrumb {
        category: breadcrumb.category,
        message: breadcrumb.message,
        level: to_sentry_level(breadcrumb.level),
        ..Default::default()
    }
}

const fn to_sentry_level(level: Level) -> sentry::Level {
    match level {
        Level::Debug => sentry::Level::Debug,
        Level::Info => sentry::Level::Info,
        Level::Warning => sentry::Level::Warning,
        Level::Error => sentry::Level::Error,
        Level::Fatal => sentry::Level::Fatal,
    }
}
