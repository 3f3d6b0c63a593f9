//! Integration tests for the gateway lifecycle and facade relaying.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FailingProvider, RecordingProvider, TestError};
use reportgate::event::{
    Breadcrumb, ErrorEvent, EventHint, ExceptionRecord, Level, Mechanism, StackFrame,
};
use reportgate::filter::EventFilter;
use reportgate::gateway::{GatewayState, InitOutcome, PrivacySignal, ReportingGateway};
use serde_json::json;

const DSN: &str = "https://public@o0.ingest.example.io/1";

fn gateway(provider: &RecordingProvider, opted_out: bool) -> ReportingGateway {
    ReportingGateway::new(
        Box::new(provider.clone()),
        PrivacySignal::new(opted_out),
        EventFilter::default(),
    )
}

fn exercise_facade(gw: &ReportingGateway) -> bool {
    let mut scope_called = false;
    gw.log_breadcrumb(Breadcrumb::new("ui", "clicked", Level::Info));
    gw.capture_exception(&TestError("boom"));
    gw.capture_report(ErrorEvent::default(), EventHint::default());
    gw.configure_scope(|_| scope_called = true);
    gw.set_user_id("abc");
    gw.reset_user_id();
    scope_called
}

#[tokio::test]
async fn privacy_signal_keeps_every_facade_inert() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, true);

    assert_eq!(gw.initialize(DSN).await, InitOutcome::Disabled);
    assert!(!exercise_facade(&gw));
    assert_eq!(gw.state(), GatewayState::Disabled);
    assert_eq!(provider.acquisitions(), 0);

    // Opt-out is permanent for the gateway.
    assert_eq!(gw.initialize(DSN).await, InitOutcome::AlreadyInitialized);
    assert_eq!(provider.acquisitions(), 0);
}

#[tokio::test]
async fn facade_before_initialize_has_no_effect() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, false);

    assert!(!exercise_facade(&gw));
    assert_eq!(gw.state(), GatewayState::Uninitialized);

    assert_eq!(gw.initialize(DSN).await, InitOutcome::Active);
    let backend = provider.backend();
    assert!(backend.breadcrumbs.lock().unwrap().is_empty());
    assert!(backend.exceptions.lock().unwrap().is_empty());
    assert_eq!(backend.user_id(), None);
}

#[tokio::test]
async fn active_gateway_relays_to_backend() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, false).with_release("web@1.2.3");

    assert_eq!(gw.initialize(DSN).await, InitOutcome::Active);
    gw.log_breadcrumb(Breadcrumb::new("nav", "opened sandbox", Level::Info));
    gw.capture_exception(&TestError("render failed"));
    gw.configure_scope(|scope| scope.set_tag("plan", "pro"));

    let backend = provider.backend();
    assert_eq!(backend.options.endpoint, DSN);
    assert_eq!(backend.options.release, "web@1.2.3");
    assert_eq!(
        backend.breadcrumbs.lock().unwrap()[0].message.as_deref(),
        Some("opened sandbox")
    );
    assert_eq!(*backend.exceptions.lock().unwrap(), vec!["render failed"]);
    assert_eq!(
        backend.scope.lock().unwrap().tags.get("plan").map(String::as_str),
        Some("pro")
    );
}

#[tokio::test]
async fn set_then_reset_user_id_clears_user() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, false);
    gw.initialize(DSN).await;

    gw.set_user_id("abc");
    assert_eq!(provider.backend().user_id().as_deref(), Some("abc"));

    gw.reset_user_id();
    assert_eq!(provider.backend().user_id(), None);
}

#[tokio::test]
async fn duplicate_initialize_acquires_once() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, false);

    assert_eq!(gw.initialize(DSN).await, InitOutcome::Active);
    assert_eq!(gw.initialize(DSN).await, InitOutcome::AlreadyInitialized);
    assert_eq!(provider.acquisitions(), 1);
    assert_eq!(gw.state(), GatewayState::Active);
}

#[tokio::test]
async fn concurrent_initialize_does_not_race() {
    let (provider, gate) = RecordingProvider::gated();
    let gw = Arc::new(gateway(&provider, false));

    let first = tokio::spawn({
        let gw = gw.clone();
        async move { gw.initialize(DSN).await }
    });

    // Wait until the first call is suspended inside the provider.
    while provider.acquisitions() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(gw.state(), GatewayState::Initializing);
    assert_eq!(gw.initialize(DSN).await, InitOutcome::AlreadyInitialized);
    assert!(!exercise_facade(&gw));

    gate.notify_one();
    assert_eq!(first.await.unwrap(), InitOutcome::Active);
    assert_eq!(provider.acquisitions(), 1);
    assert_eq!(gw.state(), GatewayState::Active);
}

#[tokio::test]
async fn acquisition_failure_leaves_gateway_inert() {
    let gw = ReportingGateway::new(
        Box::new(FailingProvider),
        PrivacySignal::default(),
        EventFilter::default(),
    );

    assert_eq!(gw.initialize(DSN).await, InitOutcome::Failed);
    assert_eq!(gw.state(), GatewayState::Failed);
    assert!(!exercise_facade(&gw));
    assert!(gw.flush(Duration::from_millis(10)));
}

#[tokio::test]
async fn abandoned_initialize_fails_the_gateway() {
    let (provider, gate) = RecordingProvider::gated();
    let gw = gateway(&provider, false);

    tokio::select! {
        biased;
        _ = gw.initialize(DSN) => panic!("acquisition should still be pending"),
        () = tokio::task::yield_now() => {}
    }

    assert_eq!(provider.acquisitions(), 1);
    assert_eq!(gw.state(), GatewayState::Failed);

    gate.notify_one();
    assert_eq!(gw.initialize(DSN).await, InitOutcome::AlreadyInitialized);
    assert!(!exercise_facade(&gw));
}

#[tokio::test]
async fn captured_reports_pass_through_the_configured_filter() {
    let provider = RecordingProvider::default();
    let gw = gateway(&provider, false);
    gw.initialize(DSN).await;

    let sandbox_noise = ErrorEvent {
        message: None,
        exceptions: vec![ExceptionRecord {
            ty: Some("Error".into()),
            value: Some("Non-Error exception captured with value: 42".into()),
            frames: vec![StackFrame {
                filename: Some("https://www.example.io/static/app.js".into()),
            }],
            mechanism: Some(Mechanism {
                handled: Some(true),
            }),
        }],
    };
    gw.capture_report(
        sandbox_noise,
        EventHint::with_original(json!({"error": {"name": "SandboxError"}})),
    );

    let real = ErrorEvent {
        message: None,
        exceptions: vec![ExceptionRecord {
            ty: Some("TypeError".into()),
            value: Some("cannot read properties of undefined".into()),
            ..Default::default()
        }],
    };
    gw.capture_report(real.clone(), EventHint::default());

    assert_eq!(*provider.backend().sent_events.lock().unwrap(), vec![real]);
}
