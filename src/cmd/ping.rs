//! `reportgate ping` — send a test report through a live gateway.
//!
//! Builds a [`ReportingGateway`] over the Sentry backend, initializes it,
//! leaves a breadcrumb, optionally tags the user, captures a synthetic
//! error, and flushes. With `--do-not-track` every step is a no-op.

use std::time::Duration;

use crate::cli::PingArgs;
use crate::config;
use crate::error::GatewayError;
use crate::event::{Breadcrumb, Level};
use crate::filter::EventFilter;
use crate::gateway::{InitOutcome, PrivacySignal, ReportingGateway};
use crate::logging;
use crate::sentry_integration::SentryProvider;

#[derive(Debug, thiserror::Error)]
#[error("reportgate ping from release {release}")]
struct PingError {
    release: String,
}

pub async fn execute(args: PingArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = config::load_or_default(args.config.as_deref()).await?;
    let filter = EventFilter::from_config(&config.filter)?;
    let environment = args.environment.clone().or(config.environment.clone());

    let gateway = ReportingGateway::new(
        Box::new(SentryProvider),
        PrivacySignal::new(args.do_not_track),
        filter,
    )
    .with_release(config.release())
    .with_environment(environment);

    match gateway.initialize(&args.dsn).await {
        InitOutcome::Active => {}
        outcome => {
            tracing::warn!(outcome = ?outcome, "gateway inactive, nothing sent");
            return Ok(());
        }
    }

    gateway.log_breadcrumb(Breadcrumb::new("reportgate", "ping started", Level::Info));
    if let Some(ref id) = args.user_id {
        gateway.set_user_id(id.clone());
    }
    gateway.capture_exception(&PingError {
        release: config.release().to_string(),
    });

    // Flushing and closing the client both block on the transport.
    let timeout = Duration::from_secs(args.flush_timeout);
    let delivered = tokio::task::spawn_blocking(move || {
        let delivered = gateway.flush(timeout);
        drop(gateway);
        delivered
    })
    .await
    .unwrap_or(false);

    if delivered {
        tracing::info!("test report delivered");
    } else {
        tracing::warn!(timeout_secs = args.flush_timeout, "flush timed out");
    }
    Ok(())
}
