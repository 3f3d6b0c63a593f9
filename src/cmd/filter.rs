//! `reportgate filter` — would this report be sent?
//!
//! Reads an [`ErrorReport`] from JSON, builds the [`EventFilter`] from the
//! config (or the built-in rules), and prints the verdict.

use std::path::Path;

use crate::cli::{FilterArgs, OutputFormat};
use crate::config;
use crate::error::GatewayError;
use crate::event::ErrorReport;
use crate::filter::{EventFilter, Verdict};

pub async fn execute(args: &FilterArgs) -> Result<(), GatewayError> {
    let verdict = evaluate(args).await?;
    match args.format {
        OutputFormat::Text => println!("{}", render(verdict)),
        OutputFormat::Json => println!("{}", render_json(verdict)),
    }
    Ok(())
}

/// Loads the config and report named by `args` and runs the filter.
pub async fn evaluate(args: &FilterArgs) -> Result<Verdict, GatewayError> {
    let config = config::load_or_default(args.config.as_deref()).await?;
    let filter = EventFilter::from_config(&config.filter)?;
    let report = read_report(&args.report).await?;
    Ok(filter.decide(&report.event, &report.hint))
}

pub async fn read_report(path: &Path) -> Result<ErrorReport, GatewayError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|source| GatewayError::InvalidReport {
        path: path.display().to_string(),
        source,
    })
}

#[must_use]
pub fn render(verdict: Verdict) -> String {
    match verdict {
        Verdict::Forward => "forward".to_string(),
        Verdict::Drop(reason) => format!("drop ({reason})"),
    }
}

#[must_use]
pub fn render_json(verdict: Verdict) -> serde_json::Value {
    let reason = match verdict {
        Verdict::Forward => None,
        Verdict::Drop(reason) => Some(reason),
    };
    serde_json::json!({
        "forward": verdict.is_forward(),
        "reason": reason,
    })
}
