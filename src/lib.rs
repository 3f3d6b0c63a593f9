//! reportgate is an error-reporting gateway for applications that embed
//! untrusted or noisy code.
//!
//! It decides whether monitoring is active, lazily acquires a telemetry
//! backend, drops known-benign error signatures before they leave the
//! process, and exposes a small facade (breadcrumbs, exception capture,
//! scope and user identity) that is safe to call at any time.
//!
//! # Architecture
//!
//! - [`gateway`] -- [`ReportingGateway`](gateway::ReportingGateway), the
//!   gated facade and its initialization lifecycle.
//! - [`filter`] -- Ignore-list, URL allow/deny lists, and the noise predicate.
//! - [`event`] -- Backend-neutral error events, hints, and breadcrumbs.
//! - [`backend`] -- The [`TelemetryBackend`](backend::TelemetryBackend) and
//!   [`BackendProvider`](backend::BackendProvider) traits.
//! - [`config`] -- Configuration file model, loading, and validation.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (check, filter, ping).
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `sentry-integration` | Sentry backend _(enabled by default)_ |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod backend;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod gateway;
pub mod logging;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;

/// Release tag reported with every event, fixed at build time.
pub const RELEASE: &str = env!("REPORTGATE_RELEASE");
