//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (check, filter, ping), and their associated argument
//! structs. Flags that matter in deployments have environment variable
//! equivalents.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "reportgate",
    version,
    about = "Error-reporting gateway with noise filtering",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        reportgate check gateway.yaml             Validate a filter config\n  \
        reportgate filter report.json             Would this report be sent?\n  \
        reportgate ping --dsn $SENTRY_DSN         Send a test report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a config file
    Check(CheckArgs),

    /// Evaluate the suppression filter against an error report
    Filter(FilterArgs),

    /// Initialize the gateway and send a test report
    #[cfg(feature = "sentry-integration")]
    Ping(Box<PingArgs>),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Config file to validate
    #[arg(default_value = "reportgate.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        reportgate filter report.json                     Built-in rules\n  \
        reportgate filter report.json -c gateway.yaml     Configured rules\n  \
        reportgate filter report.json --format json       Machine-readable")]
pub struct FilterArgs {
    /// JSON file holding `{ \"event\": ..., \"hint\": ... }`
    pub report: PathBuf,

    /// Config file (.yaml, .json, .toml); built-in rules when omitted
    #[arg(short, long, env = "REPORTGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(feature = "sentry-integration")]
#[derive(Args)]
pub struct PingArgs {
    /// Sentry DSN
    #[arg(long, env = "SENTRY_DSN")]
    pub dsn: String,

    /// Config file (.yaml, .json, .toml); built-in rules when omitted
    #[arg(short, long, env = "REPORTGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Environment tag, overrides the config file
    #[arg(long, env = "SENTRY_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Attach this user id to the test report
    #[arg(long)]
    pub user_id: Option<String>,

    /// Opt out of monitoring; the ping becomes a no-op
    #[arg(
        long,
        env = "DO_NOT_TRACK",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub do_not_track: bool,

    /// Seconds to wait for the report to be delivered
    #[arg(long, default_value_t = 5)]
    pub flush_timeout: u64,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
