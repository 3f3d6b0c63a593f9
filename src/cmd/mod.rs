//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`check`], [`filter`], or `ping`. Each handler
//! lives in its own submodule.

pub mod check;
pub mod filter;
#[cfg(feature = "sentry-integration")]
pub mod ping;

use crate::cli::{Cli, Commands};
use crate::error::GatewayError;

pub async fn dispatch(cli: Cli) -> Result<(), GatewayError> {
    match cli.command {
        Some(Commands::Check(ref args)) => check::execute(args),
        Some(Commands::Filter(ref args)) => filter::execute(args).await,
        #[cfg(feature = "sentry-integration")]
        Some(Commands::Ping(args)) => ping::execute(*args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    println!(
        "\n  reportgate v{} \u{2014} error-reporting gateway\n\n  \
         No command provided. To get started:\n\n    \
         reportgate check gateway.yaml     Validate a filter config\n    \
         reportgate filter report.json     Evaluate the filter against a report\n    \
         reportgate --help                 See all commands and options\n",
        env!("CARGO_PKG_VERSION")
    );
}
