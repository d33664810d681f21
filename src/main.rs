//! chatstore - durable chat-session history
//!
#![doc = "Main entry point for the chatstore command-line tool."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatstore::cli::Cli;
use chatstore::commands;
use chatstore::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config = Config::load(&cli.config, &cli)?;
    config.validate()?;

    tracing::debug!(
        backend = %config.storage.backend,
        key = %config.storage.key,
        "Loaded configuration"
    );

    commands::run(config, cli.command).await
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "chatstore=debug"
    } else {
        "chatstore=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
