//! Storia CLI
//!
//! Generates, summarizes and screens bedtime stories with the configured
//! providers. Output is JSON on stdout, logs go to stderr.

use std::sync::Arc;

use clap::Parser;
use infrastructure::{AppConfig, AppContext, init_tracing};
use presentation_cli::{Cli, run};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?;
    init_tracing(&config.logging.clone().with_verbosity(cli.verbose))?;
    debug!(command = ?cli.command, "Starting storia-cli v{}", env!("CARGO_PKG_VERSION"));

    let context = AppContext::build(Arc::new(config))?;
    let stdout = std::io::stdout();
    run(&cli.command, &context, &mut stdout.lock())
}
