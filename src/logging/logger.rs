// file: src/logging/logger.rs
// version: 1.0.0
// guid: 2e175ea5-a62a-48fd-80cf-38990e0de609

//! Logger initialization and configuration

use crate::{error::BatchError, Result};
use std::future::Future;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter directive for the CLI verbosity flags
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the logging system.
///
/// Log lines go to stderr; stdout is reserved for command output such as
/// `paths --json` or the diff report.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::new(level_for(verbose, quiet));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| BatchError::LoggingError(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Run `work` inside an `operation` span tagged with the batch it serves
pub async fn in_operation_span<Fut>(operation: &str, batch: &str, work: Fut) -> Fut::Output
where
    Fut: Future,
{
    let span = tracing::info_span!("operation", name = operation, batch = batch);
    work.instrument(span).await
}
