//! Logging setup and the stage wrapper used around every pipeline step.

use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Banner marking the start of a run.
pub fn log_startup_header() {
    let rule = "=".repeat(80);
    info!("{}", rule);
    info!(" Terrain generator started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", rule);
}

/// Run `stage` inside a span, logging entry, elapsed time on success, and the error on failure.
pub fn traced_stage<T, E, F>(name: &str, stage: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    let span = info_span!("stage", stage = name);
    let _guard = span.enter();

    debug!("entering {}", name);
    let start = Instant::now();
    let result = stage();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(_) => info!(elapsed_ms, "{} complete", name),
        Err(e) => error!(elapsed_ms, "{} failed: {}", name, e),
    }
    result
}
