//! Logging setup.
//!
//! Logs go to stderr so that `--format json` output on stdout stays parseable.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber.
///
/// # Arguments
/// * `level` - Default filter (e.g., "info", "qrtrack=debug")
/// * `json_format` - Emit one JSON object per event instead of human-readable lines
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
