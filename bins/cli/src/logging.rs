//! Tracing subscriber setup.
//!
//! Events go to stderr so stdout stays machine-readable. `RUST_LOG` wins
//! over the configured filter when set.

use crate::error::CliError;
use sortguard_config::{LogConfig, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber for this process.
pub fn init_tracing(config: &LogConfig) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|error| CliError::InvalidInput(format!("invalid log filter: {error}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    // A subscriber already installed (e.g. by a test harness) is kept.
    if let Err(error) = installed {
        tracing::debug!(target: "sortguard::cli", %error, "tracing subscriber already set");
    }
    Ok(())
}
