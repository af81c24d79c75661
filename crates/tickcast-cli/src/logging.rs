//! Logging initialisation.
//!
//! Logs go to stderr so stdout carries only command output. `RUST_LOG`
//! overrides the default level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Install the global subscriber. Returns false when one was already set,
/// in which case the existing subscriber is kept.
pub fn init(verbose: bool, format: LogFormat) -> bool {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            if verbose {
                eprintln!("logging already initialised: {error}");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_existing_subscriber() {
        init(false, LogFormat::Text);
        assert!(!init(true, LogFormat::Json));
    }
}
