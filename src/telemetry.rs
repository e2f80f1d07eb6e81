//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the configured level when set.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Error returned when the global subscriber cannot be installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the filter for `settings`, falling back to `info` on a bad directive.
#[must_use]
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global fmt subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already set, e.g. on a second call.
pub fn init(settings: &LoggingSettings) -> Result<(), InitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_target(true);

    if settings.json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.compact().try_init()
    }
}
