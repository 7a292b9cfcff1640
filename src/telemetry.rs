//! Tracing subscriber bootstrap.

use crate::config::TaskwardConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Parses a `log_filter` directive string.
///
/// # Errors
///
/// Returns the parser error for a malformed directive.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(directives)
}

/// Installs a global `fmt` subscriber filtered by `config.log_filter`.
///
/// A malformed `log_filter` falls back to the default filter and is
/// reported with a `warn` event once the subscriber is installed.
///
/// Returns `false` when a global subscriber was already installed, which
/// leaves the existing one in place.
#[must_use]
pub fn init_tracing(config: &TaskwardConfig) -> bool {
    let (filter, rejected) = match parse_filter(&config.log_filter) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(TaskwardConfig::default().log_filter), Some(err)),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();
    if let Some(err) = rejected {
        warn!(
            filter = %config.log_filter,
            error = %err,
            "invalid log filter, using the default"
        );
    }
    installed
}
