//! Environment variable parsing with warn-level logging for invalid values.

use std::time::Duration;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns
///   `default`, instead of silently swallowing the parse failure.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %raw,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Duration (whole seconds) from an environment variable.
pub fn env_duration_secs(var: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_parse_with_default(var, default_secs))
}
