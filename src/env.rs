//! Environment variable names used by this crate for convenient
//! configuration of the shipper and the collector.
//!
//! These are purely helpers; [`crate::config`] types can always be built
//! explicitly without touching the environment.

/// Collector base URL the shipper posts to, e.g. `http://localhost:3000`.
pub const LOG_RELAY_URL_ENV: &str = "LOG_RELAY_URL";

/// Number of retries after the first failed attempt.
pub const LOG_RELAY_MAX_RETRIES_ENV: &str = "LOG_RELAY_MAX_RETRIES";

/// Fixed delay between attempts, in milliseconds.
pub const LOG_RELAY_RETRY_DELAY_MS_ENV: &str = "LOG_RELAY_RETRY_DELAY_MS";

/// Interface the collector binds to.
pub const LOG_RELAY_HOST_ENV: &str = "LOG_RELAY_HOST";

/// Port the collector listens on.
pub const LOG_RELAY_PORT_ENV: &str = "LOG_RELAY_PORT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when
/// it is unset or does not parse.
pub fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
