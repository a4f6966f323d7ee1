use crate::env::{
    env_or, env_parse_or, LOG_RELAY_HOST_ENV, LOG_RELAY_MAX_RETRIES_ENV, LOG_RELAY_PORT_ENV,
    LOG_RELAY_RETRY_DELAY_MS_ENV, LOG_RELAY_URL_ENV,
};
use std::time::Duration;

/// Base URL shared by the shipper and the collector out of the box.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Port the collector listens on out of the box.
pub const DEFAULT_PORT: u16 = 3000;

/// Retries after the initial attempt (4 attempts in total).
pub const MAX_RETRIES: u32 = 3;

/// Fixed pause between two consecutive attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Retry behaviour of the shipper.
///
/// The delay is fixed: every retry waits exactly `delay`, there is no
/// exponential growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Build a policy, clamping the delay to at least one millisecond.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay: delay.max(Duration::from_millis(1)),
        }
    }

    /// Upper bound on attempts for a single event.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_DELAY)
    }
}

/// Configuration of the client side (emitter + shipper).
///
/// **Fields**
/// - `base_url`: collector root; events go to `<base_url>/logs`.
/// - `retry`: see [`RetryPolicy`].
/// - `request_timeout`: per-attempt HTTP timeout; an expired attempt is
///   a transport failure like any other.
/// - `enable_diagnostics`: if `true`, [`crate::init::init_logger`] also
///   installs a `fmt` subscriber so the per-attempt failure lines reach
///   stderr. Turn it off when the application sets up `tracing` itself.
#[derive(Clone, Debug)]
pub struct ShipperConfig {
    pub base_url: String,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub enable_diagnostics: bool,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(10),
            enable_diagnostics: true,
        }
    }
}

impl ShipperConfig {
    /// Defaults overridden by `LOG_RELAY_URL`, `LOG_RELAY_MAX_RETRIES` and
    /// `LOG_RELAY_RETRY_DELAY_MS` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let retry = RetryPolicy::new(
            env_parse_or(LOG_RELAY_MAX_RETRIES_ENV, MAX_RETRIES),
            Duration::from_millis(env_parse_or(
                LOG_RELAY_RETRY_DELAY_MS_ENV,
                RETRY_DELAY.as_millis() as u64,
            )),
        );
        Self {
            base_url: env_or(LOG_RELAY_URL_ENV, DEFAULT_BASE_URL),
            retry,
            ..defaults
        }
    }

    /// Full URL of the ingestion route.
    pub fn logs_url(&self) -> String {
        format!("{}/logs", self.base_url.trim_end_matches('/'))
    }
}

/// Where the collector listens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectorConfig {
    pub host: String,
    pub port: u16,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl CollectorConfig {
    /// Defaults overridden by `LOG_RELAY_HOST` and `LOG_RELAY_PORT`.
    pub fn from_env() -> Self {
        Self {
            host: env_or(LOG_RELAY_HOST_ENV, "0.0.0.0"),
            port: env_parse_or(LOG_RELAY_PORT_ENV, DEFAULT_PORT),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_three_retries_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn zero_delay_is_clamped() {
        let policy = RetryPolicy::new(1, Duration::ZERO);
        assert_eq!(policy.delay, Duration::from_millis(1));
    }

    #[test]
    fn logs_url_tolerates_trailing_slash() {
        let config = ShipperConfig {
            base_url: "http://localhost:3000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.logs_url(), "http://localhost:3000/logs");
        assert_eq!(ShipperConfig::default().logs_url(), "http://localhost:3000/logs");
    }

    #[test]
    fn collector_defaults_to_port_3000() {
        assert_eq!(CollectorConfig::default().bind_addr(), "0.0.0.0:3000");
    }
}
