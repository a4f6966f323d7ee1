use crate::console::{Console, StdConsole};
use crate::emitter::{render_console, Logger};
use crate::record::{LogEvent, LogLevel};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "http")]
use crate::config::ShipperConfig;
#[cfg(feature = "http")]
use crate::http_sink::HttpSink;
#[cfg(feature = "http")]
use crate::shipper::Shipper;
#[cfg(feature = "http")]
use std::sync::Arc;
#[cfg(feature = "http")]
use tokio::task::JoinHandle;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Filter used by [`init_logger`] when `RUST_LOG` is unset: enough for the
/// per-attempt delivery failures, quiet otherwise.
pub const DIAGNOSTICS_FILTER: &str = "warn";

/// Error returned when installing the process-wide logger.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global logger is already initialized")]
    AlreadyInitialized,

    #[cfg(feature = "http")]
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Install the process-wide [`Logger`] used by [`log`].
///
/// **Parameters**
/// - `config`: collector location and retry behaviour.
///
/// **Returns**
/// - The dispatcher task handle. It can be ignored; the task lives as
///   long as the global logger.
/// - `Err(InitError::AlreadyInitialized)` on a second call.
///
/// **Effects**
///
/// With `config.enable_diagnostics` (the default) this also installs the
/// [`init_tracing`] subscriber, so every failed delivery attempt prints a
/// line on stderr. An already installed subscriber is left in place.
///
/// Must be called from within a Tokio runtime.
#[cfg(feature = "http")]
pub fn init_logger(config: ShipperConfig) -> Result<JoinHandle<()>, InitError> {
    if GLOBAL_LOGGER.get().is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    if config.enable_diagnostics {
        init_tracing(DIAGNOSTICS_FILTER);
    }
    let sink = HttpSink::new(&config)?;
    let (shipper, handle) = Shipper::new(Arc::new(sink), config.retry);
    let logger = Logger::new(shipper, Arc::new(StdConsole));

    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| InitError::AlreadyInitialized)?;
    Ok(handle)
}

/// Install the process-wide logger with [`ShipperConfig::from_env`].
#[cfg(feature = "http")]
pub fn init_logger_from_env() -> Result<JoinHandle<()>, InitError> {
    init_logger(ShipperConfig::from_env())
}

/// The process-wide logger, if [`init_logger`] ran.
pub fn global() -> Option<&'static Logger> {
    GLOBAL_LOGGER.get()
}

/// Log through the process-wide logger.
///
/// Before initialization the event is still rendered to the standard
/// console, but it is not shipped anywhere.
pub fn log(
    stack: impl Into<String>,
    level: LogLevel,
    package_name: impl Into<String>,
    message: impl Into<String>,
    metadata: Option<Map<String, Value>>,
) {
    match GLOBAL_LOGGER.get() {
        Some(logger) => logger.log(stack, level, package_name, message, metadata),
        None => {
            let event = LogEvent::new(stack, level, package_name, message, metadata);
            tracing::debug!(
                level = %event.level,
                "global logger not initialized, event not shipped"
            );
            let (channel, text) = render_console(&event);
            StdConsole.write_line(channel, &text);
        }
    }
}

/// Install a `fmt` subscriber for the crate's own diagnostics.
///
/// `RUST_LOG` wins over `default_filter` when set. Does nothing if a
/// global subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
