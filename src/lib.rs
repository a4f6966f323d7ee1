pub mod config;
pub mod console;
pub mod emitter;
pub mod env;
pub mod record;
pub mod shipper;
pub mod sink;

#[cfg(feature = "http")]
pub mod http_sink;

#[cfg(feature = "collector")]
pub mod collector;
#[cfg(feature = "collector")]
pub mod server;

pub mod init;
pub mod noop_sink;

pub use emitter::Logger;
pub use init::log;
pub use record::{LogEvent, LogLevel};
