use crate::console::{Channel, Console};
use crate::record::{iso_now, LogEvent, LogLevel};
use crate::shipper::Shipper;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Application-facing logger: builds a [`LogEvent`], hands it to the
/// [`Shipper`] and prints a formatted line to the [`Console`].
#[derive(Clone)]
pub struct Logger {
    shipper: Shipper,
    console: Arc<dyn Console>,
}

impl Logger {
    pub fn new(shipper: Shipper, console: Arc<dyn Console>) -> Self {
        Self { shipper, console }
    }

    pub fn shipper(&self) -> &Shipper {
        &self.shipper
    }

    /// Record one log occurrence.
    ///
    /// Returns immediately and never fails: delivery runs as a detached
    /// task whose outcome is not reported back. The console line is always
    /// written, whatever happens to the delivery.
    pub fn log(
        &self,
        stack: impl Into<String>,
        level: LogLevel,
        package_name: impl Into<String>,
        message: impl Into<String>,
        metadata: Option<Map<String, Value>>,
    ) {
        let event = LogEvent::new(stack, level, package_name, message, metadata);
        let (channel, text) = render_console(&event);
        self.shipper.ship(event);
        self.console.write_line(channel, &text);
    }
}

/// Console channel for `level`.
pub fn channel_for(level: LogLevel) -> Channel {
    match level {
        LogLevel::Info => Channel::Out,
        LogLevel::Warn => Channel::Warn,
        LogLevel::Error | LogLevel::Fatal => Channel::Error,
    }
}

/// `[<now>] [<package>] <message>`, plus `Stack: <stack>` on a second line
/// for error and fatal.
///
/// The leading timestamp is taken at render time, not from the event.
pub fn render_console(event: &LogEvent) -> (Channel, String) {
    let mut text = format!("[{}] [{}] {}", iso_now(), event.package_name, event.message);
    if event.level.includes_stack() {
        text.push_str("\nStack: ");
        text.push_str(&event.stack);
    }
    (channel_for(event.level), text)
}
