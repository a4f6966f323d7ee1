use std::io::Write;
use std::sync::Mutex;

/// Output channel of the host console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Standard output.
    Out,
    /// Warning channel.
    Warn,
    /// Error channel.
    Error,
}

/// The host process's console, as seen by the emitter and the collector.
///
/// Human-readable renderings go through this trait instead of `tracing`, so
/// their exact text is part of the product and can be captured in tests.
pub trait Console: Send + Sync {
    fn write_line(&self, channel: Channel, text: &str);
}

/// Writes `Out` to stdout, `Warn` and `Error` to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&self, channel: Channel, text: &str) {
        // A closed stdio handle must not take the caller down.
        let _ = match channel {
            Channel::Out => writeln!(std::io::stdout().lock(), "{}", text),
            Channel::Warn | Channel::Error => writeln!(std::io::stderr().lock(), "{}", text),
        };
    }
}

/// In-memory console that records every line, in order.
#[derive(Debug, Default)]
pub struct CapturedConsole {
    lines: Mutex<Vec<(Channel, String)>>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Console for CapturedConsole {
    fn write_line(&self, channel: Channel, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((channel, text.to_string()));
        }
    }
}
