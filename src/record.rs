use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Severity of a [`LogEvent`]. Closed set; there is no default level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Wire name, as sent in the body and in the `X-Log-Level` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Whether the console rendering carries the stack on a second line.
    pub fn includes_stack(&self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Fatal)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// One application log occurrence, as carried on the wire to the collector.
///
/// The timestamp is fixed when the event is built and travels unchanged
/// through every delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub stack: String,
    pub level: LogLevel,
    pub package_name: String,
    pub message: String,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl LogEvent {
    /// Build an event stamped with the current time.
    ///
    /// Empty metadata is dropped so the serialized form has no `metadata`
    /// key at all.
    pub fn new(
        stack: impl Into<String>,
        level: LogLevel,
        package_name: impl Into<String>,
        message: impl Into<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            stack: stack.into(),
            level,
            package_name: package_name.into(),
            message: message.into(),
            timestamp: iso_now(),
            metadata: metadata.filter(|m| !m.is_empty()),
        }
    }

    /// Capture time in ISO-8601 (UTC, millisecond precision).
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Current UTC time formatted like `2026-10-17T09:15:02.123Z`.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn metadata_key_absent_when_none_or_empty() {
        for metadata in [None, Some(Map::new())] {
            let event = LogEvent::new("CompA", LogLevel::Info, "Pkg1", "hello", metadata);
            let value = serde_json::to_value(&event).unwrap();
            let obj = value.as_object().unwrap();
            assert!(!obj.contains_key("metadata"));
            assert_eq!(obj.len(), 5);
        }
    }

    #[test]
    fn serializes_wire_field_names() {
        let mut metadata = Map::new();
        metadata.insert("code".to_string(), json!(42));
        let event = LogEvent::new("CompA", LogLevel::Error, "Pkg1", "disk full", Some(metadata));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["stack"], "CompA");
        assert_eq!(value["level"], "error");
        assert_eq!(value["packageName"], "Pkg1");
        assert_eq!(value["message"], "disk full");
        assert_eq!(value["metadata"], json!({ "code": 42 }));
        assert_eq!(value["timestamp"], event.timestamp());
    }

    #[test]
    fn timestamp_is_iso8601_utc() {
        let event = LogEvent::new("s", LogLevel::Warn, "p", "m", None);
        let ts = event.timestamp();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn clone_keeps_capture_time() {
        let event = LogEvent::new("s", LogLevel::Fatal, "p", "m", None);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(event.clone().timestamp(), event.timestamp());
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("fatal".parse::<LogLevel>(), Ok(LogLevel::Fatal));
        assert!("debug".parse::<LogLevel>().is_err());
        for level in LogLevel::ALL {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }

    #[test]
    fn only_error_and_fatal_include_stack() {
        assert!(!LogLevel::Info.includes_stack());
        assert!(!LogLevel::Warn.includes_stack());
        assert!(LogLevel::Error.includes_stack());
        assert!(LogLevel::Fatal.includes_stack());
    }
}
