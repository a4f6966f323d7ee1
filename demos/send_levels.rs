use serde_json::json;
use tokio::time::{sleep, Duration};

use log_relay::init::init_logger_from_env;
use log_relay::{log, LogLevel};

/// Emits one event per level plus one carrying nested metadata.
///
/// Start `log-collector` first; without it every event is retried three
/// times and then dropped, with a diagnostic line per failed attempt.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Also installs the stderr subscriber for delivery failures.
    init_logger_from_env()?;

    log("TestComponent", LogLevel::Info, "TestApp", "This is an info message", None);
    log("TestComponent", LogLevel::Warn, "TestApp", "This is a warning message", None);
    log("TestComponent", LogLevel::Error, "TestApp", "This is an error message", None);
    log("TestComponent", LogLevel::Fatal, "TestApp", "This is a fatal error message", None);

    let metadata = json!({
        "errorCode": "TEST_001",
        "details": { "action": "test", "status": "failed" }
    });
    log(
        "TestComponent",
        LogLevel::Error,
        "TestApp",
        "Error with metadata",
        metadata.as_object().cloned(),
    );

    // Long enough for a full retry chain when the collector is down.
    sleep(Duration::from_secs(5)).await;
    Ok(())
}
