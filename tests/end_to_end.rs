#![cfg(all(feature = "http", feature = "collector"))]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use log_relay::config::{CollectorConfig, RetryPolicy, ShipperConfig};
use log_relay::console::{CapturedConsole, Channel};
use log_relay::http_sink::HttpSink;
use log_relay::server::CollectorServer;
use log_relay::shipper::{Delivery, DeliveryOutcome, Shipper};
use log_relay::{LogEvent, LogLevel, Logger};

/// Start a collector on an ephemeral port; returns its base URL.
async fn start_collector(console: Arc<CapturedConsole>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = CollectorServer::with_console(CollectorConfig::default(), console);
    tokio::spawn(server.serve(listener, std::future::pending()));
    format!("http://{}", addr)
}

fn shipper_config(base_url: String, retry: RetryPolicy) -> ShipperConfig {
    ShipperConfig {
        base_url,
        retry,
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

async fn wait_for<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}

#[tokio::test]
async fn disk_full_event_reaches_collector() {
    let collector_console = Arc::new(CapturedConsole::new());
    let base_url = start_collector(collector_console.clone()).await;

    // Direct post, to inspect the acknowledgment itself.
    let event = LogEvent::new(
        "CompA",
        LogLevel::Error,
        "Pkg1",
        "disk full",
        json!({ "code": 42 }).as_object().cloned(),
    );
    let resp = reqwest::Client::new()
        .post(format!("{}/logs", base_url))
        .header("X-Log-Level", "error")
        .json(&event)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack, json!({ "message": "Log received successfully" }));

    let (channel, block) = collector_console.lines()[0].clone();
    assert_eq!(channel, Channel::Out);
    let timestamp_line = format!("Timestamp: {}", event.timestamp());
    for expected in [
        "Level: error",
        "Package: Pkg1",
        "Message: disk full",
        "Stack: CompA",
        timestamp_line.as_str(),
        "Metadata: {\n  \"code\": 42\n}",
    ] {
        assert!(block.contains(expected), "missing {:?} in {}", expected, block);
    }
}

#[tokio::test]
async fn logger_ships_through_http_sink() {
    let collector_console = Arc::new(CapturedConsole::new());
    let base_url = start_collector(collector_console.clone()).await;

    let config = shipper_config(base_url, RetryPolicy::default());
    let sink = HttpSink::new(&config).unwrap();
    let (shipper, _handle) = Shipper::new(Arc::new(sink), config.retry);
    let app_console = Arc::new(CapturedConsole::new());
    let logger = Logger::new(shipper, app_console.clone());

    logger.log(
        "CompA",
        LogLevel::Error,
        "Pkg1",
        "disk full",
        json!({ "code": 42 }).as_object().cloned(),
    );
    logger.log("CompB", LogLevel::Info, "Pkg2", "all good", None);

    // Local rendering happens synchronously.
    let local = app_console.lines();
    assert_eq!(local.len(), 2);
    assert_eq!(local[0].0, Channel::Error);
    assert!(local[0].1.ends_with("[Pkg1] disk full\nStack: CompA"));
    assert_eq!(local[1].0, Channel::Out);

    // The collector prints before it acknowledges.
    wait_for(|| logger.shipper().stats().snapshot().delivered == 2).await;
    assert_eq!(logger.shipper().stats().snapshot().failed_attempts, 0);
    assert_eq!(collector_console.lines().len(), 2);

    let blocks: Vec<String> = collector_console.lines().into_iter().map(|(_, b)| b).collect();
    assert!(blocks.iter().any(|b| b.contains("Message: disk full") && b.contains("\"code\": 42")));
    assert!(blocks.iter().any(|b| b.contains("Message: all good") && !b.contains("Metadata:")));
}

#[tokio::test]
async fn unreachable_collector_is_tried_four_times() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = shipper_config(
        format!("http://{}", addr),
        RetryPolicy::new(3, Duration::from_millis(20)),
    );
    let delivery = Delivery::new(Arc::new(HttpSink::new(&config).unwrap()), config.retry);

    let event = LogEvent::new("CompA", LogLevel::Fatal, "Pkg1", "nobody home", None);
    let outcome = delivery.deliver(&event).await;

    assert_eq!(outcome, DeliveryOutcome::Exhausted { attempts: 4 });
    assert_eq!(delivery.stats().snapshot().attempts, 4);
}
