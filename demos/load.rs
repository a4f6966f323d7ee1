use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use log_relay::config::RetryPolicy;
use log_relay::console::StdConsole;
use log_relay::noop_sink::NoopSink;
use log_relay::shipper::Shipper;
use log_relay::{LogLevel, Logger};

#[tokio::main]
async fn main() {
    let (shipper, _handle) = Shipper::new(Arc::new(NoopSink), RetryPolicy::default());
    let logger = Logger::new(shipper, Arc::new(StdConsole));

    let n: u64 = 10_000;
    let start = Instant::now();

    for i in 0..n {
        logger.log("LoadTest", LogLevel::Info, "load", format!("iteration {}", i), None);
    }

    let elapsed = start.elapsed();

    // Give the dispatcher a little time to drain the channel
    sleep(Duration::from_secs(1)).await;

    let stats = logger.shipper().stats().snapshot();
    eprintln!(
        "emitted {} events in {:?} (~{:.0} ev/s), delivered {}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        stats.delivered
    );
}
