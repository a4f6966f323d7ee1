use crate::config::RetryPolicy;
use crate::record::LogEvent;
use crate::sink::LogSink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Terminal state of one event's attempt chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The sink acknowledged the event on attempt number `attempts`.
    Delivered { attempts: u32 },
    /// Every allowed attempt failed; the event was dropped.
    Exhausted { attempts: u32 },
}

/// Counters shared by every delivery task of a shipper.
#[derive(Debug, Default)]
pub struct ShipperStats {
    /// Calls made to the sink, successful or not.
    pub attempts: AtomicU64,
    /// Events acknowledged by the sink.
    pub delivered: AtomicU64,
    /// Attempts that failed (each one printed a diagnostic).
    pub failed_attempts: AtomicU64,
    /// Events given up on, either exhausted or never dispatched.
    pub dropped: AtomicU64,
}

/// Plain copy of [`ShipperStats`] at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub attempts: u64,
    pub delivered: u64,
    pub failed_attempts: u64,
    pub dropped: u64,
}

impl ShipperStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Bounded, fixed-delay retry loop around a [`LogSink`].
///
/// Each call to [`Delivery::deliver`] owns its own attempt counter, so any
/// number of events can be in flight at once without interfering.
pub struct Delivery {
    sink: Arc<dyn LogSink>,
    policy: RetryPolicy,
    stats: Arc<ShipperStats>,
}

impl Delivery {
    pub fn new(sink: Arc<dyn LogSink>, policy: RetryPolicy) -> Self {
        Self {
            sink,
            policy,
            stats: Arc::new(ShipperStats::default()),
        }
    }

    pub fn stats(&self) -> &Arc<ShipperStats> {
        &self.stats
    }

    /// Try to hand `event` to the sink, at most `max_retries + 1` times.
    ///
    /// The same event (and therefore the same timestamp) is resent on every
    /// attempt. Failures are reported as diagnostics only; nothing is
    /// returned as an error.
    pub async fn deliver(&self, event: &LogEvent) -> DeliveryOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            self.stats.attempts.fetch_add(1, Ordering::Relaxed);
            match self.sink.send(event).await {
                Ok(()) => {
                    self.stats.delivered.fetch_add(1, Ordering::Relaxed);
                    return DeliveryOutcome::Delivered { attempts: attempt + 1 };
                }
                Err(e) => {
                    self.stats.failed_attempts.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        level = %event.level,
                        package = %event.package_name,
                        "error sending log to collector (attempt {}/{}): {}",
                        attempt + 1,
                        max_attempts,
                        e
                    );

                    if attempt >= self.policy.max_retries {
                        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                        return DeliveryOutcome::Exhausted { attempts: attempt + 1 };
                    }

                    sleep(self.policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Fire-and-forget front of the delivery path.
///
/// [`Shipper::ship`] only pushes onto an unbounded channel; a background
/// dispatcher task spawns one detached [`Delivery::deliver`] per event.
#[derive(Clone)]
pub struct Shipper {
    sender: mpsc::UnboundedSender<LogEvent>,
    stats: Arc<ShipperStats>,
}

impl Shipper {
    /// Create a shipper and spawn its dispatcher on the current Tokio
    /// runtime.
    ///
    /// The dispatcher ends once every clone of the returned shipper is
    /// dropped; deliveries already spawned keep running to completion.
    pub fn new(sink: Arc<dyn LogSink>, policy: RetryPolicy) -> (Self, JoinHandle<()>) {
        let delivery = Arc::new(Delivery::new(sink, policy));
        let stats = Arc::clone(delivery.stats());
        let (tx, mut rx) = mpsc::unbounded_channel::<LogEvent>();

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let delivery = Arc::clone(&delivery);
                tokio::spawn(async move {
                    let outcome = delivery.deliver(&event).await;
                    debug!(?outcome, level = %event.level, "log delivery finished");
                });
            }
            debug!("log shipper dispatcher stopped");
        });

        (Self { sender: tx, stats }, handle)
    }

    /// Queue `event` for delivery and return immediately.
    pub fn ship(&self, event: LogEvent) {
        if self.sender.send(event).is_err() {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            warn!("log shipper dispatcher is gone, dropping log event");
        }
    }

    pub fn stats(&self) -> &Arc<ShipperStats> {
        &self.stats
    }
}
