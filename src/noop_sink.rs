use crate::record::LogEvent;
use crate::sink::{DeliveryError, LogSink};
use async_trait::async_trait;

/// [`LogSink`] with no collector behind it: every event is accepted on the
/// first attempt and goes nowhere.
///
/// `demos/load.rs` drives the emitter with it to time the fire-and-forget
/// path without network I/O, and the emitter tests use it when only the
/// console line matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn send(&self, _event: &LogEvent) -> Result<(), DeliveryError> {
        Ok(())
    }
}
