use crate::record::LogEvent;
use async_trait::async_trait;

/// Why a single delivery attempt failed.
///
/// Every variant is treated the same way by the retry loop; the split only
/// matters for the diagnostic line printed per failed attempt.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[cfg(feature = "http")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collector responded with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Asynchronous destination for [`LogEvent`]s handed over by the shipper.
///
/// Implementations carry a single attempt only. Retrying, delays and
/// giving up are owned by [`crate::shipper::Delivery`], which calls `send`
/// from a detached Tokio task and never from the application thread.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Make one attempt to hand `event` to the backend.
    ///
    /// **Returns**
    /// - `Ok(())` once the backend acknowledged the event.
    /// - `Err(..)` on any failure (network, encoding, non-success status).
    ///   The caller may resend the very same event afterwards.
    async fn send(&self, event: &LogEvent) -> Result<(), DeliveryError>;
}
