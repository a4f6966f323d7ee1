use crate::config::ShipperConfig;
use crate::record::LogEvent;
use crate::sink::{DeliveryError, LogSink};
use async_trait::async_trait;
use reqwest::Client;

/// Header repeating the event level outside the body, for middleware.
pub const LOG_LEVEL_HEADER: &str = "X-Log-Level";

/// [`LogSink`] that posts each event as JSON to the collector's `/logs`
/// route.
#[derive(Clone)]
pub struct HttpSink {
    client: Client,
    url: String,
}

impl HttpSink {
    /// Build a sink for the collector described by `config`.
    ///
    /// **Returns**
    /// - `Err(..)` only if the underlying HTTP client cannot be built
    ///   (e.g. TLS backend initialization failed).
    pub fn new(config: &ShipperConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            url: config.logs_url(),
        })
    }
}

#[async_trait]
impl LogSink for HttpSink {
    async fn send(&self, event: &LogEvent) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(event)?;
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(LOG_LEVEL_HEADER, event.level.as_str())
            .body(body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(DeliveryError::Rejected { status, body })
        }
    }
}
