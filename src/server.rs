//! Collector process: binds a TCP listener and serves the ingestion router.

use crate::collector::create_router;
use crate::config::CollectorConfig;
use crate::console::{Console, StdConsole};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Log collector server.
pub struct CollectorServer {
    config: CollectorConfig,
    router: Router,
}

impl CollectorServer {
    /// Collector that prints received events to the process's stdout.
    pub fn new(config: CollectorConfig) -> Self {
        Self::with_console(config, Arc::new(StdConsole))
    }

    pub fn with_console(config: CollectorConfig, console: Arc<dyn Console>) -> Self {
        Self {
            config,
            router: create_router(console),
        }
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        info!("Binding to TCP: {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();
        info!("Log server listening at http://localhost:{}", port);
        info!("Ready to receive logs...");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish once shutdown starts.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Log server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving until the process is killed.
        error!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
