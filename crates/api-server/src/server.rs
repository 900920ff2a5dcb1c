//! API server — binds the HTTP listener and the metrics exporter.

use crate::handlers::ApiState;
use crate::router::api_router;
use mailcast_core::config::AppConfig;
use std::net::SocketAddr;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    state: ApiState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: ApiState) -> Self {
        Self { config, state }
    }

    /// Start the HTTP server. Runs until the process exits.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = api_router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);
        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Install the Prometheus recorder and exporter on a separate port.
    /// Must be called from within the runtime.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
