//! ServerBuilder for fluent API to build the export server

use super::dispatch::build_routes;
use super::host::ExportHost;
use crate::config::ExportConfig;
use crate::core::credential::{CredentialStore, SettingsCredentialStore};
use crate::core::filter::FilterPipeline;
use crate::core::host::HostServices;
use crate::core::settings::SettingsStore;
use crate::exporters::{Exporter, ExporterRegistry};
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the export server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_host(HostServices::from_host(Arc::new(InMemoryHost::new())))
///     .with_settings(Arc::new(InMemorySettings::new()))
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ExportConfig,
    host: Option<HostServices>,
    credentials: Option<Arc<dyn CredentialStore>>,
    filters: Option<FilterPipeline>,
    exporters: Vec<Arc<dyn Exporter>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
            host: None,
            credentials: None,
            filters: None,
            exporters: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host collaborators (required)
    pub fn with_host(mut self, host: HostServices) -> Self {
        self.host = Some(host);
        self
    }

    /// Keep the API key in the given settings store
    pub fn with_settings(self, settings: Arc<dyn SettingsStore>) -> Self {
        self.with_credentials(Arc::new(SettingsCredentialStore::new(settings)))
    }

    /// Set the credential store directly (required unless settings are given)
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the content filters applied to titles, bodies and GUIDs
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Add an exporter next to the standard ones, or replace one by route
    pub fn register_exporter(mut self, exporter: impl Exporter + 'static) -> Self {
        self.exporters.push(Arc::new(exporter));
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(self) -> Result<ExportHost> {
        self.config.validate()?;

        let mut host = self
            .host
            .ok_or_else(|| anyhow!("HostServices are required. Call .with_host()"))?;
        if let Some(filters) = self.filters {
            host = host.with_filters(filters);
        }

        let credentials = self.credentials.ok_or_else(|| {
            anyhow!("A credential store is required. Call .with_settings() or .with_credentials()")
        })?;

        let mut registry = ExporterRegistry::standard(&host, &self.config);
        for exporter in self.exporters {
            registry.register(exporter);
        }

        Ok(ExportHost::new(self.config, credentials, registry))
    }

    /// Build the router with request tracing
    pub fn build(self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        Ok(build_routes(host).layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the configured address and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
