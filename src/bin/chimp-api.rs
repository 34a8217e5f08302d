//! Runnable export server
//!
//! Environment:
//! - `CHIMP_CONFIG`: YAML configuration file (defaults apply when unset)
//! - `CHIMP_SNAPSHOT`: JSON host snapshot to serve (empty host when unset)
//! - `RUST_LOG`: log filter, `info` by default

use anyhow::Result;
use chimp::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("CHIMP_CONFIG") {
        Ok(path) => ExportConfig::from_yaml_file(&path)?,
        Err(_) => ExportConfig::default(),
    };

    let host = match std::env::var("CHIMP_SNAPSHOT") {
        Ok(path) => {
            tracing::info!("Loading host snapshot from {}", path);
            InMemoryHost::from_json_file(&path)?
        }
        Err(_) => {
            tracing::warn!("CHIMP_SNAPSHOT not set, serving an empty host");
            InMemoryHost::new().with_site_url(config.site.url.clone())
        }
    };

    let settings: Arc<dyn SettingsStore> = match &config.settings_path {
        Some(path) => Arc::new(JsonFileSettings::open(path)?),
        None => Arc::new(InMemorySettings::new()),
    };

    sync_version_marker(settings.as_ref())?;

    let credentials = SettingsCredentialStore::new(settings.clone());
    if credentials.current()?.is_none() {
        let key = activate(&credentials)?;
        // Printed once so the operator can hand it to the migration client
        println!("API key: {}", key);
    } else {
        tracing::info!("Using the stored API key");
    }

    tracing::info!(
        "Export API mounted at {}",
        config.self_url()
    );

    ServerBuilder::new()
        .with_config(config)
        .with_host(HostServices::from_host(Arc::new(host)))
        .with_settings(settings)
        .serve()
        .await
}
