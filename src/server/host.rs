//! Transport-agnostic server state
//!
//! `ExportHost` holds everything a request needs: configuration, the
//! credential store, the exporter registry and the precomputed index
//! descriptor. It is built once and shared behind an `Arc`.

use crate::config::ExportConfig;
use crate::core::credential::CredentialStore;
use crate::core::record::IndexDescriptor;
use crate::exporters::ExporterRegistry;
use crate::server::lifecycle::PLUGIN_VERSION;
use std::sync::Arc;

pub struct ExportHost {
    pub config: Arc<ExportConfig>,

    /// Gate for every route, the index included
    pub credentials: Arc<dyn CredentialStore>,

    pub exporters: Arc<ExporterRegistry>,

    /// Static site facts served on the empty route
    pub index: Arc<IndexDescriptor>,
}

impl ExportHost {
    pub fn new(
        config: ExportConfig,
        credentials: Arc<dyn CredentialStore>,
        exporters: ExporterRegistry,
    ) -> Self {
        let index = index_descriptor(&config);
        Self {
            config: Arc::new(config),
            credentials,
            exporters: Arc::new(exporters),
            index: Arc::new(index),
        }
    }

    /// Routes answered besides the index
    pub fn routes(&self) -> Vec<&str> {
        self.exporters.routes()
    }
}

/// Build the index descriptor from the configured site facts
pub fn index_descriptor(config: &ExportConfig) -> IndexDescriptor {
    let site = &config.site;
    IndexDescriptor {
        url: site.url.clone(),
        self_url: config.self_url(),
        version: site.version.clone(),
        charset: site.charset.clone(),
        pingback_url: site.pingback_url.clone(),
        rss_url: site.rss_url.clone(),
        rss2_url: site.rss2_url.clone(),
        chimp_plugin_version: PLUGIN_VERSION.to_string(),
    }
}
