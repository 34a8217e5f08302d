//! Entity exporters
//!
//! Each exporter turns one page of host records for a single content kind
//! into normalized records plus the pagination envelope. The dispatcher only
//! sees the object-safe [`Exporter`] trait; the typed `page` methods on the
//! concrete exporters are what tests and embedders use directly.

pub mod author;
pub mod comments;
pub mod media;
pub mod posts;
pub mod users;

pub use author::AuthorResolver;
pub use comments::CommentExporter;
pub use media::MediaExporter;
pub use posts::PostExporter;
pub use users::UserExporter;

use crate::config::ExportConfig;
use crate::core::error::ExportError;
use crate::core::host::HostServices;
use crate::core::query::PaginationMeta;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// One exported page of typed records
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub pagination: PaginationMeta,
}

impl<R: Serialize> Page<R> {
    /// Erase the record type for the dispatcher
    pub fn into_json(self, entity: &str) -> Result<ExportPage, ExportError> {
        let records = self
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ExportError::upstream(entity, e))?;

        Ok(ExportPage {
            records,
            pagination: self.pagination,
        })
    }
}

/// One exported page as JSON values
#[derive(Debug, Clone)]
pub struct ExportPage {
    pub records: Vec<Value>,
    pub pagination: PaginationMeta,
}

/// Object-safe exporter interface used by the dispatcher
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Route segment the exporter answers on (e.g. "posts")
    fn route(&self) -> &str;

    /// Export one 1-based page
    async fn export(&self, page: usize) -> Result<ExportPage, ExportError>;
}

/// Exporters keyed by route segment
#[derive(Clone, Default)]
pub struct ExporterRegistry {
    exporters: IndexMap<String, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four standard exporters wired to the host
    pub fn standard(host: &HostServices, config: &ExportConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PostExporter::new(
            host.clone(),
            config.page_sizes.posts,
            config.meta_fields.clone(),
        )));
        registry.register(Arc::new(UserExporter::new(host.clone(), config.page_sizes.users)));
        registry.register(Arc::new(CommentExporter::new(
            host.clone(),
            config.page_sizes.comments,
        )));
        registry.register(Arc::new(MediaExporter::new(host.clone(), config.page_sizes.media)));
        registry
    }

    /// Register an exporter, replacing any exporter on the same route
    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        self.exporters.insert(exporter.route().to_string(), exporter);
    }

    pub fn get(&self, route: &str) -> Option<&Arc<dyn Exporter>> {
        self.exporters.get(route)
    }

    /// Registered routes, in registration order
    pub fn routes(&self) -> Vec<&str> {
        self.exporters.keys().map(|s| s.as_str()).collect()
    }
}
