//! # Chimp Export API
//!
//! A read-only HTTP API that pages the content of a content host (posts,
//! pages, users, comments and media) out as flat JSON records, for
//! migrating a site into another system.
//!
//! ## Features
//!
//! - **Single shared key**: every route, the index included, is gated by one API key
//! - **Fixed page sizes**: pagination totals travel in `X-Chimp-Count` / `X-Chimp-Pages`
//! - **Pluggable host**: content, users, comments, metadata and attachments come
//!   from async collaborator traits
//! - **Data-driven SEO merge**: ranked metadata sources per post field, configured in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chimp::prelude::*;
//!
//! let host = InMemoryHost::from_json_file("demos/site.json")?;
//! let settings = Arc::new(InMemorySettings::new());
//! let credentials = SettingsCredentialStore::new(settings.clone());
//! let key = activate(&credentials)?;
//!
//! ServerBuilder::new()
//!     .with_config(ExportConfig::from_yaml_file("demos/chimp.yaml")?)
//!     .with_host(HostServices::from_host(Arc::new(host)))
//!     .with_settings(settings)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod exporters;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Configuration ===
    pub use crate::config::{ExportConfig, MetaField, MetaSource, PageSizes, SiteInfo};

    // === Core ===
    pub use crate::core::{
        AttachmentMetadata, AttachmentResolver, CommentSource, ConfigError, ContentFilter,
        ContentSource, Credential, CredentialStore, ExportError, ExportParams, FilterHook,
        FilterPipeline, HostComment, HostPost, HostServices, HostUser, MetaStore,
        PaginationMeta, SettingsCredentialStore, SettingsStore, Term, UserDirectory,
    };

    // === Exporters ===
    pub use crate::exporters::{
        CommentExporter, ExportPage, Exporter, ExporterRegistry, MediaExporter, PostExporter,
        UserExporter,
    };

    // === Server ===
    pub use crate::server::{
        ExportHost, ServerBuilder, activate, deactivate, sync_version_marker,
    };

    // === Storage ===
    pub use crate::storage::{HostSnapshot, InMemoryHost, InMemorySettings, JsonFileSettings};

    // === Re-exports from external crates ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
