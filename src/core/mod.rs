//! Core module containing fundamental traits and types for the export API

pub mod credential;
pub mod error;
pub mod filter;
pub mod host;
pub mod meta;
pub mod query;
pub mod record;
pub mod settings;

pub use credential::{Credential, CredentialStore, SettingsCredentialStore};
pub use error::{ConfigError, ExportError};
pub use filter::{ContentFilter, FilterHook, FilterPipeline};
pub use host::{
    AttachmentMetadata, AttachmentResolver, CommentSource, ContentSource, HostComment, HostPost,
    HostServices, HostUser, ImageSize, MetaStore, PostQuery, Term, UserDirectory,
};
pub use query::{ExportParams, HostPage, PaginationMeta};
pub use settings::SettingsStore;
