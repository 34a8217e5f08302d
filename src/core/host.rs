//! Host collaborator traits and host-native record types
//!
//! The export API owns no content. Everything it serves comes from the
//! content host through the traits below; implementations decide how the
//! host is reached (in-process store, database, remote API).

use crate::core::filter::FilterPipeline;
use crate::core::query::HostPage;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Serde adapter for host timestamps (`2024-01-31 18:04:00`)
pub mod host_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A post, page or attachment as stored by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostPost {
    pub id: u64,
    #[serde(default)]
    pub author_id: u64,
    #[serde(default)]
    pub title: String,
    pub status: String,
    pub post_type: String,
    #[serde(with = "host_datetime")]
    pub date: NaiveDateTime,
    #[serde(with = "host_datetime")]
    pub modified: NaiveDateTime,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub comment_status: String,
    #[serde(default)]
    pub ping_status: String,
    #[serde(default)]
    pub mime_type: String,
}

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostComment {
    pub id: u64,
    pub post_id: u64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(with = "host_datetime")]
    pub date: NaiveDateTime,
    #[serde(with = "host_datetime")]
    pub date_gmt: NaiveDateTime,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub comment_type: String,
    #[serde(default)]
    pub parent: u64,
    /// 0 when the comment was left by a visitor without an account
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub approved: String,
}

/// A category or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

/// One generated size of an image attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub file: String,

    /// Absolute URL, filled in by the media exporter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Width, height, mime-type and whatever else the host records
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata the host keeps for an attachment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Size variants keyed by size name, in host order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub sizes: IndexMap<String, ImageSize>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query for a page of posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub status: String,
    pub post_types: Vec<String>,
    pub page: usize,
    pub per_page: usize,
}

/// Paged access to posts and their taxonomy
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// One page of posts matching the query, plus the total match count
    async fn query_posts(&self, query: &PostQuery) -> Result<HostPage<HostPost>>;

    /// Public URL of a post
    async fn permalink(&self, post: &HostPost) -> Result<String>;

    /// Attachment id of the post's featured image
    async fn featured_image_id(&self, post_id: u64) -> Result<Option<u64>>;

    /// Categories of a post, in host order
    async fn categories(&self, post_id: u64) -> Result<Vec<Term>>;

    /// Tags of a post, in host order
    async fn tags(&self, post_id: u64) -> Result<Vec<Term>>;
}

/// Access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up one user, `None` when the account no longer exists
    async fn user(&self, id: u64) -> Result<Option<HostUser>>;

    /// One page of users plus the total user count
    async fn query_users(&self, page: usize, per_page: usize) -> Result<HostPage<HostUser>>;
}

/// Access to comments
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Number of comments with no filtering applied
    async fn count_all(&self) -> Result<usize>;

    /// Comments ordered by GMT creation time ascending, offset-paginated
    async fn list(&self, offset: usize, number: usize) -> Result<Vec<HostComment>>;
}

/// Arbitrary per-post and per-user metadata
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Single meta value of a post; structured values come back as JSON
    async fn post_meta(&self, post_id: u64, key: &str) -> Result<Option<Value>>;

    /// Single meta value of a user
    async fn user_meta(&self, user_id: u64, key: &str) -> Result<Option<String>>;
}

/// Attachment metadata and URL resolution
#[async_trait]
pub trait AttachmentResolver: Send + Sync {
    async fn metadata(&self, attachment_id: u64) -> Result<Option<AttachmentMetadata>>;

    /// Public URL of the attachment's original file
    async fn url(&self, attachment_id: u64) -> Result<Option<String>>;
}

/// Every collaborator the exporters need, bundled
#[derive(Clone)]
pub struct HostServices {
    pub content: Arc<dyn ContentSource>,
    pub users: Arc<dyn UserDirectory>,
    pub comments: Arc<dyn CommentSource>,
    pub meta: Arc<dyn MetaStore>,
    pub attachments: Arc<dyn AttachmentResolver>,
    pub filters: FilterPipeline,
}

impl HostServices {
    /// Use one host object for every collaborator
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: ContentSource + UserDirectory + CommentSource + MetaStore + AttachmentResolver + 'static,
    {
        Self {
            content: host.clone(),
            users: host.clone(),
            comments: host.clone(),
            meta: host.clone(),
            attachments: host,
            filters: FilterPipeline::new(),
        }
    }

    /// Replace the content-filtering pipeline
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }
}
