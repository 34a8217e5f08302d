//! In-memory host and settings implementations for testing and development

use crate::core::host::{
    AttachmentMetadata, AttachmentResolver, CommentSource, ContentSource, HostComment, HostPost,
    HostUser, MetaStore, PostQuery, Term, UserDirectory,
};
use crate::core::query::HostPage;
use crate::core::settings::SettingsStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// =============================================================================
// Host
// =============================================================================

#[derive(Default)]
struct HostData {
    posts: BTreeMap<u64, HostPost>,
    users: BTreeMap<u64, HostUser>,
    comments: Vec<HostComment>,
    post_meta: HashMap<(u64, String), Value>,
    user_meta: HashMap<(u64, String), String>,
    featured_images: HashMap<u64, u64>,
    attachment_urls: HashMap<u64, String>,
    attachment_meta: HashMap<u64, AttachmentMetadata>,
    categories: HashMap<u64, Vec<Term>>,
    tags: HashMap<u64, Vec<Term>>,
}

/// Content host held entirely in memory
///
/// Mirrors the host's default orderings: posts newest first, users by
/// login, comments by GMT date ascending. Uses RwLock for thread-safe access.
pub struct InMemoryHost {
    site_url: String,
    data: RwLock<HostData>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            site_url: "http://localhost".to_string(),
            data: RwLock::new(HostData::default()),
        }
    }

    /// Base URL used to build permalinks
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HostData>> {
        self.data
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    // Seeding never fails; a poisoned lock still holds consistent maps
    fn write(&self) -> RwLockWriteGuard<'_, HostData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_post(&self, post: HostPost) {
        self.write().posts.insert(post.id, post);
    }

    pub fn add_user(&self, user: HostUser) {
        self.write().users.insert(user.id, user);
    }

    pub fn add_comment(&self, comment: HostComment) {
        self.write().comments.push(comment);
    }

    pub fn set_post_meta(&self, post_id: u64, key: &str, value: Value) {
        self.write().post_meta.insert((post_id, key.to_string()), value);
    }

    pub fn set_user_meta(&self, user_id: u64, key: &str, value: &str) {
        self.write()
            .user_meta
            .insert((user_id, key.to_string()), value.to_string());
    }

    pub fn set_featured_image(&self, post_id: u64, attachment_id: u64) {
        self.write().featured_images.insert(post_id, attachment_id);
    }

    pub fn set_attachment(&self, attachment_id: u64, url: &str, metadata: AttachmentMetadata) {
        let mut data = self.write();
        data.attachment_urls.insert(attachment_id, url.to_string());
        data.attachment_meta.insert(attachment_id, metadata);
    }

    pub fn set_categories(&self, post_id: u64, terms: Vec<Term>) {
        self.write().categories.insert(post_id, terms);
    }

    pub fn set_tags(&self, post_id: u64, terms: Vec<Term>) {
        self.write().tags.insert(post_id, terms);
    }

    /// Build a host from a snapshot document
    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let host = Self::new().with_site_url(snapshot.site_url);

        for user in snapshot.users {
            for (key, value) in &user.meta {
                host.set_user_meta(user.user.id, key, value);
            }
            host.add_user(user.user);
        }

        for entry in snapshot.posts {
            let id = entry.post.id;
            for (key, value) in entry.meta {
                host.set_post_meta(id, &key, value);
            }
            if let Some(image_id) = entry.featured_image {
                host.set_featured_image(id, image_id);
            }
            if let Some(file) = entry.attachment {
                host.set_attachment(id, &file.url, file.metadata);
            }
            host.set_categories(id, entry.categories);
            host.set_tags(id, entry.tags);
            host.add_post(entry.post);
        }

        for comment in snapshot.comments {
            host.add_comment(comment);
        }

        host
    }

    /// Load a snapshot from a JSON file
    pub fn from_json_file(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let snapshot: HostSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path))?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable dump of a host's content
#[derive(Debug, Clone, Deserialize)]
pub struct HostSnapshot {
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default)]
    pub users: Vec<SnapshotUser>,
    #[serde(default)]
    pub posts: Vec<SnapshotPost>,
    #[serde(default)]
    pub comments: Vec<HostComment>,
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotUser {
    #[serde(flatten)]
    pub user: HostUser,
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotPost {
    #[serde(flatten)]
    pub post: HostPost,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub categories: Vec<Term>,
    #[serde(default)]
    pub tags: Vec<Term>,
    #[serde(default)]
    pub featured_image: Option<u64>,
    /// File details when the entry is itself an attachment
    #[serde(default)]
    pub attachment: Option<SnapshotAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotAttachment {
    pub url: String,
    #[serde(default)]
    pub metadata: AttachmentMetadata,
}

#[async_trait]
impl ContentSource for InMemoryHost {
    async fn query_posts(&self, query: &PostQuery) -> Result<HostPage<HostPost>> {
        let data = self.read()?;

        let mut matching: Vec<HostPost> = data
            .posts
            .values()
            .filter(|post| {
                post.status == query.status && query.post_types.contains(&post.post_type)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(HostPage::slice(matching, query.page, query.per_page))
    }

    async fn permalink(&self, post: &HostPost) -> Result<String> {
        if post.slug.is_empty() {
            Ok(format!("{}/?p={}", self.site_url, post.id))
        } else {
            Ok(format!("{}/{}/", self.site_url, post.slug))
        }
    }

    async fn featured_image_id(&self, post_id: u64) -> Result<Option<u64>> {
        Ok(self.read()?.featured_images.get(&post_id).copied())
    }

    async fn categories(&self, post_id: u64) -> Result<Vec<Term>> {
        Ok(self.read()?.categories.get(&post_id).cloned().unwrap_or_default())
    }

    async fn tags(&self, post_id: u64) -> Result<Vec<Term>> {
        Ok(self.read()?.tags.get(&post_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl UserDirectory for InMemoryHost {
    async fn user(&self, id: u64) -> Result<Option<HostUser>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn query_users(&self, page: usize, per_page: usize) -> Result<HostPage<HostUser>> {
        let mut users: Vec<HostUser> = self.read()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.login.cmp(&b.login).then(a.id.cmp(&b.id)));
        Ok(HostPage::slice(users, page, per_page))
    }
}

#[async_trait]
impl CommentSource for InMemoryHost {
    async fn count_all(&self) -> Result<usize> {
        Ok(self.read()?.comments.len())
    }

    async fn list(&self, offset: usize, number: usize) -> Result<Vec<HostComment>> {
        let mut comments = self.read()?.comments.clone();
        comments.sort_by(|a, b| a.date_gmt.cmp(&b.date_gmt).then(a.id.cmp(&b.id)));
        Ok(comments.into_iter().skip(offset).take(number).collect())
    }
}

#[async_trait]
impl MetaStore for InMemoryHost {
    async fn post_meta(&self, post_id: u64, key: &str) -> Result<Option<Value>> {
        Ok(self
            .read()?
            .post_meta
            .get(&(post_id, key.to_string()))
            .cloned())
    }

    async fn user_meta(&self, user_id: u64, key: &str) -> Result<Option<String>> {
        Ok(self
            .read()?
            .user_meta
            .get(&(user_id, key.to_string()))
            .cloned())
    }
}

#[async_trait]
impl AttachmentResolver for InMemoryHost {
    async fn metadata(&self, attachment_id: u64) -> Result<Option<AttachmentMetadata>> {
        Ok(self.read()?.attachment_meta.get(&attachment_id).cloned())
    }

    async fn url(&self, attachment_id: u64) -> Result<Option<String>> {
        Ok(self.read()?.attachment_urls.get(&attachment_id).cloned())
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Settings store that forgets everything on restart
#[derive(Default)]
pub struct InMemorySettings {
    options: RwLock<HashMap<String, String>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettings {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let options = self
            .options
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(options.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        options.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        options.remove(name);
        Ok(())
    }
}
