//! Posts exporter: published posts and pages

use super::{AuthorResolver, ExportPage, Exporter, Page};
use crate::config::MetaField;
use crate::core::error::ExportError;
use crate::core::filter::FilterHook;
use crate::core::host::{HostPost, HostServices, PostQuery};
use crate::core::meta::resolve_fields;
use crate::core::query::PaginationMeta;
use crate::core::record::{ImageRecord, PostRecord};
use anyhow::Result;
use async_trait::async_trait;

const ENTITY: &str = "posts";

/// Status a post must have to be exported
pub const PUBLISHED: &str = "publish";

/// Post types included in the export
pub const POST_TYPES: [&str; 2] = ["post", "page"];

pub struct PostExporter {
    host: HostServices,
    authors: AuthorResolver,
    per_page: usize,
    meta_fields: Vec<MetaField>,
}

impl PostExporter {
    pub fn new(host: HostServices, per_page: usize, meta_fields: Vec<MetaField>) -> Self {
        let authors = AuthorResolver::new(host.users.clone(), host.meta.clone());
        Self {
            host,
            authors,
            per_page,
            meta_fields,
        }
    }

    /// Export one page of published posts
    pub async fn page(&self, page: usize) -> Result<Page<PostRecord>, ExportError> {
        self.build_page(page)
            .await
            .map_err(|e| ExportError::upstream(ENTITY, e))
    }

    async fn build_page(&self, page: usize) -> Result<Page<PostRecord>> {
        let query = PostQuery {
            status: PUBLISHED.to_string(),
            post_types: POST_TYPES.iter().map(|t| t.to_string()).collect(),
            page,
            per_page: self.per_page,
        };

        let found = self.host.content.query_posts(&query).await?;
        let pagination = PaginationMeta::new(found.total, self.per_page);

        let mut records = Vec::with_capacity(found.items.len());
        for post in found.items {
            // The host query is trusted for counts, not for the status filter
            if post.status != PUBLISHED {
                tracing::debug!(post_id = post.id, status = %post.status, "skipping unpublished post");
                continue;
            }
            records.push(self.record(post).await?);
        }

        Ok(Page {
            records,
            pagination,
        })
    }

    async fn record(&self, post: HostPost) -> Result<PostRecord> {
        let content = &self.host.content;
        let filters = &self.host.filters;

        let author = self.authors.resolve(post.author_id).await?;
        let post_image = self.featured_image(post.id).await?;
        let link = content.permalink(&post).await?;
        let categories = content.categories(post.id).await?;
        let tags = content.tags(post.id).await?;
        let meta = resolve_fields(self.host.meta.as_ref(), post.id, &self.meta_fields).await?;

        Ok(PostRecord {
            id: post.id,
            title: filters.apply(FilterHook::Title, &post.title),
            status: post.status,
            post_type: post.post_type,
            date: post.date,
            modified: post.modified,
            author,
            content: filters.apply(FilterHook::Content, &post.content),
            parent: post.parent,
            link,
            slug: post.slug,
            guid: filters.apply(FilterHook::Guid, &post.guid),
            excerpt: post.excerpt,
            comment_status: post.comment_status,
            ping_status: post.ping_status,
            post_image,
            categories,
            tags,
            meta,
        })
    }

    async fn featured_image(&self, post_id: u64) -> Result<Option<ImageRecord>> {
        let Some(image_id) = self.host.content.featured_image_id(post_id).await? else {
            return Ok(None);
        };

        let attachments = &self.host.attachments;
        Ok(Some(ImageRecord {
            id: image_id,
            source: attachments.url(image_id).await?,
            meta: attachments.metadata(image_id).await?,
        }))
    }
}

#[async_trait]
impl Exporter for PostExporter {
    fn route(&self) -> &str {
        ENTITY
    }

    async fn export(&self, page: usize) -> Result<ExportPage, ExportError> {
        self.page(page).await?.into_json(ENTITY)
    }
}
