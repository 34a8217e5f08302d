//! Media exporter: attachments and their generated image sizes

use super::{AuthorResolver, ExportPage, Exporter, Page};
use crate::core::error::ExportError;
use crate::core::filter::FilterHook;
use crate::core::host::{AttachmentMetadata, HostPost, HostServices, PostQuery};
use crate::core::query::PaginationMeta;
use crate::core::record::MediaRecord;
use anyhow::Result;
use async_trait::async_trait;

const ENTITY: &str = "media";

/// Status the host gives attachments
pub const ATTACHMENT_STATUS: &str = "inherit";

pub const ATTACHMENT_TYPE: &str = "attachment";

/// Directory part of a URL or path, without the trailing slash
pub fn dirname(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((dir, _)) => dir,
        None => ".",
    }
}

/// Give every size variant an absolute URL next to the original file
pub fn attach_size_urls(meta: &mut AttachmentMetadata, source_url: &str) {
    let dir = dirname(source_url);
    for size in meta.sizes.values_mut() {
        size.url = Some(format!("{}/{}", dir, size.file));
    }
}

pub struct MediaExporter {
    host: HostServices,
    authors: AuthorResolver,
    per_page: usize,
}

impl MediaExporter {
    pub fn new(host: HostServices, per_page: usize) -> Self {
        let authors = AuthorResolver::new(host.users.clone(), host.meta.clone());
        Self {
            host,
            authors,
            per_page,
        }
    }

    pub async fn page(&self, page: usize) -> Result<Page<MediaRecord>, ExportError> {
        self.build_page(page)
            .await
            .map_err(|e| ExportError::upstream(ENTITY, e))
    }

    async fn build_page(&self, page: usize) -> Result<Page<MediaRecord>> {
        let query = PostQuery {
            status: ATTACHMENT_STATUS.to_string(),
            post_types: vec![ATTACHMENT_TYPE.to_string()],
            page,
            per_page: self.per_page,
        };

        let found = self.host.content.query_posts(&query).await?;

        let mut records = Vec::with_capacity(found.items.len());
        for attachment in found.items {
            records.push(self.record(attachment).await?);
        }

        Ok(Page {
            records,
            pagination: PaginationMeta::new(found.total, self.per_page),
        })
    }

    async fn record(&self, attachment: HostPost) -> Result<MediaRecord> {
        let attachments = &self.host.attachments;
        let filters = &self.host.filters;

        let source = attachments.url(attachment.id).await?;
        let mut meta = attachments.metadata(attachment.id).await?;
        if let (Some(meta), Some(source)) = (meta.as_mut(), source.as_deref()) {
            attach_size_urls(meta, source);
        }

        Ok(MediaRecord {
            title: filters.apply(FilterHook::Title, &attachment.title),
            date: attachment.date,
            modified: attachment.modified,
            author: self.authors.resolve(attachment.author_id).await?,
            source,
            slug: attachment.slug,
            guid: filters.apply(FilterHook::Guid, &attachment.guid),
            mime_type: attachment.mime_type,
            meta,
        })
    }
}

#[async_trait]
impl Exporter for MediaExporter {
    fn route(&self) -> &str {
        ENTITY
    }

    async fn export(&self, page: usize) -> Result<ExportPage, ExportError> {
        self.page(page).await?.into_json(ENTITY)
    }
}
