//! Comments exporter
//!
//! Counting and paging are two separate host calls: the total reported in
//! the pagination envelope always covers every comment, whatever page was
//! asked for.

use super::{ExportPage, Exporter, Page};
use crate::core::error::ExportError;
use crate::core::host::{HostComment, HostServices};
use crate::core::query::{PaginationMeta, page_offset};
use crate::core::record::CommentRecord;
use anyhow::Result;
use async_trait::async_trait;

const ENTITY: &str = "comments";

pub struct CommentExporter {
    host: HostServices,
    per_page: usize,
}

impl CommentExporter {
    pub fn new(host: HostServices, per_page: usize) -> Self {
        Self { host, per_page }
    }

    pub async fn page(&self, page: usize) -> Result<Page<CommentRecord>, ExportError> {
        self.build_page(page)
            .await
            .map_err(|e| ExportError::upstream(ENTITY, e))
    }

    async fn build_page(&self, page: usize) -> Result<Page<CommentRecord>> {
        let total = self.host.comments.count_all().await?;
        let pagination = PaginationMeta::new(total, self.per_page);

        let offset = page_offset(page, self.per_page);
        let comments = self.host.comments.list(offset, self.per_page).await?;

        Ok(Page {
            records: comments.into_iter().map(record).collect(),
            pagination,
        })
    }
}

fn record(comment: HostComment) -> CommentRecord {
    CommentRecord {
        id: comment.id,
        post_id: comment.post_id,
        author_name: comment.author_name,
        author_email: comment.author_email,
        author_url: comment.author_url,
        date: comment.date,
        content: comment.content,
        agent: comment.agent,
        comment_type: comment.comment_type,
        parent: comment.parent,
        user_id: (comment.user_id != 0).then_some(comment.user_id),
        approved: comment.approved,
    }
}

#[async_trait]
impl Exporter for CommentExporter {
    fn route(&self) -> &str {
        ENTITY
    }

    async fn export(&self, page: usize) -> Result<ExportPage, ExportError> {
        self.page(page).await?.into_json(ENTITY)
    }
}
