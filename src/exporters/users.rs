//! Users exporter

use super::{AuthorResolver, ExportPage, Exporter, Page};
use crate::core::error::ExportError;
use crate::core::host::HostServices;
use crate::core::query::PaginationMeta;
use crate::core::record::AuthorRecord;
use anyhow::Result;
use async_trait::async_trait;

const ENTITY: &str = "users";

pub struct UserExporter {
    host: HostServices,
    authors: AuthorResolver,
    per_page: usize,
}

impl UserExporter {
    pub fn new(host: HostServices, per_page: usize) -> Self {
        let authors = AuthorResolver::new(host.users.clone(), host.meta.clone());
        Self {
            host,
            authors,
            per_page,
        }
    }

    pub async fn page(&self, page: usize) -> Result<Page<AuthorRecord>, ExportError> {
        self.build_page(page)
            .await
            .map_err(|e| ExportError::upstream(ENTITY, e))
    }

    async fn build_page(&self, page: usize) -> Result<Page<AuthorRecord>> {
        let found = self.host.users.query_users(page, self.per_page).await?;

        let mut records = Vec::with_capacity(found.items.len());
        for user in &found.items {
            records.push(self.authors.record(user).await?);
        }

        Ok(Page {
            records,
            pagination: PaginationMeta::new(found.total, self.per_page),
        })
    }
}

#[async_trait]
impl Exporter for UserExporter {
    fn route(&self) -> &str {
        ENTITY
    }

    async fn export(&self, page: usize) -> Result<ExportPage, ExportError> {
        self.page(page).await?.into_json(ENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::HostUser;
    use crate::storage::InMemoryHost;
    use std::sync::Arc;

    fn user(id: u64) -> HostUser {
        HostUser {
            id,
            login: format!("user{:02}", id),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            display_name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            description: String::new(),
            roles: vec!["subscriber".to_string()],
        }
    }

    #[tokio::test]
    async fn test_users_page_with_social_fields() {
        let host = InMemoryHost::new();
        host.add_user(user(1));
        host.add_user(user(2));
        host.set_user_meta(2, "googleplus", "+user2");

        let exporter = UserExporter::new(HostServices::from_host(Arc::new(host)), 50);
        let page = exporter.page(1).await.unwrap();

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].login, "user01");
        assert!(page.records[0].googleplus.is_none());
        assert_eq!(page.records[1].googleplus.as_deref(), Some("+user2"));
        assert_eq!(page.records[1].roles, "subscriber");
    }

    #[tokio::test]
    async fn test_users_total_pages_rounds_up() {
        let host = InMemoryHost::new();
        for id in 1..=51 {
            host.add_user(user(id));
        }

        let exporter = UserExporter::new(HostServices::from_host(Arc::new(host)), 50);
        let second = exporter.page(2).await.unwrap();

        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0].id, 51);
        assert_eq!(second.pagination.total, 51);
        assert_eq!(second.pagination.total_pages, 2);
    }
}
