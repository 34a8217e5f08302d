//! Author record resolution shared by the post, media and user exporters

use crate::core::host::{HostUser, MetaStore, UserDirectory};
use crate::core::meta::is_empty_str;
use crate::core::record::AuthorRecord;
use anyhow::Result;
use std::sync::Arc;

/// User meta keys copied onto author records when non-empty
pub const SOCIAL_PROFILE_KEYS: [&str; 3] = ["facebook", "twitter", "googleplus"];

/// Builds [`AuthorRecord`]s from user accounts and their profile meta
#[derive(Clone)]
pub struct AuthorResolver {
    users: Arc<dyn UserDirectory>,
    meta: Arc<dyn MetaStore>,
}

impl AuthorResolver {
    pub fn new(users: Arc<dyn UserDirectory>, meta: Arc<dyn MetaStore>) -> Self {
        Self { users, meta }
    }

    /// Resolve a user id, `None` when the account no longer exists
    pub async fn resolve(&self, user_id: u64) -> Result<Option<AuthorRecord>> {
        match self.users.user(user_id).await? {
            Some(user) => Ok(Some(self.record(&user).await?)),
            None => Ok(None),
        }
    }

    /// Full record for a known user, social profiles included
    pub async fn record(&self, user: &HostUser) -> Result<AuthorRecord> {
        let mut record = AuthorRecord::from_user(user);

        for key in SOCIAL_PROFILE_KEYS {
            let value = self
                .meta
                .user_meta(user.id, key)
                .await?
                .filter(|v| !is_empty_str(v));

            match key {
                "facebook" => record.facebook = value,
                "twitter" => record.twitter = value,
                _ => record.googleplus = value,
            }
        }

        Ok(record)
    }
}
