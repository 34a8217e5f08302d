//! Normalized records, the flat JSON shapes handed to migration consumers
//!
//! Key names match what existing consumers already parse (`ID`, `type`, ...).

use crate::core::host::{AttachmentMetadata, HostUser, Term, host_datetime};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// User account as embedded in posts and media, and as listed by `/users`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    pub login: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: String,
    pub email: String,
    pub description: String,
    /// Role names joined by `", "`
    pub roles: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub googleplus: Option<String>,
}

impl AuthorRecord {
    /// Base record without social profiles
    pub fn from_user(user: &HostUser) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            description: user.description.clone(),
            roles: user.roles.join(", "),
            facebook: None,
            twitter: None,
            googleplus: None,
        }
    }
}

/// Featured image of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    pub source: Option<String>,
    pub meta: Option<AttachmentMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    pub title: String,
    pub status: String,
    #[serde(rename = "type")]
    pub post_type: String,
    #[serde(with = "host_datetime")]
    pub date: NaiveDateTime,
    #[serde(with = "host_datetime")]
    pub modified: NaiveDateTime,
    pub author: Option<AuthorRecord>,
    pub content: String,
    pub parent: u64,
    pub link: String,
    pub slug: String,
    pub guid: String,
    pub excerpt: String,
    pub comment_status: String,
    pub ping_status: String,
    pub post_image: Option<ImageRecord>,
    pub categories: Vec<Term>,
    pub tags: Vec<Term>,

    /// Fields filled from the metadata priority table, only when resolved
    #[serde(flatten)]
    pub meta: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    pub post_id: u64,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    #[serde(with = "host_datetime")]
    pub date: NaiveDateTime,
    pub content: String,
    pub agent: String,
    #[serde(rename = "type")]
    pub comment_type: String,
    pub parent: u64,
    /// Registered author of the comment, null for visitors
    pub user_id: Option<u64>,
    pub approved: String,
}

/// Attachment record; carries no id of its own
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecord {
    pub title: String,
    #[serde(with = "host_datetime")]
    pub date: NaiveDateTime,
    #[serde(with = "host_datetime")]
    pub modified: NaiveDateTime,
    pub author: Option<AuthorRecord>,
    pub source: Option<String>,
    pub slug: String,
    pub guid: String,
    pub mime_type: String,
    pub meta: Option<AttachmentMetadata>,
}

/// Body of the API root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDescriptor {
    pub url: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub version: String,
    pub charset: String,
    pub pingback_url: String,
    pub rss_url: String,
    pub rss2_url: String,
    pub chimp_plugin_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> HostUser {
        HostUser {
            id: 7,
            login: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            display_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            description: String::new(),
            roles: vec!["editor".to_string(), "author".to_string()],
        }
    }

    #[test]
    fn test_author_roles_are_comma_joined() {
        let author = AuthorRecord::from_user(&user());
        assert_eq!(author.roles, "editor, author");
    }

    #[test]
    fn test_author_omits_missing_social_fields() {
        let mut author = AuthorRecord::from_user(&user());
        author.twitter = Some("@jdoe".to_string());

        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value["ID"], 7);
        assert_eq!(value["twitter"], "@jdoe");
        assert!(value.get("facebook").is_none());
        assert!(value.get("googleplus").is_none());
    }

    #[test]
    fn test_index_descriptor_self_key() {
        let index = IndexDescriptor {
            url: "https://example.com".to_string(),
            self_url: "https://example.com/chimp-api/".to_string(),
            version: "6.5".to_string(),
            charset: "UTF-8".to_string(),
            pingback_url: String::new(),
            rss_url: String::new(),
            rss2_url: String::new(),
            chimp_plugin_version: "1.0.0".to_string(),
        };

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["self"], "https://example.com/chimp-api/");
        assert!(value.get("self_url").is_none());
    }
}
