//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static facts about the host site, surfaced by the index descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Canonical site URL
    pub url: String,

    /// Host software version
    pub version: String,

    /// Character set of the site
    pub charset: String,

    pub pingback_url: String,
    pub rss_url: String,
    pub rss2_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        let url = "http://localhost".to_string();
        Self {
            pingback_url: format!("{}/xmlrpc.php", url),
            rss_url: format!("{}/feed/rss/", url),
            rss2_url: format!("{}/feed/", url),
            url,
            version: "6.5".to_string(),
            charset: "UTF-8".to_string(),
        }
    }
}

/// Page size per entity kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub posts: usize,
    pub users: usize,
    pub comments: usize,
    pub media: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            posts: 10,
            users: 50,
            comments: 50,
            media: 50,
        }
    }
}

/// One metadata source consulted for a logical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaSource {
    /// Plugin the key belongs to (informational, used in logs)
    pub plugin: String,

    /// Meta key to look up on the post
    pub key: String,

    /// Optional sub-key inside a structured meta value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl MetaSource {
    fn new(plugin: &str, key: &str) -> Self {
        Self {
            plugin: plugin.to_string(),
            key: key.to_string(),
            path: None,
        }
    }

    fn nested(plugin: &str, key: &str, path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Self::new(plugin, key)
        }
    }
}

/// A logical record field and its ranked sources
///
/// Sources are consulted in order and the first non-empty value wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaField {
    pub field: String,
    pub sources: Vec<MetaSource>,
}

/// Default priority table for the SEO-adjacent post fields
pub fn default_meta_fields() -> Vec<MetaField> {
    vec![
        MetaField {
            field: "keyword".to_string(),
            sources: vec![
                MetaSource::nested("bananacontent", "banana_content", "keyword"),
                MetaSource::new("yoast", "_yoast_wpseo_focuskw"),
            ],
        },
        MetaField {
            field: "meta_title".to_string(),
            sources: vec![
                MetaSource::new("yoast", "_yoast_wpseo_title"),
                MetaSource::new("all-in-one-seo", "_aioseop_title"),
                MetaSource::new("wpseo", "_wpseo_edit_title"),
            ],
        },
        MetaField {
            field: "meta_description".to_string(),
            sources: vec![
                MetaSource::new("yoast", "_yoast_wpseo_metadesc"),
                MetaSource::new("all-in-one-seo", "_aioseop_description"),
                MetaSource::new("wpseo", "_wpseo_edit_description"),
            ],
        },
        MetaField {
            field: "social_image_url".to_string(),
            sources: vec![MetaSource::new("yoast", "_yoast_wpseo_opengraph-image")],
        },
    ]
}

fn default_api_path() -> String {
    "chimp-api".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Complete configuration for the export API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Path segment the API is mounted under
    pub api_path: String,

    /// Address the server binds to
    pub bind: String,

    /// JSON file backing the settings store; in-memory when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,

    pub site: SiteInfo,
    pub page_sizes: PageSizes,

    /// Ranked metadata sources for the optional post fields
    pub meta_fields: Vec<MetaField>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            api_path: default_api_path(),
            bind: default_bind(),
            settings_path: None,
            site: SiteInfo::default(),
            page_sizes: PageSizes::default(),
            meta_fields: default_meta_fields(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the dispatcher cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("page_sizes.posts", self.page_sizes.posts),
            ("page_sizes.users", self.page_sizes.users),
            ("page_sizes.comments", self.page_sizes.comments),
            ("page_sizes.media", self.page_sizes.media),
        ];
        if let Some((field, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "page size must be at least 1".to_string(),
            });
        }
        if self.api_path.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Mount segment without surrounding slashes
    pub fn api_segment(&self) -> &str {
        self.api_path.trim_matches('/')
    }

    /// Public URL of the API root
    pub fn self_url(&self) -> String {
        format!(
            "{}/{}/",
            self.site.url.trim_end_matches('/'),
            self.api_segment()
        )
    }
}
