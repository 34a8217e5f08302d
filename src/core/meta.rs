//! Ranked metadata resolution
//!
//! Several SEO plugins store the same logical value (focus keyword, meta
//! title, ...) under their own keys. For each logical field the configured
//! sources are consulted in order and the first non-empty value wins. Fields
//! no source can fill are left out entirely.

use crate::config::{MetaField, MetaSource};
use crate::core::host::MetaStore;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Whether a stored string counts as absent: empty or `"0"`
pub fn is_empty_str(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Whether a meta value counts as absent
///
/// Zero, `"0"`, `false` and empty strings or collections are all treated
/// as unset, matching how the host's own templates test meta values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => is_empty_str(s),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

/// Pick the value a source points at out of a raw meta value
fn select(raw: &Value, source: &MetaSource) -> Option<Value> {
    let value = match &source.path {
        Some(path) => raw.as_object()?.get(path)?,
        None => raw,
    };
    (!is_empty_value(value)).then(|| value.clone())
}

/// Resolve every configured field for one post
///
/// Each meta key is fetched at most once even when several fields share it.
pub async fn resolve_fields(
    store: &dyn MetaStore,
    post_id: u64,
    fields: &[MetaField],
) -> Result<IndexMap<String, Value>> {
    let mut fetched: HashMap<&str, Option<Value>> = HashMap::new();
    let mut resolved = IndexMap::new();

    for field in fields {
        for source in &field.sources {
            let key = source.key.as_str();
            if !fetched.contains_key(key) {
                let raw = store.post_meta(post_id, key).await?;
                fetched.insert(key, raw);
            }

            let selected = fetched
                .get(key)
                .and_then(|raw| raw.as_ref())
                .and_then(|raw| select(raw, source));

            if let Some(value) = selected {
                tracing::trace!(post_id, field = %field.field, plugin = %source.plugin, "meta field resolved");
                resolved.insert(field.field.clone(), value);
                break;
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_meta_fields;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Meta store answering from a fixed map and counting lookups
    struct FixedMeta {
        values: HashMap<String, Value>,
        lookups: Mutex<usize>,
    }

    impl FixedMeta {
        fn new(values: Value) -> Self {
            let values = values
                .as_object()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .collect();
            Self {
                values,
                lookups: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl MetaStore for FixedMeta {
        async fn post_meta(&self, _post_id: u64, key: &str) -> Result<Option<Value>> {
            *self.lookups.lock().unwrap() += 1;
            Ok(self.values.get(key).cloned())
        }

        async fn user_meta(&self, _user_id: u64, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_custom_keyword_wins_over_yoast() {
        let store = FixedMeta::new(json!({
            "banana_content": { "keyword": "bananas" },
            "_yoast_wpseo_focuskw": "yoast keyword"
        }));

        let fields = resolve_fields(&store, 1, &default_meta_fields()).await.unwrap();
        assert_eq!(fields["keyword"], "bananas");
    }

    #[tokio::test]
    async fn test_falls_back_when_first_source_empty() {
        let store = FixedMeta::new(json!({
            "banana_content": { "keyword": "" },
            "_yoast_wpseo_focuskw": "yoast keyword",
            "_yoast_wpseo_title": "",
            "_wpseo_edit_title": "wpseo title"
        }));

        let fields = resolve_fields(&store, 1, &default_meta_fields()).await.unwrap();
        assert_eq!(fields["keyword"], "yoast keyword");
        assert_eq!(fields["meta_title"], "wpseo title");
    }

    #[tokio::test]
    async fn test_unresolved_fields_are_omitted() {
        let store = FixedMeta::new(json!({ "_aioseop_description": "desc" }));

        let fields = resolve_fields(&store, 1, &default_meta_fields()).await.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["meta_description"], "desc");
        assert!(!fields.contains_key("social_image_url"));
    }

    #[tokio::test]
    async fn test_nested_source_ignores_plain_strings() {
        let store = FixedMeta::new(json!({ "banana_content": "not a map" }));

        let fields = resolve_fields(&store, 1, &default_meta_fields()).await.unwrap();
        assert!(!fields.contains_key("keyword"));
    }

    #[tokio::test]
    async fn test_each_key_fetched_once() {
        let store = FixedMeta::new(json!({}));
        let field = |name: &str| MetaField {
            field: name.to_string(),
            sources: vec![MetaSource {
                plugin: "shared".to_string(),
                key: "_shared".to_string(),
                path: None,
            }],
        };

        resolve_fields(&store, 1, &[field("a"), field("b")]).await.unwrap();
        assert_eq!(*store.lookups.lock().unwrap(), 1);
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!(false)));
        assert!(is_empty_value(&json!("0")));
        assert!(is_empty_value(&json!(0)));
        assert!(is_empty_value(&json!(0.0)));
        assert!(!is_empty_value(&json!("x")));
        assert!(!is_empty_value(&json!("00")));
        assert!(!is_empty_value(&json!(3)));
    }

    #[tokio::test]
    async fn test_zero_string_falls_through_to_next_source() {
        let store = FixedMeta::new(json!({
            "_yoast_wpseo_title": "0",
            "_aioseop_title": "AIO",
            "banana_content": { "keyword": 0 },
            "_yoast_wpseo_focuskw": "fallback"
        }));

        let fields = resolve_fields(&store, 1, &default_meta_fields()).await.unwrap();
        assert_eq!(fields["meta_title"], "AIO");
        assert_eq!(fields["keyword"], "fallback");
    }
}
