//! Settings persisted to a JSON document on disk

use crate::core::settings::SettingsStore;
use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Settings store backed by a flat JSON object
///
/// Every write goes through to disk. The document is written to a sibling
/// temp file first and renamed over the target, so a crash never leaves a
/// half-written file behind.
pub struct JsonFileSettings {
    path: PathBuf,
    options: RwLock<BTreeMap<String, String>>,
}

impl JsonFileSettings {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let options = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse settings {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), options = options.len(), "settings loaded");

        Ok(Self {
            path,
            options: RwLock::new(options),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, options: &BTreeMap<String, String>) -> Result<()> {
        let body = serde_json::to_string_pretty(options)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, body)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
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

        // Memory only changes once the new document is on disk
        let mut updated = options.clone();
        updated.insert(name.to_string(), value.to_string());
        self.persist(&updated)?;
        *options = updated;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !options.contains_key(name) {
            return Ok(());
        }

        let mut updated = options.clone();
        updated.remove(name);
        self.persist(&updated)?;
        *options = updated;
        Ok(())
    }
}
