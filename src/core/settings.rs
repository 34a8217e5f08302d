//! Key/value settings store
//!
//! The host persists a handful of named string options (the API key and the
//! plugin version marker). Nothing outside the credential store and the
//! lifecycle helpers should touch these directly.

use anyhow::Result;

/// Option holding the active API key
pub const APIKEY_OPTION: &str = "chimp_apikey";

/// Option holding the version that last ran against this store
pub const VERSION_OPTION: &str = "chimp_plugin_version";

/// Persistent named string options
///
/// Writes are last-writer-wins; a `set` replaces the whole value in one step.
pub trait SettingsStore: Send + Sync {
    /// Read an option, `None` when it was never written or was deleted
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Create or replace an option
    fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Remove an option; removing a missing option is not an error
    fn delete(&self, name: &str) -> Result<()>;
}
