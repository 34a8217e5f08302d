//! Activation, deactivation and upgrade bookkeeping

use crate::core::credential::{Credential, CredentialStore};
use crate::core::error::ExportError;
use crate::core::settings::{SettingsStore, VERSION_OPTION};

/// Version reported by the index descriptor and stored as the version marker
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

fn settings_error(err: anyhow::Error) -> ExportError {
    ExportError::Settings {
        message: err.to_string(),
    }
}

/// Issue a fresh API key, invalidating any previous one
pub fn activate(credentials: &dyn CredentialStore) -> Result<Credential, ExportError> {
    let credential = credentials.rotate().map_err(settings_error)?;
    tracing::info!("export API activated");
    Ok(credential)
}

/// Remove the API key; every route denies access afterwards
pub fn deactivate(credentials: &dyn CredentialStore) -> Result<(), ExportError> {
    credentials.clear().map_err(settings_error)?;
    tracing::info!("export API deactivated");
    Ok(())
}

/// Record the running version, returning whether it changed
pub fn sync_version_marker(settings: &dyn SettingsStore) -> Result<bool, ExportError> {
    let stored = settings.get(VERSION_OPTION).map_err(settings_error)?;
    if stored.as_deref() == Some(PLUGIN_VERSION) {
        return Ok(false);
    }

    settings
        .set(VERSION_OPTION, PLUGIN_VERSION)
        .map_err(settings_error)?;

    tracing::info!(
        from = stored.as_deref().unwrap_or("none"),
        to = PLUGIN_VERSION,
        "version marker updated"
    );
    Ok(true)
}
