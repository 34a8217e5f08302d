//! Shared-secret credential gating every data route

use crate::core::settings::{APIKEY_OPTION, SettingsStore};
use anyhow::{Result, anyhow};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;
use std::sync::{Arc, Mutex};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";
const GROUP_LEN: usize = 7;
const GROUPS: usize = 4;
const SEPARATOR: char = '-';

/// An opaque API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison against a presented key
    pub fn matches(&self, presented: &str) -> bool {
        !presented.is_empty() && self.0 == presented
    }
}

// Keys end up in logs through Debug on containing structs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a fresh key: four groups of seven distinct alphanumerics
pub fn generate_credential() -> Credential {
    generate_credential_with(&mut rand::thread_rng())
}

/// Generate a key from the given random source
pub fn generate_credential_with<R: Rng + ?Sized>(rng: &mut R) -> Credential {
    let chars: Vec<char> = ALPHABET
        .choose_multiple(rng, GROUP_LEN * GROUPS)
        .map(|&b| b as char)
        .collect();

    let token = chars
        .chunks(GROUP_LEN)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string());

    Credential(token)
}

/// Store holding exactly one active credential
pub trait CredentialStore: Send + Sync {
    /// The active credential, if any
    fn current(&self) -> Result<Option<Credential>>;

    /// Replace the active credential with a freshly generated one
    fn rotate(&self) -> Result<Credential>;

    /// Remove the active credential
    fn clear(&self) -> Result<()>;

    /// Check a presented key against the active credential
    ///
    /// Denies when nothing was presented or no credential is active.
    fn verify(&self, presented: Option<&str>) -> Result<bool> {
        let Some(presented) = presented else {
            return Ok(false);
        };
        Ok(self
            .current()?
            .is_some_and(|credential| credential.matches(presented)))
    }
}

/// Credential store backed by the `chimp_apikey` settings option
pub struct SettingsCredentialStore {
    settings: Arc<dyn SettingsStore>,
    rotation: Mutex<()>,
}

impl SettingsCredentialStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            rotation: Mutex::new(()),
        }
    }
}

impl CredentialStore for SettingsCredentialStore {
    fn current(&self) -> Result<Option<Credential>> {
        Ok(self
            .settings
            .get(APIKEY_OPTION)?
            .filter(|value| !value.is_empty())
            .map(Credential))
    }

    fn rotate(&self) -> Result<Credential> {
        let _guard = self
            .rotation
            .lock()
            .map_err(|e| anyhow!("Failed to acquire rotation lock: {}", e))?;

        let credential = generate_credential();
        self.settings.set(APIKEY_OPTION, credential.as_str())?;

        tracing::info!("API key rotated");
        Ok(credential)
    }

    fn clear(&self) -> Result<()> {
        self.settings.delete(APIKEY_OPTION)
    }
}
