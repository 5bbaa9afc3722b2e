//! Settings provider: named configuration values with compiled-in defaults.
//!
//! Every call round-trips to the active storage backend; settings are read
//! rarely (startup and the admin screen), so there is no cache layer.

use std::sync::Arc;

use crate::store::StorageBackend;

/// Known setting: Steam Web API key.
pub const STEAM_API_KEY: &str = "steam_api_key";
/// Known setting: remote skins catalog endpoint URL.
pub const CATALOG_API_URL: &str = "catalog_api_url";

const STEAM_API_KEY_DEFAULT: &str = "2A3C7842A41375B31B81635F6AEB341D";
const CATALOG_API_URL_DEFAULT: &str = "https://bymykel.github.io/CSGO-API/api/en/skins.json";

/// Compiled-in default for a known key, if any.
pub fn default_for(key: &str) -> Option<&'static str> {
    match key {
        STEAM_API_KEY => Some(STEAM_API_KEY_DEFAULT),
        CATALOG_API_URL => Some(CATALOG_API_URL_DEFAULT),
        _ => None,
    }
}

/// Resolves named configuration values against the active backend.
#[derive(Clone)]
pub struct Settings {
    backend: Arc<dyn StorageBackend>,
}

impl Settings {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Look up a value. On any failure or missing row, known keys resolve
    /// to their compiled-in default; unknown keys resolve to None. Never
    /// errors.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.backend.config_get(key).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => default_for(key).map(str::to_string),
            Err(err) => {
                tracing::warn!("Failed to read setting {:?}: {}", key, err);
                default_for(key).map(str::to_string)
            }
        }
    }

    /// Upsert a value. Reports success as a boolean instead of erroring;
    /// the caller surfaces failure through its own channel.
    pub async fn set(&self, key: &str, value: &str) -> bool {
        match self.backend.config_set(key, value).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Failed to write setting {:?}: {}", key, err);
                false
            }
        }
    }

    /// The remote catalog endpoint URL (always resolvable via the default).
    pub async fn catalog_api_url(&self) -> String {
        self.get(CATALOG_API_URL)
            .await
            .unwrap_or_else(|| CATALOG_API_URL_DEFAULT.to_string())
    }
}
