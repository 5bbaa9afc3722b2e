//! Catalog fetcher and search.
//!
//! `fetch_all` never errors: it exhausts a fallback chain (fresh cache,
//! backend table, remote endpoint, stale cache, compiled-in constant) and
//! always hands back a usable array. Overlapping calls may both reach the
//! remote tier; the cache slot is last-write-wins and that is accepted.

use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::{CatalogEntry, NormalizedEntry};
use crate::settings::Settings;
use crate::store::StorageBackend;

use super::{fallback_entries, CatalogCache};

/// Search results are capped to keep autocomplete payloads small.
const SEARCH_RESULT_LIMIT: usize = 20;

/// Catalog access for every other layer. Owns the cache explicitly; there
/// is no module-level state.
pub struct CatalogService {
    cache: CatalogCache,
    backend: Arc<dyn StorageBackend>,
    settings: Settings,
    http: reqwest::Client,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn StorageBackend>, settings: Settings) -> Self {
        Self {
            cache: CatalogCache::new(),
            backend,
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// Resolve the full catalog. Never fails; the worst case is the
    /// compiled-in fallback dataset.
    pub async fn fetch_all(&self) -> Vec<CatalogEntry> {
        // Tier 1: fresh cache
        let (cached, fresh) = self.cache.get();
        if fresh {
            if let Some(entries) = cached {
                tracing::debug!("Using {} cached catalog entries", entries.len());
                return entries;
            }
        }

        // Tier 2: persistent store
        match self.backend.catalog_load().await {
            Ok(entries) if !entries.is_empty() => {
                let valid: Vec<CatalogEntry> =
                    entries.into_iter().filter(|e| !e.name.is_empty()).collect();
                if !valid.is_empty() {
                    tracing::info!("Loaded {} catalog entries from {}", valid.len(), self.backend.name());
                    self.cache.put(valid.clone());
                    return valid;
                }
            }
            Ok(_) => tracing::debug!("Backend catalog table is empty"),
            Err(err) => tracing::warn!("Catalog load from backend failed: {}", err),
        }

        // Tier 3: remote endpoint
        match self.fetch_remote().await {
            Ok(Some(valid)) => {
                tracing::info!("Fetched {} valid catalog entries from remote", valid.len());
                self.cache.put(valid.clone());

                // Best-effort write-back. A failure here only costs the
                // next cold start a refetch.
                let backend = Arc::clone(&self.backend);
                let entries = valid.clone();
                tokio::spawn(async move {
                    if let Err(err) = backend.catalog_save(&entries).await {
                        tracing::warn!("Catalog write-back to {} failed: {}", backend.name(), err);
                    }
                });

                return valid;
            }
            Ok(None) => {
                tracing::warn!("Remote catalog returned a non-array body, using fallback dataset");
                return fallback_entries();
            }
            Err(err) => tracing::warn!("Remote catalog fetch failed: {}", err),
        }

        // Tier 4: stale cache beats nothing
        if let Some(entries) = cached {
            if !entries.is_empty() {
                tracing::info!("Using {} expired cached catalog entries", entries.len());
                return entries;
            }
        }

        // Tier 5: compiled-in constant
        fallback_entries()
    }

    /// Fetch and validate the remote dataset. `Ok(None)` means the body was
    /// not an array; malformed elements are filtered individually.
    async fn fetch_remote(&self) -> Result<Option<Vec<CatalogEntry>>, AppError> {
        let url = self.settings.catalog_api_url().await;
        tracing::debug!("Fetching catalog from {}", url);

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: serde_json::Value = response.json().await?;

        let Some(raw) = body.as_array() else {
            return Ok(None);
        };

        let valid: Vec<CatalogEntry> = raw
            .iter()
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect();

        Ok(Some(valid))
    }

    /// Case-insensitive substring search over name, weapon and pattern.
    /// Results are normalized for display and capped at 20, in encounter
    /// order. Empty queries return nothing without touching the catalog.
    pub async fn search(&self, query: &str) -> Vec<NormalizedEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.fetch_all()
            .await
            .iter()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&query)
                    || entry.weapon_name().to_lowercase().contains(&query)
                    || entry
                        .pattern_name()
                        .is_some_and(|p| p.to_lowercase().contains(&query))
            })
            .take(SEARCH_RESULT_LIMIT)
            .map(CatalogEntry::normalize)
            .collect()
    }

    /// Three-stage name lookup: exact name, name substring, then weapon
    /// exact-or-substring. None when nothing matches.
    pub async fn find_by_name(&self, name: &str) -> Option<CatalogEntry> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let entries = self.fetch_all().await;

        entries
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
            .or_else(|| entries.iter().find(|e| e.name.to_lowercase().contains(&needle)))
            .or_else(|| {
                entries.iter().find(|e| {
                    let weapon = e.weapon_name().to_lowercase();
                    weapon == needle || weapon.contains(&needle)
                })
            })
            .cloned()
    }

    /// Full catalog dump for the export endpoint: date-stamped filename
    /// plus pretty-printed JSON body.
    pub async fn export(&self) -> (String, String) {
        let entries = self.fetch_all().await;
        let filename = format!("cs2_skins_database_{}.json", Utc::now().format("%Y-%m-%d"));
        let body = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
        (filename, body)
    }
}
