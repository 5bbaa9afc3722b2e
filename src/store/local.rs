//! Local file storage backend.
//!
//! A JSON-file key-value store with localStorage-style namespaced keys, one
//! file per key under the data directory. It serves two roles: the full
//! fallback backend when no database is configured, and a resilience layer
//! under the database for the inventory add/delete paths.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{CatalogEntry, CollectionItem, NewInventoryItem};

use super::StorageBackend;

const CONFIG_KEY: &str = "skinvault_config";
const CATALOG_KEY: &str = "skinvault_catalog";
const LOCAL_ITEMS_KEY: &str = "skinvault_local_skins";
const STEAM_ITEMS_KEY: &str = "skinvault_steam_skins";

/// File-backed implementation of [`StorageBackend`].
#[derive(Debug, Clone)]
pub struct LocalFileBackend {
    root: PathBuf,
}

impl LocalFileBackend {
    /// Construct the store rooted under `data_dir`. Never fails; the
    /// directory is created lazily on first write.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join("local_store"),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys embed user ids; keep filenames tame
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
            .collect();
        self.root.join(format!("{}.json", safe))
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.path_for(key), bytes).await?;
        Ok(())
    }

    /// Cached mirror of a linked Steam inventory, keyed by steam id.
    /// No TTL; the mirror is replaced only by an explicit refresh.
    pub async fn steam_mirror_load(
        &self,
        steam_id: &str,
    ) -> Result<Option<Vec<CollectionItem>>, AppError> {
        self.read(&format!("{}_{}", STEAM_ITEMS_KEY, steam_id)).await
    }

    pub async fn steam_mirror_save(
        &self,
        steam_id: &str,
        items: &[CollectionItem],
    ) -> Result<(), AppError> {
        self.write(&format!("{}_{}", STEAM_ITEMS_KEY, steam_id), &items)
            .await
    }
}

#[async_trait]
impl StorageBackend for LocalFileBackend {
    fn name(&self) -> &'static str {
        "local-file"
    }

    async fn config_get(&self, key: &str) -> Result<Option<String>, AppError> {
        let map: Option<std::collections::HashMap<String, String>> =
            self.read(CONFIG_KEY).await?;
        Ok(map.and_then(|m| m.get(key).cloned()))
    }

    async fn config_set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut map: std::collections::HashMap<String, String> =
            self.read(CONFIG_KEY).await?.unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write(CONFIG_KEY, &map).await
    }

    async fn catalog_load(&self) -> Result<Vec<CatalogEntry>, AppError> {
        Ok(self.read(CATALOG_KEY).await?.unwrap_or_default())
    }

    async fn catalog_save(&self, entries: &[CatalogEntry]) -> Result<(), AppError> {
        let mut existing: Vec<CatalogEntry> = self.read(CATALOG_KEY).await?.unwrap_or_default();

        // Upsert by id to match the relational backend's semantics
        for entry in entries {
            match existing.iter_mut().find(|e| e.id == entry.id) {
                Some(slot) => *slot = entry.clone(),
                None => existing.push(entry.clone()),
            }
        }

        self.write(CATALOG_KEY, &existing).await
    }

    async fn inventory_list(&self, user_id: &str) -> Result<Vec<CollectionItem>, AppError> {
        let mut items: Vec<CollectionItem> = self
            .read(&format!("{}_{}", LOCAL_ITEMS_KEY, user_id))
            .await?
            .unwrap_or_default();

        // RFC 3339 timestamps sort lexicographically; newest first
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn inventory_add(
        &self,
        user_id: &str,
        item: NewInventoryItem,
    ) -> Result<CollectionItem, AppError> {
        let key = format!("{}_{}", LOCAL_ITEMS_KEY, user_id);
        let mut items: Vec<CollectionItem> = self.read(&key).await?.unwrap_or_default();

        let record = item.into_item(user_id);
        items.push(record.clone());
        self.write(&key, &items).await?;

        Ok(record)
    }

    async fn inventory_delete(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        let key = format!("{}_{}", LOCAL_ITEMS_KEY, user_id);
        let mut items: Vec<CollectionItem> = self.read(&key).await?.unwrap_or_default();

        // Idempotent: removing a missing id leaves the list unchanged
        items.retain(|item| item.id != item_id);
        self.write(&key, &items).await
    }
}
