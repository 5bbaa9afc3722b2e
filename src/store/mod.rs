//! Storage backend adapter.
//!
//! Two capability-equivalent backends sit behind one trait: a relational
//! SQLite backend and a JSON-file key-value store. The choice is made once
//! at startup by [`select_backend`] and injected into every consumer; no
//! component re-checks the environment afterwards.

mod local;
mod sqlite;

pub use local::*;
pub use sqlite::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CatalogEntry, CollectionItem, NewInventoryItem};

/// Uniform persistence contract covering the four operation groups:
/// config get/set, catalog load/save, inventory list/add/delete.
///
/// Implementations must be safely constructible without credentials;
/// credential absence is a valid runtime mode, not an error state.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    async fn config_get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn config_set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Load the full catalog table.
    async fn catalog_load(&self) -> Result<Vec<CatalogEntry>, AppError>;

    /// Upsert the given entries by id.
    async fn catalog_save(&self, entries: &[CatalogEntry]) -> Result<(), AppError>;

    /// All items for a user, newest first.
    async fn inventory_list(&self, user_id: &str) -> Result<Vec<CollectionItem>, AppError>;

    /// Append one record; the stored record gets a generated id and a
    /// condition label derived from its wear float.
    async fn inventory_add(
        &self,
        user_id: &str,
        item: NewInventoryItem,
    ) -> Result<CollectionItem, AppError>;

    /// Remove by id. Deleting a non-existent id is not an error.
    async fn inventory_delete(&self, user_id: &str, item_id: &str) -> Result<(), AppError>;
}

/// Decide the active backend once at startup.
///
/// Returns the backend plus the fallback-mode flag. The database is tried
/// only when a path is configured; any failure to open it degrades to the
/// local file store rather than aborting startup.
pub async fn select_backend(config: &Config) -> (Arc<dyn StorageBackend>, bool) {
    if let Some(path) = &config.database_path {
        match SqliteBackend::connect(path).await {
            Ok(backend) => {
                tracing::info!("Using SQLite backend at {:?}", path);
                return (Arc::new(backend), false);
            }
            Err(err) => {
                tracing::warn!(
                    "Database at {:?} unreachable ({}); falling back to local file store",
                    path,
                    err
                );
            }
        }
    } else {
        tracing::warn!(
            "No database configured (SKINVAULT_DATABASE_PATH). Running in local fallback mode"
        );
    }

    (Arc::new(LocalFileBackend::new(&config.data_dir)), true)
}
