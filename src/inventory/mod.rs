//! Inventory repository: CRUD over a user's personal collection.
//!
//! Persistence delegates to whichever storage backend is active, with the
//! local file store as a secondary path when the primary fails. An add
//! never terminates in failure once the input validates: the user's data
//! entry is not silently dropped.

use std::sync::Arc;

use chrono::Utc;

use crate::catalog::CatalogService;
use crate::errors::AppError;
use crate::models::{AddItemRequest, CollectionItem, Condition, NewInventoryItem, Provenance};
use crate::store::{LocalFileBackend, StorageBackend};

/// Non-blocking warning attached to a degraded add.
pub const WARN_SAVED_LOCALLY: &str =
    "Item could not be saved to the primary store; it was kept in local storage instead";
pub const WARN_NOT_PERSISTED: &str =
    "Item could not be saved durably; it is returned for this session only";

pub struct Inventory {
    backend: Arc<dyn StorageBackend>,
    local: Arc<LocalFileBackend>,
    catalog: Arc<CatalogService>,
}

impl Inventory {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        local: Arc<LocalFileBackend>,
        catalog: Arc<CatalogService>,
    ) -> Self {
        Self {
            backend,
            local,
            catalog,
        }
    }

    /// Add an item to a user's collection.
    ///
    /// Missing weapon/category/rarity/image values are backfilled from the
    /// catalog by name lookup; the condition label is always derived from
    /// the wear float. The only blocking errors are input validation;
    /// persistence failures degrade (backend, then local store, then an
    /// unpersisted in-memory record) and are reported through the returned
    /// warning instead.
    pub async fn add_item(
        &self,
        user_id: &str,
        request: AddItemRequest,
    ) -> Result<(CollectionItem, Option<&'static str>), AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("Skin name is required".to_string()));
        }
        if let Some(float) = request.float {
            if !(0.0..=1.0).contains(&float) || float.is_nan() {
                return Err(AppError::Validation(
                    "Float value must be between 0 and 1".to_string(),
                ));
            }
        }

        // Catalog lookup enriches whatever the user left blank
        let matched = self.catalog.find_by_name(&request.name).await;

        let item = NewInventoryItem {
            name: request.name,
            weapon: request
                .weapon
                .filter(|w| !w.trim().is_empty())
                .or_else(|| matched.as_ref().map(|m| m.weapon_name().to_string()))
                .unwrap_or_else(|| "Unknown".to_string()),
            category: request
                .category
                .filter(|c| !c.trim().is_empty())
                .or_else(|| matched.as_ref().map(|m| m.category_name().to_string()))
                .unwrap_or_else(|| "Unknown".to_string()),
            rarity: request
                .rarity
                .filter(|r| !r.trim().is_empty())
                .or_else(|| matched.as_ref().map(|m| m.rarity_name().to_string()))
                .unwrap_or_else(|| "Common".to_string()),
            float: request.float,
            stattrak: request.stattrak,
            souvenir: request.souvenir,
            image_url: request
                .image_url
                .filter(|i| !i.trim().is_empty())
                .or_else(|| matched.as_ref().map(|m| m.image_url().to_string()))
                .unwrap_or_else(|| "/placeholder.svg".to_string()),
            purchase_price: request.purchase_price,
            purchase_date: request.purchase_date,
            purchase_location: request.purchase_location,
            expected_sale_price: request.expected_sale_price,
            trade_lock: request.trade_lock,
            trade_lock_end_date: request.trade_lock_end_date,
            comments: request.comments,
        };

        match self.backend.inventory_add(user_id, item.clone()).await {
            Ok(record) => Ok((record, None)),
            Err(err) => {
                tracing::warn!(
                    "Inventory add via {} failed ({}); trying local store",
                    self.backend.name(),
                    err
                );

                match self.local.inventory_add(user_id, item.clone()).await {
                    Ok(record) => Ok((record, Some(WARN_SAVED_LOCALLY))),
                    Err(local_err) => {
                        tracing::error!("Local fallback persist failed: {}", local_err);
                        // Last resort: hand back the record unpersisted
                        Ok((item.into_item(user_id), Some(WARN_NOT_PERSISTED)))
                    }
                }
            }
        }
    }

    /// Remove an item by id. Backend failure falls through to the local
    /// store before reporting overall failure. Idempotent on the happy
    /// path: deleting a missing id succeeds.
    pub async fn remove_item(&self, user_id: &str, item_id: &str) -> bool {
        match self.backend.inventory_delete(user_id, item_id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    "Inventory delete via {} failed ({}); trying local store",
                    self.backend.name(),
                    err
                );
                match self.local.inventory_delete(user_id, item_id).await {
                    Ok(()) => true,
                    Err(local_err) => {
                        tracing::error!("Local fallback delete failed: {}", local_err);
                        false
                    }
                }
            }
        }
    }

    /// All of a user's items, newest first. Read failures degrade to an
    /// empty list rather than an error.
    pub async fn list_items(&self, user_id: &str) -> Vec<CollectionItem> {
        match self.backend.inventory_list(user_id).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!("Inventory list via {} failed: {}", self.backend.name(), err);
                Vec::new()
            }
        }
    }

    /// Read-only mirror of a linked Steam inventory. Demo implementation:
    /// serves the cached mirror if present, otherwise synthesizes a fixed
    /// mock set and caches it keyed by steam id. The cache has no TTL and
    /// is replaced only when `refresh` is set.
    pub async fn fetch_steam_inventory(
        &self,
        user_id: &str,
        steam_id: &str,
        refresh: bool,
    ) -> Vec<CollectionItem> {
        if !refresh {
            match self.local.steam_mirror_load(steam_id).await {
                Ok(Some(items)) => return items,
                Ok(None) => {}
                Err(err) => tracing::warn!("Steam mirror read failed: {}", err),
            }
        }

        let items = mock_steam_items(user_id);
        if let Err(err) = self.local.steam_mirror_save(steam_id, &items).await {
            tracing::warn!("Steam mirror write failed: {}", err);
        }
        items
    }

    /// Personal collection dump for the export endpoint: date-stamped
    /// filename plus pretty-printed JSON body.
    pub async fn export(&self, user_id: &str) -> (String, String) {
        let items = self.list_items(user_id).await;
        let filename = format!("skinvault_inventory_{}.json", Utc::now().format("%Y-%m-%d"));
        let body = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());
        (filename, body)
    }
}

/// Fixed demo dataset standing in for a real Steam inventory call.
fn mock_steam_items(user_id: &str) -> Vec<CollectionItem> {
    let mock = |name: &str, weapon: &str, category: &str, float: f64, stattrak: bool, image: &str| {
        CollectionItem {
            id: format!("steam_{}", uuid::Uuid::new_v4()),
            user_id: user_id.to_string(),
            name: name.to_string(),
            weapon: weapon.to_string(),
            category: category.to_string(),
            rarity: "Covert".to_string(),
            float: Some(float),
            condition: Some(Condition::from_wear(float)),
            stattrak,
            souvenir: false,
            image_url: image.to_string(),
            provenance: Provenance::MirroredExternal,
            created_at: Utc::now().to_rfc3339(),
            purchase_price: None,
            purchase_date: None,
            purchase_location: None,
            expected_sale_price: None,
            trade_lock: None,
            trade_lock_end_date: None,
            comments: None,
        }
    };

    vec![
        mock(
            "AK-47 | Asiimov",
            "AK-47",
            "Rifle",
            0.22,
            true,
            "https://steamcommunity-a.akamaihd.net/economy/image/ak47-asiimov/360fx360f",
        ),
        mock(
            "AWP | Wildfire",
            "AWP",
            "Sniper Rifle",
            0.03,
            false,
            "https://steamcommunity-a.akamaihd.net/economy/image/awp-wildfire/360fx360f",
        ),
        mock(
            "Desert Eagle | Code Red",
            "Desert Eagle",
            "Pistol",
            0.09,
            false,
            "https://steamcommunity-a.akamaihd.net/economy/image/deagle-code-red/360fx360f",
        ),
    ]
}
