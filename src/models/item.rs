//! Collection item model: a user-owned (or mirrored) instance of a skin.

use serde::{Deserialize, Serialize};

use super::Condition;

/// Whether an item was entered by hand or synced read-only from Steam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Provenance {
    #[serde(rename = "own-collection")]
    OwnCollection,
    #[serde(rename = "mirrored-external")]
    MirroredExternal,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::OwnCollection => "own-collection",
            Provenance::MirroredExternal => "mirrored-external",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "own-collection" => Some(Provenance::OwnCollection),
            "mirrored-external" => Some(Provenance::MirroredExternal),
            _ => None,
        }
    }
}

/// A skin in a user's collection, with personal trade annotations.
///
/// The condition label is always derived from the wear float; it is never
/// set independently of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub weapon: String,
    pub category: String,
    pub rarity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub stattrak: bool,
    pub souvenir: bool,
    pub image_url: String,
    pub provenance: Provenance,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_sale_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_lock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_lock_end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Request body for adding a skin to the collection. Weapon, category,
/// rarity and image are optional; missing values are backfilled from the
/// catalog by name lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub name: String,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub float: Option<f64>,
    #[serde(default)]
    pub stattrak: bool,
    #[serde(default)]
    pub souvenir: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub purchase_location: Option<String>,
    #[serde(default)]
    pub expected_sale_price: Option<f64>,
    #[serde(default)]
    pub trade_lock: Option<bool>,
    #[serde(default)]
    pub trade_lock_end_date: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// An enriched, validated item ready for persistence. Backends assign the
/// id and derive the condition label from the wear float.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub name: String,
    pub weapon: String,
    pub category: String,
    pub rarity: String,
    pub float: Option<f64>,
    pub stattrak: bool,
    pub souvenir: bool,
    pub image_url: String,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub purchase_location: Option<String>,
    pub expected_sale_price: Option<f64>,
    pub trade_lock: Option<bool>,
    pub trade_lock_end_date: Option<String>,
    pub comments: Option<String>,
}

impl NewInventoryItem {
    /// Materialize the record a backend would store, with a generated id,
    /// a derived condition and a creation timestamp.
    pub fn into_item(self, user_id: &str) -> CollectionItem {
        CollectionItem {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name,
            weapon: self.weapon,
            category: self.category,
            rarity: self.rarity,
            condition: self.float.map(Condition::from_wear),
            float: self.float,
            stattrak: self.stattrak,
            souvenir: self.souvenir,
            image_url: self.image_url,
            provenance: Provenance::OwnCollection,
            created_at: chrono::Utc::now().to_rfc3339(),
            purchase_price: self.purchase_price,
            purchase_date: self.purchase_date,
            purchase_location: self.purchase_location,
            expected_sale_price: self.expected_sale_price,
            trade_lock: self.trade_lock,
            trade_lock_end_date: self.trade_lock_end_date,
            comments: self.comments,
        }
    }
}
