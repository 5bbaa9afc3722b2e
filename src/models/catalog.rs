//! Catalog entry model matching the external skins API shape.
//!
//! The remote dataset is untrusted: weapon, category, pattern and rarity may
//! arrive either as plain strings or as objects carrying at least a `name`.
//! Consumers never inspect those fields directly; they go through the
//! normalizing accessors below.

use serde::{Deserialize, Serialize};

/// Default accent color for unrecognized rarities (gray).
pub const DEFAULT_RARITY_COLOR: &str = "#9EA3B8";

/// Placeholder image for entries without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A field that is either a bare string or a structured object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Structured(StructuredField),
}

/// Structured form of a polymorphic field. Extra keys from the remote API
/// are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FieldValue {
    pub fn name(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Structured(f) => &f.name,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Structured(f) => f.color.as_deref(),
        }
    }

    /// Serialize for a TEXT column: plain strings as-is, structured values
    /// as a JSON object so the color survives a round trip.
    pub fn to_column(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Structured(f) => {
                serde_json::to_string(f).unwrap_or_else(|_| f.name.clone())
            }
        }
    }

    /// Inverse of [`to_column`](Self::to_column).
    pub fn from_column(s: &str) -> Self {
        if s.starts_with('{') {
            if let Ok(f) = serde_json::from_str::<StructuredField>(s) {
                return FieldValue::Structured(f);
            }
        }
        FieldValue::Text(s.to_string())
    }
}

/// Read-only reference record describing one collectible skin variant.
///
/// Field names follow the external API wire format (snake_case floats).
/// Elements missing `id` or `name` fail deserialization, which is how
/// malformed remote entries get filtered out one by one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogEntry {
    pub fn weapon_name(&self) -> &str {
        self.weapon.as_ref().map(FieldValue::name).unwrap_or("Unknown")
    }

    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(FieldValue::name).unwrap_or("Unknown")
    }

    pub fn pattern_name(&self) -> Option<&str> {
        self.pattern.as_ref().map(FieldValue::name)
    }

    pub fn rarity_name(&self) -> &str {
        self.rarity.as_ref().map(FieldValue::name).unwrap_or("Common")
    }

    /// Accent color for the entry's rarity. Structured rarities expose their
    /// own color; plain strings map through the keyword table.
    pub fn rarity_color(&self) -> String {
        if let Some(color) = self.rarity.as_ref().and_then(FieldValue::color) {
            return color.to_string();
        }
        rarity_color(self.rarity_name()).to_string()
    }

    pub fn image_url(&self) -> &str {
        self.image.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Flatten the polymorphic fields into plain strings for display.
    pub fn normalize(&self) -> NormalizedEntry {
        NormalizedEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            weapon: self.weapon_name().to_string(),
            category: self.category_name().to_string(),
            pattern: self.pattern_name().map(str::to_string),
            min_float: self.min_float,
            max_float: self.max_float,
            rarity: self.rarity_name().to_string(),
            rarity_color: self.rarity_color(),
            image: self.image_url().to_string(),
        }
    }
}

/// A catalog entry with every polymorphic field coerced to a plain string
/// and a rarity-derived accent color attached. This is the search result
/// shape consumed by autocomplete UIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weapon: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_float: Option<f64>,
    pub rarity: String,
    #[serde(rename = "rarityColor")]
    pub rarity_color: String,
    pub image: String,
}

/// Map a rarity keyword to its accent color. Case-insensitive substring
/// match so both "Covert" and "Covert Rifle" resolve.
pub fn rarity_color(rarity: &str) -> &'static str {
    let normalized = rarity.to_lowercase();

    if normalized.contains("consumer") {
        "#9EA3B8"
    } else if normalized.contains("industrial") {
        "#5E98D9"
    } else if normalized.contains("mil-spec") {
        "#4B69CD"
    } else if normalized.contains("restricted") {
        "#8847FF"
    } else if normalized.contains("classified") {
        "#D32CE6"
    } else if normalized.contains("covert") {
        "#EB4B4B"
    } else if normalized.contains("extraordinary") {
        "#CAAB05"
    } else if normalized.contains("contraband") {
        "#E4AE39"
    } else {
        DEFAULT_RARITY_COLOR
    }
}
