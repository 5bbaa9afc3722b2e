//! Wear-derived condition labels.

use serde::{Deserialize, Serialize};

/// Discrete condition tier derived from a wear float.
///
/// Variants are ordered best to worst so that `Ord` follows the wear scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Condition {
    #[serde(rename = "Factory New")]
    FactoryNew,
    #[serde(rename = "Minimal Wear")]
    MinimalWear,
    #[serde(rename = "Field-Tested")]
    FieldTested,
    #[serde(rename = "Well-Worn")]
    WellWorn,
    #[serde(rename = "Battle-Scarred")]
    BattleScarred,
}

impl Condition {
    /// Map a wear float to its condition tier.
    ///
    /// Bins are upper-exclusive except the final one: [0, 0.07), [0.07, 0.15),
    /// [0.15, 0.38), [0.38, 0.45), [0.45, 1]. Out-of-range input lands in the
    /// nearest outer bin instead of panicking; callers validate [0, 1].
    pub fn from_wear(wear: f64) -> Self {
        if wear < 0.07 {
            Condition::FactoryNew
        } else if wear < 0.15 {
            Condition::MinimalWear
        } else if wear < 0.38 {
            Condition::FieldTested
        } else if wear < 0.45 {
            Condition::WellWorn
        } else {
            Condition::BattleScarred
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::FactoryNew => "Factory New",
            Condition::MinimalWear => "Minimal Wear",
            Condition::FieldTested => "Field-Tested",
            Condition::WellWorn => "Well-Worn",
            Condition::BattleScarred => "Battle-Scarred",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Factory New" => Some(Condition::FactoryNew),
            "Minimal Wear" => Some(Condition::MinimalWear),
            "Field-Tested" => Some(Condition::FieldTested),
            "Well-Worn" => Some(Condition::WellWorn),
            "Battle-Scarred" => Some(Condition::BattleScarred),
            _ => None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
