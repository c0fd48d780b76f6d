use std::fmt;

use serde::{Deserialize, Serialize};

pub const FALLBACK_WEIGHT: f32 = 1.0;
pub const FLAT_RARE_WEIGHT: f32 = 0.05;
pub const ID_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_storable(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(ID_DELIMITER) && self.0.trim() == self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RarityTier {
    Fallback,
    CommonSpecial,
    FlatRare,
}

impl RarityTier {
    pub fn from_weight(weight: f32) -> Option<Self> {
        if (weight - FALLBACK_WEIGHT).abs() < f32::EPSILON {
            Some(Self::Fallback)
        } else if (weight - FLAT_RARE_WEIGHT).abs() < f32::EPSILON {
            Some(Self::FlatRare)
        } else if weight > FLAT_RARE_WEIGHT && weight < FALLBACK_WEIGHT {
            Some(Self::CommonSpecial)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub point_value: u32,
    #[serde(default)]
    pub min_run_size: u32,
    #[serde(default = "default_rarity_weight")]
    pub rarity_weight: f32,
}

const fn default_rarity_weight() -> f32 {
    FALLBACK_WEIGHT
}

impl ItemDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        point_value: u32,
        min_run_size: u32,
        rarity_weight: f32,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            point_value,
            min_run_size,
            rarity_weight,
        }
    }

    pub fn tier(&self) -> Option<RarityTier> {
        RarityTier::from_weight(self.rarity_weight)
    }

    pub fn is_eligible_for(&self, run_size: u32) -> bool {
        self.min_run_size <= run_size
    }
}
