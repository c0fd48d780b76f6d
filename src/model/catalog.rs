use std::collections::HashSet;

use thiserror::Error;

use super::item::{ItemDefinition, ItemId, RarityTier};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog has no fallback item (rarity weight 1.0)")]
    NoFallbackItem,
    #[error("catalog has {count} fallback items, expected exactly one")]
    MultipleFallbackItems { count: usize },
    #[error("fallback item `{0}` must have a minimum run size of 0")]
    FallbackGated(ItemId),
    #[error("catalog has no flat-rare items")]
    EmptyFlatRareTier,
    #[error("item `{id}` has rarity weight {weight}, which belongs to no tier")]
    InvalidRarityWeight { id: ItemId, weight: f32 },
    #[error("item id `{0}` appears more than once")]
    DuplicateItemId(ItemId),
    #[error("item id `{0}` is empty, padded with whitespace or contains `,`")]
    UnstorableItemId(ItemId),
}

/// Ordered, immutable item table. Construction checks every tier invariant,
/// so a value of this type always has one ungated fallback item and a
/// non-empty flat-rare tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
    tiers: Vec<RarityTier>,
    fallback: usize,
    flat_rare: Vec<usize>,
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut tiers = Vec::with_capacity(items.len());
        for item in &items {
            if !item.id.is_storable() {
                return Err(CatalogError::UnstorableItemId(item.id.clone()));
            }
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateItemId(item.id.clone()));
            }
            let tier = item.tier().ok_or_else(|| CatalogError::InvalidRarityWeight {
                id: item.id.clone(),
                weight: item.rarity_weight,
            })?;
            tiers.push(tier);
        }

        let fallbacks = tiers
            .iter()
            .enumerate()
            .filter(|(_, tier)| **tier == RarityTier::Fallback)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        let fallback = match fallbacks.as_slice() {
            [] => return Err(CatalogError::NoFallbackItem),
            [index] => *index,
            many => {
                return Err(CatalogError::MultipleFallbackItems { count: many.len() });
            }
        };
        if items[fallback].min_run_size != 0 {
            return Err(CatalogError::FallbackGated(items[fallback].id.clone()));
        }

        let flat_rare = tiers
            .iter()
            .enumerate()
            .filter(|(_, tier)| **tier == RarityTier::FlatRare)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        if flat_rare.is_empty() {
            return Err(CatalogError::EmptyFlatRareTier);
        }

        Ok(Self {
            items,
            tiers,
            fallback,
            flat_rare,
        })
    }

    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    pub fn fallback(&self) -> &ItemDefinition {
        &self.items[self.fallback]
    }

    pub fn flat_rare_len(&self) -> usize {
        self.flat_rare.len()
    }

    pub fn flat_rare_at(&self, position: usize) -> Option<&ItemDefinition> {
        self.flat_rare.get(position).map(|index| &self.items[*index])
    }

    pub fn eligible_special(&self, run_size: u32) -> impl Iterator<Item = &ItemDefinition> {
        self.items
            .iter()
            .zip(&self.tiers)
            .filter(move |(item, tier)| {
                **tier == RarityTier::CommonSpecial && item.is_eligible_for(run_size)
            })
            .map(|(item, _)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, ItemCatalog};
    use crate::model::{ItemDefinition, ItemId};

    fn base_items() -> Vec<ItemDefinition> {
        vec![
            ItemDefinition::new("normal", "Normal", 5, 0, 1.0),
            ItemDefinition::new("silver", "Silver", 7, 30, 0.2),
            ItemDefinition::new("gold", "Gold", 10, 150, 0.2),
            ItemDefinition::new("pebble", "Pebble", 1, 0, 0.05),
        ]
    }

    #[test]
    fn valid_catalog_exposes_tiers() {
        let catalog = ItemCatalog::new(base_items()).expect("catalog should build");

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.fallback().id, ItemId::new("normal"));
        assert_eq!(catalog.flat_rare_len(), 1);
        assert_eq!(catalog.eligible_special(29).count(), 0);
        assert_eq!(catalog.eligible_special(30).count(), 1);
        assert_eq!(catalog.eligible_special(500).count(), 2);
    }

    #[test]
    fn missing_fallback_is_rejected() {
        let mut items = base_items();
        items.remove(0);
        assert_eq!(ItemCatalog::new(items), Err(CatalogError::NoFallbackItem));
    }

    #[test]
    fn second_fallback_is_rejected() {
        let mut items = base_items();
        items.push(ItemDefinition::new("other", "Other", 5, 0, 1.0));
        assert_eq!(
            ItemCatalog::new(items),
            Err(CatalogError::MultipleFallbackItems { count: 2 })
        );
    }

    #[test]
    fn gated_fallback_is_rejected() {
        let mut items = base_items();
        items[0].min_run_size = 10;
        assert_eq!(
            ItemCatalog::new(items),
            Err(CatalogError::FallbackGated(ItemId::new("normal")))
        );
    }

    #[test]
    fn empty_flat_rare_tier_is_rejected() {
        let mut items = base_items();
        items.pop();
        assert_eq!(ItemCatalog::new(items), Err(CatalogError::EmptyFlatRareTier));
    }

    #[test]
    fn unknown_weight_and_duplicate_ids_are_rejected() {
        let mut items = base_items();
        items.push(ItemDefinition::new("odd", "Odd", 1, 0, 0.01));
        assert!(matches!(
            ItemCatalog::new(items),
            Err(CatalogError::InvalidRarityWeight { .. })
        ));

        let mut items = base_items();
        items.push(ItemDefinition::new("gold", "Gold again", 10, 0, 0.2));
        assert_eq!(
            ItemCatalog::new(items),
            Err(CatalogError::DuplicateItemId(ItemId::new("gold")))
        );
    }

    #[test]
    fn ids_that_break_the_unlock_list_are_rejected() {
        for bad in ["normal,imo", " normal", "normal\t", ""] {
            let mut items = base_items();
            items[0].id = ItemId::new(bad);
            assert_eq!(
                ItemCatalog::new(items),
                Err(CatalogError::UnstorableItemId(ItemId::new(bad)))
            );
        }
    }
}
