mod catalog;
mod item;
mod point;

pub use catalog::{CatalogError, ItemCatalog};
pub use item::{FALLBACK_WEIGHT, FLAT_RARE_WEIGHT, ID_DELIMITER, ItemDefinition, ItemId, RarityTier};
pub use point::{Bounds, Point};
