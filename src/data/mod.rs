mod catalog_file;
mod loader;
mod tuning;

pub use catalog_file::CatalogFile;
pub use loader::{load_bundled_catalog, load_item_catalog_from_path, load_tuning_from_path};
pub use tuning::{
    EconomyDefaults, EconomyTuning, GameTuning, HarvestTuning, MAX_TOOL_UNLOCKS, ParticleTier,
};
