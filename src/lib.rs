pub mod core;
pub mod data;
pub mod model;
pub mod save;

pub use core::{
    ClaimReceipt, EconomyError, GameContext, GestureEvent, HarvestEvent, HarvestPhase,
    HarvestRunResult, HarvestStateMachine, ItemSelector, ItemTally, NoRewardOffers, PendingReward,
    RewardOffers, UnlockTracker, UpgradeEconomy, UpgradeKind,
};
pub use data::{GameTuning, load_bundled_catalog, load_item_catalog_from_path, load_tuning_from_path};
pub use model::{CatalogError, ItemCatalog, ItemDefinition, ItemId, Point};
pub use save::{
    JsonFileStore, KeyValueStore, MemoryStore, PersistenceError, SaveSnapshot, export_to_base64,
    import_from_base64,
};
