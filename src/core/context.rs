use crate::data::GameTuning;
use crate::model::{ItemCatalog, ItemId};
use crate::save::{
    KeyValueStore, PersistenceError, SaveSnapshot, read_snapshot, snapshot_from_state,
    state_from_snapshot, write_snapshot,
};

use super::economy::{EconomyError, UpgradeEconomy, UpgradeKind};
use super::unlocks::UnlockTracker;

pub type BoxedStore = Box<dyn KeyValueStore + Send + Sync>;

/// Long-lived game state shared by every play session. Each successful
/// mutation is written to the store before the call returns.
pub struct GameContext {
    catalog: ItemCatalog,
    tuning: GameTuning,
    economy: UpgradeEconomy,
    unlocks: UnlockTracker,
    store: BoxedStore,
    last_persist_error: Option<String>,
}

impl GameContext {
    pub fn load(catalog: ItemCatalog, tuning: GameTuning, store: BoxedStore) -> Self {
        let snapshot = read_snapshot(store.as_ref(), &tuning.economy);
        let (economy, unlocks) = state_from_snapshot(&snapshot);
        log::info!(
            "loaded progression: {} points, {} of {} items collected",
            economy.point_balance(),
            unlocks.len(),
            catalog.len()
        );
        Self::with_state(catalog, tuning, economy, unlocks, store)
    }

    pub fn with_state(
        catalog: ItemCatalog,
        tuning: GameTuning,
        economy: UpgradeEconomy,
        unlocks: UnlockTracker,
        store: BoxedStore,
    ) -> Self {
        Self {
            catalog,
            tuning,
            economy,
            unlocks,
            store,
            last_persist_error: None,
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub fn economy(&self) -> &UpgradeEconomy {
        &self.economy
    }

    pub fn unlocks(&self) -> &UnlockTracker {
        &self.unlocks
    }

    pub fn completion_percent(&self) -> u32 {
        self.unlocks.completion_percent(&self.catalog)
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn purchase(&mut self, kind: UpgradeKind) -> Result<(), EconomyError> {
        self.economy.spend(kind, &self.tuning.economy)?;
        self.persist();
        Ok(())
    }

    pub fn spend_on_harvest_upgrade(&mut self) -> Result<(), EconomyError> {
        self.purchase(UpgradeKind::Harvest)
    }

    pub fn spend_on_tool_level_upgrade(&mut self) -> Result<(), EconomyError> {
        self.purchase(UpgradeKind::ToolLevel)
    }

    pub fn spend_on_tool_unlock(&mut self) -> Result<(), EconomyError> {
        self.purchase(UpgradeKind::ToolUnlock)
    }

    pub fn credit_points(&mut self, amount: u64) {
        self.economy.credit_points(amount);
        self.persist();
    }

    pub fn register_unlocks<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) -> Vec<ItemId> {
        let fresh = ids
            .into_iter()
            .filter(|id| self.unlocks.register(id))
            .cloned()
            .collect::<Vec<_>>();
        if !fresh.is_empty() {
            log::info!("unlocked {} new items", fresh.len());
            self.persist();
        }
        fresh
    }

    pub fn snapshot(&self) -> SaveSnapshot {
        snapshot_from_state(&self.economy, &self.unlocks)
    }

    pub fn restore(&mut self, snapshot: &SaveSnapshot) {
        let (economy, unlocks) = state_from_snapshot(snapshot);
        self.economy = economy;
        self.unlocks = unlocks;
        self.persist();
    }

    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let snapshot = self.snapshot();
        write_snapshot(self.store.as_mut(), &snapshot)
    }

    pub fn shutdown(mut self) -> Result<(), PersistenceError> {
        self.save()
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                log::error!("progression not saved, continuing in memory: {err}");
                self.last_persist_error = Some(err.to_string());
            }
        }
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("catalog_len", &self.catalog.len())
            .field("economy", &self.economy)
            .field("unlocks", &self.unlocks)
            .field("last_persist_error", &self.last_persist_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::GameContext;
    use crate::core::{EconomyError, UnlockTracker, UpgradeEconomy};
    use crate::data::{GameTuning, load_bundled_catalog};
    use crate::model::ItemId;
    use crate::save::MemoryStore;

    fn context(store: MemoryStore) -> GameContext {
        GameContext::load(
            load_bundled_catalog().expect("catalog"),
            GameTuning::default(),
            Box::new(store),
        )
    }

    #[test]
    fn purchases_are_persisted_immediately() {
        let mut ctx = context(MemoryStore::new());
        ctx.credit_points(400);

        ctx.spend_on_tool_unlock().expect("affordable");
        assert_eq!(ctx.economy().point_balance(), 50);
        assert_eq!(ctx.economy().tool_instances_unlocked(), 1);

        assert_eq!(
            ctx.spend_on_tool_level_upgrade(),
            Err(EconomyError::InsufficientPoints {
                cost: 100,
                balance: 50
            })
        );
        assert_eq!(ctx.snapshot().tool_instances_unlocked, 1);
        assert_eq!(ctx.snapshot().point_balance, 50);
    }

    #[test]
    fn storage_failures_are_not_fatal() {
        let mut ctx = context(MemoryStore::unavailable());
        ctx.credit_points(10);

        assert_eq!(ctx.economy().point_balance(), 10);
        assert!(ctx.last_persist_error().is_some());
    }

    #[test]
    fn unlock_registration_reports_only_new_ids() {
        let mut ctx = context(MemoryStore::new());
        let gold = ItemId::new("gold_imo");
        let normal = ItemId::new("normal_imo");

        let fresh = ctx.register_unlocks([&gold, &normal, &gold]);
        assert_eq!(fresh, vec![gold.clone(), normal.clone()]);
        assert!(ctx.register_unlocks([&gold]).is_empty());
        assert_eq!(ctx.completion_percent(), 8);
    }

    #[test]
    fn restore_replaces_progression() {
        let mut ctx = GameContext::with_state(
            load_bundled_catalog().expect("catalog"),
            GameTuning::default(),
            UpgradeEconomy::default(),
            UnlockTracker::new(),
            Box::new(MemoryStore::new()),
        );
        let mut snapshot = ctx.snapshot();
        snapshot.point_balance = 777;
        snapshot.unlocked_item_ids = vec![ItemId::new("koisi")];

        ctx.restore(&snapshot);
        assert_eq!(ctx.economy().point_balance(), 777);
        assert!(ctx.unlocks().contains(&ItemId::new("koisi")));
    }
}
