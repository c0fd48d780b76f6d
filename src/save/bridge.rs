use serde_json::Value;

use crate::core::{EconomyParts, UnlockTracker, UpgradeEconomy};
use crate::data::EconomyTuning;

use super::{KeyValueStore, PersistenceError, SAVE_VERSION, SaveSnapshot};

pub mod keys {
    pub const SAVE_VERSION: &str = "save_version";
    pub const POINT_BALANCE: &str = "point_balance";
    pub const HARVEST_YIELD_BASE: &str = "harvest_yield_base";
    pub const HARVEST_UPGRADE_COST: &str = "harvest_upgrade_cost";
    pub const TOOL_LEVEL: &str = "tool_level";
    pub const TOOL_LEVEL_UPGRADE_COST: &str = "tool_level_upgrade_cost";
    pub const TOOL_AGGREGATE_VALUE: &str = "tool_aggregate_value";
    pub const TOOL_INSTANCES_UNLOCKED: &str = "tool_instances_unlocked";
    pub const TOOL_UNLOCK_COST: &str = "tool_unlock_cost";
    pub const UNLOCKED_ITEM_IDS: &str = "unlocked_item_ids";
}

pub fn snapshot_from_state(economy: &UpgradeEconomy, unlocks: &UnlockTracker) -> SaveSnapshot {
    let parts = economy.parts();
    SaveSnapshot {
        version: SAVE_VERSION,
        point_balance: parts.point_balance,
        harvest_yield_base: parts.harvest_yield_base,
        harvest_upgrade_cost: parts.harvest_upgrade_cost,
        tool_level: parts.tool_level,
        tool_level_upgrade_cost: parts.tool_level_upgrade_cost,
        tool_aggregate_value: economy.tool_aggregate_value(),
        tool_instances_unlocked: parts.tool_instances_unlocked,
        tool_unlock_cost: parts.tool_unlock_cost,
        unlocked_item_ids: unlocks.ids().cloned().collect(),
    }
}

pub fn state_from_snapshot(snapshot: &SaveSnapshot) -> (UpgradeEconomy, UnlockTracker) {
    let economy = UpgradeEconomy::from_parts(EconomyParts {
        point_balance: snapshot.point_balance,
        harvest_yield_base: snapshot.harvest_yield_base,
        harvest_upgrade_cost: snapshot.harvest_upgrade_cost,
        tool_level: snapshot.tool_level,
        tool_level_upgrade_cost: snapshot.tool_level_upgrade_cost,
        tool_instances_unlocked: snapshot.tool_instances_unlocked,
        tool_unlock_cost: snapshot.tool_unlock_cost,
    });
    if economy.tool_aggregate_value() != snapshot.tool_aggregate_value {
        log::warn!(
            "stored tool aggregate value {} disagrees with stats, using {}",
            snapshot.tool_aggregate_value,
            economy.tool_aggregate_value()
        );
    }
    let unlocks = snapshot.unlocked_item_ids.iter().cloned().collect();
    (economy, unlocks)
}

pub fn write_snapshot(
    store: &mut dyn KeyValueStore,
    snapshot: &SaveSnapshot,
) -> Result<(), PersistenceError> {
    let unlocks = snapshot
        .unlocked_item_ids
        .iter()
        .cloned()
        .collect::<UnlockTracker>();
    store.put(keys::SAVE_VERSION, Value::from(snapshot.version));
    store.put(keys::POINT_BALANCE, Value::from(snapshot.point_balance));
    store.put(keys::HARVEST_YIELD_BASE, Value::from(snapshot.harvest_yield_base));
    store.put(keys::HARVEST_UPGRADE_COST, Value::from(snapshot.harvest_upgrade_cost));
    store.put(keys::TOOL_LEVEL, Value::from(snapshot.tool_level));
    store.put(keys::TOOL_LEVEL_UPGRADE_COST, Value::from(snapshot.tool_level_upgrade_cost));
    store.put(keys::TOOL_AGGREGATE_VALUE, Value::from(snapshot.tool_aggregate_value));
    store.put(keys::TOOL_INSTANCES_UNLOCKED, Value::from(snapshot.tool_instances_unlocked));
    store.put(keys::TOOL_UNLOCK_COST, Value::from(snapshot.tool_unlock_cost));
    store.put(keys::UNLOCKED_ITEM_IDS, Value::from(unlocks.to_delimited()));
    store.flush()
}

/// Reads a snapshot, taking each absent or mistyped key from the fresh-install
/// defaults.
pub fn read_snapshot(store: &dyn KeyValueStore, tuning: &EconomyTuning) -> SaveSnapshot {
    let defaults = SaveSnapshot::fresh(tuning);
    let unlocked_item_ids = store
        .get_str(keys::UNLOCKED_ITEM_IDS)
        .map(|raw| UnlockTracker::from_delimited(raw).ids().cloned().collect())
        .unwrap_or(defaults.unlocked_item_ids);

    SaveSnapshot {
        version: store.get_u32(keys::SAVE_VERSION).unwrap_or(defaults.version),
        point_balance: store
            .get_u64(keys::POINT_BALANCE)
            .unwrap_or(defaults.point_balance),
        harvest_yield_base: store
            .get_u32(keys::HARVEST_YIELD_BASE)
            .unwrap_or(defaults.harvest_yield_base),
        harvest_upgrade_cost: store
            .get_u64(keys::HARVEST_UPGRADE_COST)
            .unwrap_or(defaults.harvest_upgrade_cost),
        tool_level: store.get_u32(keys::TOOL_LEVEL).unwrap_or(defaults.tool_level),
        tool_level_upgrade_cost: store
            .get_u64(keys::TOOL_LEVEL_UPGRADE_COST)
            .unwrap_or(defaults.tool_level_upgrade_cost),
        tool_aggregate_value: store
            .get_u32(keys::TOOL_AGGREGATE_VALUE)
            .unwrap_or(defaults.tool_aggregate_value),
        tool_instances_unlocked: store
            .get_u32(keys::TOOL_INSTANCES_UNLOCKED)
            .unwrap_or(defaults.tool_instances_unlocked),
        tool_unlock_cost: store
            .get_u64(keys::TOOL_UNLOCK_COST)
            .unwrap_or(defaults.tool_unlock_cost),
        unlocked_item_ids,
    }
}
