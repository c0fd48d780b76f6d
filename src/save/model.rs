use serde::{Deserialize, Serialize};

use crate::data::EconomyTuning;
use crate::model::ItemId;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSnapshot {
    pub version: u32,
    pub point_balance: u64,
    pub harvest_yield_base: u32,
    pub harvest_upgrade_cost: u64,
    pub tool_level: u32,
    pub tool_level_upgrade_cost: u64,
    pub tool_aggregate_value: u32,
    pub tool_instances_unlocked: u32,
    pub tool_unlock_cost: u64,
    pub unlocked_item_ids: Vec<ItemId>,
}

impl SaveSnapshot {
    pub fn fresh(tuning: &EconomyTuning) -> Self {
        let defaults = &tuning.defaults;
        Self {
            version: SAVE_VERSION,
            point_balance: defaults.point_balance,
            harvest_yield_base: defaults.harvest_yield_base,
            harvest_upgrade_cost: defaults.harvest_upgrade_cost,
            tool_level: defaults.tool_level,
            tool_level_upgrade_cost: defaults.tool_level_upgrade_cost,
            tool_aggregate_value: defaults.tool_level,
            tool_instances_unlocked: 0,
            tool_unlock_cost: tuning.tool_unlock_cost_for(0),
            unlocked_item_ids: Vec::new(),
        }
    }
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self::fresh(&EconomyTuning::default())
    }
}
