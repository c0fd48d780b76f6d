use thiserror::Error;

use crate::data::{EconomyTuning, MAX_TOOL_UNLOCKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("not enough points: cost {cost}, balance {balance}")]
    InsufficientPoints { cost: u64, balance: u64 },
    #[error("upgrade is already at its maximum level")]
    AlreadyMaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Harvest,
    ToolLevel,
    ToolUnlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeEconomy {
    point_balance: u64,
    harvest_yield_base: u32,
    harvest_upgrade_cost: u64,
    tool_level: u32,
    tool_level_upgrade_cost: u64,
    tool_instances_unlocked: u32,
    tool_unlock_cost: u64,
    tool_aggregate_value: u32,
}

impl Default for UpgradeEconomy {
    fn default() -> Self {
        Self::fresh(&EconomyTuning::default())
    }
}

impl UpgradeEconomy {
    pub fn fresh(tuning: &EconomyTuning) -> Self {
        let defaults = &tuning.defaults;
        Self::from_parts(EconomyParts {
            point_balance: defaults.point_balance,
            harvest_yield_base: defaults.harvest_yield_base,
            harvest_upgrade_cost: defaults.harvest_upgrade_cost,
            tool_level: defaults.tool_level,
            tool_level_upgrade_cost: defaults.tool_level_upgrade_cost,
            tool_instances_unlocked: 0,
            tool_unlock_cost: tuning.tool_unlock_cost_for(0),
        })
    }

    /// Rebuilds an economy from stored values. Out-of-range stats are clamped
    /// and the aggregate tool value is always recomputed.
    pub fn from_parts(parts: EconomyParts) -> Self {
        let tool_instances_unlocked = parts.tool_instances_unlocked.min(MAX_TOOL_UNLOCKS);
        let mut economy = Self {
            point_balance: parts.point_balance,
            harvest_yield_base: parts.harvest_yield_base.max(1),
            harvest_upgrade_cost: parts.harvest_upgrade_cost,
            tool_level: parts.tool_level.max(1),
            tool_level_upgrade_cost: parts.tool_level_upgrade_cost,
            tool_instances_unlocked,
            tool_unlock_cost: if tool_instances_unlocked >= MAX_TOOL_UNLOCKS {
                0
            } else {
                parts.tool_unlock_cost
            },
            tool_aggregate_value: 0,
        };
        economy.recompute_tool_value();
        economy
    }

    pub fn parts(&self) -> EconomyParts {
        EconomyParts {
            point_balance: self.point_balance,
            harvest_yield_base: self.harvest_yield_base,
            harvest_upgrade_cost: self.harvest_upgrade_cost,
            tool_level: self.tool_level,
            tool_level_upgrade_cost: self.tool_level_upgrade_cost,
            tool_instances_unlocked: self.tool_instances_unlocked,
            tool_unlock_cost: self.tool_unlock_cost,
        }
    }

    pub fn point_balance(&self) -> u64 {
        self.point_balance
    }

    pub fn harvest_yield_base(&self) -> u32 {
        self.harvest_yield_base
    }

    pub fn harvest_upgrade_cost(&self) -> u64 {
        self.harvest_upgrade_cost
    }

    pub fn tool_level(&self) -> u32 {
        self.tool_level
    }

    pub fn tool_level_upgrade_cost(&self) -> u64 {
        self.tool_level_upgrade_cost
    }

    pub fn tool_instances_unlocked(&self) -> u32 {
        self.tool_instances_unlocked
    }

    pub fn tool_unlock_cost(&self) -> u64 {
        self.tool_unlock_cost
    }

    pub fn tool_aggregate_value(&self) -> u32 {
        self.tool_aggregate_value
    }

    pub fn active_tool_count(&self) -> usize {
        self.tool_instances_unlocked as usize + 1
    }

    pub fn cost_of(&self, kind: UpgradeKind) -> u64 {
        match kind {
            UpgradeKind::Harvest => self.harvest_upgrade_cost,
            UpgradeKind::ToolLevel => self.tool_level_upgrade_cost,
            UpgradeKind::ToolUnlock => self.tool_unlock_cost,
        }
    }

    pub fn can_afford(&self, kind: UpgradeKind) -> bool {
        if kind == UpgradeKind::ToolUnlock && self.tool_instances_unlocked >= MAX_TOOL_UNLOCKS {
            return false;
        }
        self.point_balance >= self.cost_of(kind)
    }

    pub fn spend(&mut self, kind: UpgradeKind, tuning: &EconomyTuning) -> Result<(), EconomyError> {
        match kind {
            UpgradeKind::Harvest => self.spend_on_harvest_upgrade(tuning),
            UpgradeKind::ToolLevel => self.spend_on_tool_level_upgrade(tuning),
            UpgradeKind::ToolUnlock => self.spend_on_tool_unlock(tuning),
        }
    }

    pub fn spend_on_harvest_upgrade(&mut self, tuning: &EconomyTuning) -> Result<(), EconomyError> {
        self.charge(self.harvest_upgrade_cost)?;
        self.harvest_yield_base = grow_stat(self.harvest_yield_base, tuning.stat_growth);
        self.harvest_upgrade_cost = grow_cost(self.harvest_upgrade_cost, tuning.cost_growth);
        log::info!(
            "harvest upgraded: yield base {} next cost {}",
            self.harvest_yield_base,
            self.harvest_upgrade_cost
        );
        Ok(())
    }

    pub fn spend_on_tool_level_upgrade(&mut self, tuning: &EconomyTuning) -> Result<(), EconomyError> {
        self.charge(self.tool_level_upgrade_cost)?;
        self.tool_level = grow_stat(self.tool_level, tuning.stat_growth);
        self.tool_level_upgrade_cost = grow_cost(self.tool_level_upgrade_cost, tuning.cost_growth);
        self.recompute_tool_value();
        log::info!(
            "tool level upgraded: level {} aggregate {} next cost {}",
            self.tool_level,
            self.tool_aggregate_value,
            self.tool_level_upgrade_cost
        );
        Ok(())
    }

    pub fn spend_on_tool_unlock(&mut self, tuning: &EconomyTuning) -> Result<(), EconomyError> {
        if self.tool_instances_unlocked >= MAX_TOOL_UNLOCKS {
            return Err(EconomyError::AlreadyMaxed);
        }
        self.charge(self.tool_unlock_cost)?;
        self.tool_instances_unlocked = (self.tool_instances_unlocked + 1).min(MAX_TOOL_UNLOCKS);
        self.tool_unlock_cost = tuning.tool_unlock_cost_for(self.tool_instances_unlocked);
        self.recompute_tool_value();
        log::info!(
            "tool unlocked: {} extra tools aggregate {}",
            self.tool_instances_unlocked,
            self.tool_aggregate_value
        );
        Ok(())
    }

    pub fn credit_points(&mut self, amount: u64) {
        self.point_balance = self.point_balance.saturating_add(amount);
    }

    fn charge(&mut self, cost: u64) -> Result<(), EconomyError> {
        if self.point_balance < cost {
            return Err(EconomyError::InsufficientPoints {
                cost,
                balance: self.point_balance,
            });
        }
        self.point_balance -= cost;
        Ok(())
    }

    fn recompute_tool_value(&mut self) {
        self.tool_aggregate_value = self
            .tool_level
            .saturating_mul(self.tool_instances_unlocked + 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomyParts {
    pub point_balance: u64,
    pub harvest_yield_base: u32,
    pub harvest_upgrade_cost: u64,
    pub tool_level: u32,
    pub tool_level_upgrade_cost: u64,
    pub tool_instances_unlocked: u32,
    pub tool_unlock_cost: u64,
}

fn grow_stat(value: u32, factor: f64) -> u32 {
    let grown = (f64::from(value) * factor).floor();
    if grown >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        grown as u32
    }
}

fn grow_cost(cost: u64, factor: f64) -> u64 {
    let grown = (cost as f64 * factor).floor();
    if grown >= u64::MAX as f64 {
        return u64::MAX;
    }
    (grown as u64).max(cost.saturating_add(1))
}
