use serde::{Deserialize, Serialize};

use crate::model::{Bounds, Point};

pub const MAX_TOOL_UNLOCKS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameTuning {
    pub harvest: HarvestTuning,
    pub economy: EconomyTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestTuning {
    pub world_width: f32,
    pub world_height: f32,
    pub ground_y: f32,
    pub tool_width: f32,
    pub tool_height: f32,
    pub tool_top_margin: f32,
    pub tool_offset_x: f32,
    pub dig_duration: f32,
    pub min_swipe_seconds: f32,
    pub mole_width: f32,
    pub mole_height: f32,
    pub mole_rest_y: f32,
    pub vine_height: f32,
    pub upward_threshold: f32,
    pub bonus_speed_threshold: f32,
    pub bonus_multiplier: u32,
    pub tap_swipe_speed: f32,
    pub max_run_size: u32,
    pub display_cap: u32,
    pub rise_speed: f32,
    pub item_width: f32,
    pub item_spacing: f32,
    pub item_spread: f32,
    pub item_spread_angle: f32,
    pub particle_tiers: Vec<ParticleTier>,
    pub base_particle_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleTier {
    pub min_speed: f32,
    pub count: u32,
}

impl Default for HarvestTuning {
    fn default() -> Self {
        Self {
            world_width: 1080.0,
            world_height: 1920.0,
            ground_y: 650.0,
            tool_width: 200.0,
            tool_height: 200.0,
            tool_top_margin: 50.0,
            tool_offset_x: 300.0,
            dig_duration: 0.5,
            min_swipe_seconds: 1.0 / 60.0,
            mole_width: 300.0,
            mole_height: 300.0,
            mole_rest_y: 580.0,
            vine_height: 120.0,
            upward_threshold: 0.5,
            bonus_speed_threshold: 1000.0,
            bonus_multiplier: 2,
            tap_swipe_speed: 1500.0,
            max_run_size: 3000,
            display_cap: 100,
            rise_speed: 1000.0,
            item_width: 120.0,
            item_spacing: 12.0,
            item_spread: 2.0,
            item_spread_angle: 0.5,
            particle_tiers: vec![
                ParticleTier {
                    min_speed: 2000.0,
                    count: 50,
                },
                ParticleTier {
                    min_speed: 1500.0,
                    count: 30,
                },
                ParticleTier {
                    min_speed: 1000.0,
                    count: 20,
                },
            ],
            base_particle_count: 10,
        }
    }
}

impl HarvestTuning {
    pub fn tool_home(&self, index: usize) -> Point {
        let main_x = self.world_width * 0.5 - self.tool_width * 0.5;
        let y = self.world_height - self.tool_top_margin - self.tool_height;
        let x = match index {
            0 => main_x,
            1 => main_x - self.tool_offset_x,
            _ => main_x + self.tool_offset_x,
        };
        Point::new(x, y)
    }

    pub fn mole_origin_x(&self) -> f32 {
        self.world_width * 0.5 - self.mole_width * 0.5
    }

    pub fn mole_bounds(&self, mole_y: f32) -> Bounds {
        Bounds::new(
            Point::new(self.mole_origin_x(), mole_y),
            self.mole_width,
            self.mole_height,
        )
    }

    /// Count of the fastest tier the speed exceeds, in any tier order.
    pub fn particle_count(&self, swipe_speed: f32) -> u32 {
        self.particle_tiers
            .iter()
            .filter(|tier| swipe_speed > tier.min_speed)
            .max_by(|a, b| a.min_speed.total_cmp(&b.min_speed))
            .map(|tier| tier.count)
            .unwrap_or(self.base_particle_count)
    }

    pub fn swipe_speed(&self, distance: f32, elapsed: f32) -> f32 {
        distance / elapsed.max(self.min_swipe_seconds).max(f32::EPSILON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub stat_growth: f64,
    pub cost_growth: f64,
    pub tool_unlock_costs: [u64; MAX_TOOL_UNLOCKS as usize],
    pub defaults: EconomyDefaults,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            stat_growth: 1.5,
            cost_growth: 2.25,
            tool_unlock_costs: [350, 1500],
            defaults: EconomyDefaults::default(),
        }
    }
}

impl EconomyTuning {
    pub fn tool_unlock_cost_for(&self, unlocked: u32) -> u64 {
        self.tool_unlock_costs
            .get(unlocked as usize)
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyDefaults {
    pub point_balance: u64,
    pub harvest_yield_base: u32,
    pub harvest_upgrade_cost: u64,
    pub tool_level: u32,
    pub tool_level_upgrade_cost: u64,
}

impl Default for EconomyDefaults {
    fn default() -> Self {
        Self {
            point_balance: 0,
            harvest_yield_base: 1,
            harvest_upgrade_cost: 50,
            tool_level: 3,
            tool_level_upgrade_cost: 100,
        }
    }
}
