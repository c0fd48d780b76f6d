use std::env;
use std::path::PathBuf;

use bevy::prelude::*;
use imo_harvest::core::{GestureEvent, GrantCallback, UpgradeKind};
use imo_harvest::{GameContext, HarvestStateMachine, NoRewardOffers, PendingReward, RewardOffers};

#[derive(Resource, Debug, Clone)]
pub struct RuntimeConfig {
    pub save_path: PathBuf,
    pub rng_seed: Option<u64>,
    pub tuning_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub tap_slop: f32,
    pub grant_offers: bool,
    pub import_code: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("saves/progress.json"),
            rng_seed: None,
            tuning_path: None,
            catalog_path: None,
            tap_slop: 12.0,
            grant_offers: true,
            import_code: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = env::var("IMO_SAVE_PATH") {
            config.save_path = PathBuf::from(path);
        }
        if let Ok(seed) = env::var("IMO_SEED") {
            match seed.parse() {
                Ok(seed) => config.rng_seed = Some(seed),
                Err(err) => warn!("ignoring IMO_SEED={seed}: {err}"),
            }
        }
        config.tuning_path = env::var("IMO_TUNING").ok().map(PathBuf::from);
        config.catalog_path = env::var("IMO_CATALOG").ok().map(PathBuf::from);
        config.import_code = env::var("IMO_SAVE_CODE").ok();
        if env::var("IMO_OFFERS").is_ok_and(|value| value == "off") {
            config.grant_offers = false;
        }
        config
    }
}

#[derive(Resource)]
pub struct Session {
    pub ctx: GameContext,
    pub machine: HarvestStateMachine,
    pub pending: Option<PendingReward>,
    pub offers: ShellOffers,
    pub last_summary: Option<String>,
}

#[derive(Debug, Default)]
pub struct ShellOffers {
    pub grant_immediately: bool,
    pub notice: Option<String>,
}

impl RewardOffers for ShellOffers {
    fn present_reward_offer(&mut self, message: &str, on_granted: GrantCallback) {
        if self.grant_immediately {
            info!("{message} (granted)");
            self.notice = Some("Bonus granted: points doubled".to_string());
            on_granted();
        } else {
            NoRewardOffers.present_reward_offer(message, on_granted);
            self.notice = Some("Bonus offers are switched off".to_string());
        }
    }

    fn present_message(&mut self, message: &str) {
        info!("{message}");
        self.notice = Some(message.to_string());
    }
}

#[derive(Resource, Debug, Default)]
pub struct PointerTrack {
    pub pressed_at: Option<Vec2>,
    pub travelled: f32,
    pub last: Option<Vec2>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct GestureInput(pub GestureEvent);

#[derive(Event, Debug, Clone, Copy)]
pub enum SessionAction {
    Purchase(UpgradeKind),
    RequestDouble,
    Claim,
    ExportSaveCode,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ToolSprite {
    pub index: usize,
}

#[derive(Component)]
pub struct MoleSprite;

#[derive(Component, Debug, Clone, Copy)]
pub struct ItemSprite {
    pub index: usize,
}

#[derive(Component)]
pub struct HudText;
