use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use imo_harvest::core::BoxedStore;
use imo_harvest::{
    GameContext, GameTuning, HarvestStateMachine, ItemSelector, JsonFileStore, MemoryStore,
    import_from_base64, load_bundled_catalog, load_item_catalog_from_path, load_tuning_from_path,
};

use super::resources::{HudText, MoleSprite, RuntimeConfig, Session, ShellOffers, ToolSprite};
use super::state::ShellPhase;
use super::view::{MOLE_COLOR, TOOL_COLOR};

pub fn build_session(config: &RuntimeConfig) -> Result<Session> {
    let tuning = match &config.tuning_path {
        Some(path) => load_tuning_from_path(path)?,
        None => GameTuning::default(),
    };
    let catalog = match &config.catalog_path {
        Some(path) => load_item_catalog_from_path(path)?,
        None => load_bundled_catalog().context("bundled item catalog is invalid")?,
    };

    let store: BoxedStore = match JsonFileStore::open(&config.save_path) {
        Ok(store) => {
            info!("progress stored in {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            warn!(
                "save file {} unavailable ({err}); progress will not persist",
                config.save_path.display()
            );
            Box::new(MemoryStore::new())
        }
    };

    let mut ctx = GameContext::load(catalog, tuning, store);
    if let Some(code) = &config.import_code {
        match import_from_base64(code) {
            Ok(snapshot) => {
                ctx.restore(&snapshot);
                info!("imported save code with {} points", snapshot.point_balance);
            }
            Err(err) => warn!("ignoring save code: {err:#}"),
        }
    }
    let selector = match config.rng_seed {
        Some(seed) => ItemSelector::seeded(seed),
        None => ItemSelector::from_entropy(),
    };
    let machine = HarvestStateMachine::new(selector, &ctx);
    info!(
        "session ready: {} points, {} tools, {}% collected",
        ctx.economy().point_balance(),
        ctx.economy().active_tool_count(),
        ctx.completion_percent()
    );

    Ok(Session {
        ctx,
        machine,
        pending: None,
        offers: ShellOffers {
            grant_immediately: config.grant_offers,
            notice: None,
        },
        last_summary: None,
    })
}

pub fn spawn_camera(mut commands: Commands, session: Res<Session>) {
    let tuning = &session.ctx.tuning().harvest;
    commands.spawn((
        Name::new("PrimaryCamera"),
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: tuning.world_height,
            },
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(tuning.world_width / 2.0, tuning.world_height / 2.0, 0.0),
    ));
}

pub fn spawn_scene(
    mut commands: Commands,
    session: Res<Session>,
    mut next_phase: ResMut<NextState<ShellPhase>>,
) {
    let tuning = &session.ctx.tuning().harvest;

    commands.spawn((
        Name::new("Ground"),
        Sprite::from_color(
            Color::srgb(0.45, 0.3, 0.18),
            Vec2::new(tuning.world_width, tuning.ground_y),
        ),
        Transform::from_xyz(tuning.world_width / 2.0, tuning.ground_y / 2.0, -1.0),
    ));

    commands.spawn((
        Name::new("Mole"),
        MoleSprite,
        Sprite::from_color(MOLE_COLOR, Vec2::new(tuning.mole_width, tuning.mole_height)),
        Transform::from_xyz(0.0, 0.0, 1.0),
        Visibility::Hidden,
    ));

    // One sprite per possible tool; unused ones stay hidden until unlocked.
    for index in 0..=imo_harvest::data::MAX_TOOL_UNLOCKS as usize {
        commands.spawn((
            Name::new(format!("Tool{index}")),
            ToolSprite { index },
            Sprite::from_color(TOOL_COLOR, Vec2::new(tuning.tool_width, tuning.tool_height)),
            Transform::from_xyz(0.0, 0.0, 2.0),
            Visibility::Hidden,
        ));
    }

    commands.spawn((
        Name::new("HudText"),
        HudText,
        Text::new("Loading..."),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.08, 0.1, 0.14)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));

    next_phase.set(ShellPhase::Playing);
}

#[cfg(test)]
mod tests {
    use imo_harvest::{JsonFileStore, KeyValueStore, export_to_base64};

    use super::build_session;
    use crate::app::resources::RuntimeConfig;

    #[test]
    fn save_code_replaces_stored_progress() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = RuntimeConfig {
            save_path: dir.path().join("progress.json"),
            ..RuntimeConfig::default()
        };
        let mut snapshot = build_session(&config).expect("session").ctx.snapshot();
        snapshot.point_balance = 777;
        snapshot.tool_instances_unlocked = 1;
        snapshot.tool_unlock_cost = 1500;

        let importing = RuntimeConfig {
            import_code: Some(export_to_base64(&snapshot).expect("export")),
            ..config.clone()
        };
        let session = build_session(&importing).expect("session");
        assert_eq!(session.ctx.economy().point_balance(), 777);
        assert_eq!(session.machine.tools().len(), 2);

        let store = JsonFileStore::open(&config.save_path).expect("reopen");
        assert_eq!(store.get_u64("point_balance"), Some(777));
    }

    #[test]
    fn bad_save_code_keeps_stored_progress() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = RuntimeConfig {
            save_path: dir.path().join("progress.json"),
            import_code: Some("not a save code".to_string()),
            ..RuntimeConfig::default()
        };
        let session = build_session(&config).expect("session");
        assert_eq!(session.ctx.economy().point_balance(), 0);
    }
}
