use bevy::prelude::*;
use imo_harvest::model::RarityTier;
use imo_harvest::{HarvestPhase, Point, UpgradeEconomy, UpgradeKind};

use super::resources::{HudText, ItemSprite, MoleSprite, Session, ToolSprite};

pub const TOOL_COLOR: Color = Color::srgb(0.62, 0.64, 0.68);
const GRABBED_TOOL_COLOR: Color = Color::srgb(0.85, 0.87, 0.92);
pub const MOLE_COLOR: Color = Color::srgb(0.32, 0.22, 0.16);
const FALLBACK_ITEM_COLOR: Color = Color::srgb(0.72, 0.42, 0.3);
const SPECIAL_ITEM_COLOR: Color = Color::srgb(0.93, 0.78, 0.25);
const RARE_ITEM_COLOR: Color = Color::srgb(0.7, 0.35, 0.9);

fn sprite_center(origin: Point, width: f32, height: f32, z: f32) -> Vec3 {
    Vec3::new(origin.x + width / 2.0, origin.y + height / 2.0, z)
}

pub fn refresh_tools(
    session: Res<Session>,
    mut tools: Query<(&ToolSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let tuning = &session.ctx.tuning().harvest;
    let digging = matches!(
        session.machine.phase(),
        HarvestPhase::Idle | HarvestPhase::Digging
    );

    for (marker, mut sprite, mut transform, mut visibility) in &mut tools {
        match session.machine.tools().get(marker.index) {
            Some(tool) if digging && tool.is_active() => {
                sprite.color = if tool.is_dragging() {
                    GRABBED_TOOL_COLOR
                } else {
                    TOOL_COLOR
                };
                transform.translation =
                    sprite_center(tool.position(), tuning.tool_width, tuning.tool_height, 2.0);
                *visibility = Visibility::Visible;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

pub fn refresh_mole(session: Res<Session>, mut mole: Query<(&mut Transform, &mut Visibility), With<MoleSprite>>) {
    let Ok((mut transform, mut visibility)) = mole.get_single_mut() else {
        return;
    };
    let tuning = &session.ctx.tuning().harvest;
    let shown = matches!(
        session.machine.phase(),
        HarvestPhase::ReadyToHarvest | HarvestPhase::Harvesting
    );
    if !shown {
        *visibility = Visibility::Hidden;
        return;
    }
    let position = session.machine.mole_position(tuning);
    transform.translation = sprite_center(position, tuning.mole_width, tuning.mole_height, 1.0);
    *visibility = Visibility::Visible;
}

pub fn refresh_items(
    mut commands: Commands,
    session: Res<Session>,
    mut sprites: Query<(Entity, &ItemSprite, &mut Transform)>,
) {
    let tuning = &session.ctx.tuning().harvest;
    let catalog = session.ctx.catalog();
    let items = session.machine.positioned_items();
    let size = tuning.item_width;

    let mut present = vec![false; items.len()];
    for (entity, sprite, mut transform) in &mut sprites {
        match items.get(sprite.index) {
            Some(item) => {
                transform.translation = sprite_center(item.position, size, size, 3.0);
                present[sprite.index] = true;
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (index, item) in items.iter().enumerate() {
        if present[index] {
            continue;
        }
        let color = match catalog.find(&item.id).and_then(|def| def.tier()) {
            Some(RarityTier::FlatRare) => RARE_ITEM_COLOR,
            Some(RarityTier::CommonSpecial) => SPECIAL_ITEM_COLOR,
            _ => FALLBACK_ITEM_COLOR,
        };
        commands.spawn((
            Name::new(format!("Item{index}")),
            ItemSprite { index },
            Sprite::from_color(color, Vec2::splat(size)),
            Transform::from_translation(sprite_center(item.position, size, size, 3.0)),
        ));
    }
}

fn affordable_mark(economy: &UpgradeEconomy, kind: UpgradeKind) -> &'static str {
    if economy.can_afford(kind) { "*" } else { "" }
}

pub fn refresh_hud(session: Res<Session>, mut hud_query: Query<&mut Text, With<HudText>>) {
    let Ok(mut hud) = hud_query.get_single_mut() else {
        return;
    };
    let economy = session.ctx.economy();

    let pending_line = session
        .pending
        .as_ref()
        .map(|pending| format!("Harvest ready: {} points (Enter claim, D double)", pending.base_points()))
        .unwrap_or_else(|| format!("Phase: {:?}", session.machine.phase()));
    let save_line = session
        .ctx
        .last_persist_error()
        .map(|msg| format!("Save: {msg}"))
        .unwrap_or_else(|| "Save: OK (F5 save code)".to_string());

    *hud = Text::new(format!(
        "Points: {}  Collected: {}%\n[1]{} Harvest {} (cost {})  [2]{} Tool lv {} (cost {})  [3]{} Tools {} (cost {})\n{}\n{}\n{}\n{}",
        economy.point_balance(),
        session.ctx.completion_percent(),
        affordable_mark(economy, UpgradeKind::Harvest),
        economy.harvest_yield_base(),
        economy.harvest_upgrade_cost(),
        affordable_mark(economy, UpgradeKind::ToolLevel),
        economy.tool_level(),
        economy.tool_level_upgrade_cost(),
        affordable_mark(economy, UpgradeKind::ToolUnlock),
        economy.active_tool_count(),
        economy.tool_unlock_cost(),
        pending_line,
        session.offers.notice.as_deref().unwrap_or(""),
        session.last_summary.as_deref().unwrap_or(""),
        save_line,
    ));
}
