use bevy::prelude::*;
use imo_harvest::core::{GestureEvent, UpgradeKind};
use imo_harvest::Point;

use super::resources::{GestureInput, PointerTrack, RuntimeConfig, SessionAction};

pub fn handle_keyboard_controls(keys: Res<ButtonInput<KeyCode>>, mut actions: EventWriter<SessionAction>) {
    if keys.just_pressed(KeyCode::Digit1) {
        actions.send(SessionAction::Purchase(UpgradeKind::Harvest));
    }
    if keys.just_pressed(KeyCode::Digit2) {
        actions.send(SessionAction::Purchase(UpgradeKind::ToolLevel));
    }
    if keys.just_pressed(KeyCode::Digit3) {
        actions.send(SessionAction::Purchase(UpgradeKind::ToolUnlock));
    }
    if keys.just_pressed(KeyCode::KeyD) {
        actions.send(SessionAction::RequestDouble);
    }
    if keys.just_pressed(KeyCode::Enter) {
        actions.send(SessionAction::Claim);
    }
    if keys.just_pressed(KeyCode::F5) {
        actions.send(SessionAction::ExportSaveCode);
    }
}

fn cursor_world_position(
    windows: &Query<&Window>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    let cursor_position = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.get_single().ok()?;
    camera
        .viewport_to_world_2d(camera_transform, cursor_position)
        .ok()
}

fn to_point(world: Vec2) -> Point {
    Point::new(world.x, world.y)
}

/// Turns left-button presses into drag gestures. A release that barely moved
/// from its press position also counts as a tap there.
pub fn emit_pointer_gestures(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    config: Res<RuntimeConfig>,
    mut track: ResMut<PointerTrack>,
    mut gestures: EventWriter<GestureInput>,
) {
    let world = cursor_world_position(&windows, &camera_query);

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(world) = world {
            track.pressed_at = Some(world);
            track.last = Some(world);
            track.travelled = 0.0;
            gestures.send(GestureInput(GestureEvent::DragStart(to_point(world))));
        }
        return;
    }

    if buttons.just_released(MouseButton::Left) {
        let Some(pressed_at) = track.pressed_at.take() else {
            return;
        };
        gestures.send(GestureInput(GestureEvent::DragRelease));
        if track.travelled <= config.tap_slop {
            gestures.send(GestureInput(GestureEvent::Tap(to_point(pressed_at))));
        }
        track.last = None;
        return;
    }

    if buttons.pressed(MouseButton::Left) {
        let (Some(world), Some(last)) = (world, track.last) else {
            return;
        };
        if world == last {
            return;
        }
        track.travelled += world.distance(last);
        track.last = Some(world);
        gestures.send(GestureInput(GestureEvent::DragMove(to_point(world))));
    }
}
