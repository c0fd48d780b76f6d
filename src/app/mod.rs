mod input;
mod resources;
mod session;
mod setup;
mod state;
mod view;

use bevy::prelude::*;

pub use resources::RuntimeConfig;
pub use setup::build_session;

use resources::{GestureInput, PointerTrack, SessionAction};
use state::ShellPhase;

pub struct HarvestAppPlugin;

impl Plugin for HarvestAppPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ShellPhase>()
            .init_resource::<PointerTrack>()
            .add_event::<GestureInput>()
            .add_event::<SessionAction>()
            .add_systems(Startup, setup::spawn_camera)
            .add_systems(OnEnter(ShellPhase::Loading), setup::spawn_scene)
            .add_systems(
                Update,
                (
                    input::handle_keyboard_controls,
                    input::emit_pointer_gestures,
                    session::apply_session_actions,
                    session::apply_gestures,
                    session::tick_session,
                    session::claim_granted_rewards,
                    view::refresh_tools,
                    view::refresh_mole,
                    view::refresh_items,
                    view::refresh_hud,
                )
                    .chain()
                    .run_if(in_state(ShellPhase::Playing)),
            )
            .add_systems(Last, session::save_on_exit);
    }
}
