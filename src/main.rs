mod app;

use anyhow::Result;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window};

fn main() -> Result<()> {
    let config = app::RuntimeConfig::from_env();
    let session = app::build_session(&config)?;

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.36, 0.88, 0.9)))
        .insert_resource(config)
        .insert_resource(session)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Imo Harvest".to_string(),
                resolution: (540.0, 960.0).into(),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(app::HarvestAppPlugin)
        .run();

    Ok(())
}
