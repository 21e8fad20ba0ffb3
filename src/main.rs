use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_atmosphere::prelude::*;
use glider::input::InputBindings;
use glider::settings::loader::{self as settings_loader, SETTINGS_DIR};
use glider::GlidePlugin;

mod app;
use app::{setup, sync_atmosphere_settings, sync_vsync_settings, update_player_fill_light};

#[derive(Component)]
struct Sun;

#[derive(Component)]
struct PlayerFillLight;

fn main() {
    let settings = settings_loader::load_settings_from_dir(SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(SETTINGS_DIR).unwrap_or_else(|e| {
        eprintln!("settings hot reload disabled: {e}");
        settings_loader::SettingsWatcher::stub()
    });

    // the player cannot be driven without a jump binding; refuse to start
    let bindings = match InputBindings::from_controls(&settings.controls) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("invalid key bindings in {SETTINGS_DIR}: {e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "glider".to_string(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoNoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default());

    if settings.atmosphere.enabled {
        app.add_plugins(AtmospherePlugin)
            .insert_resource(AtmosphereModel::default())
            .insert_resource(AtmosphereSettings {
                resolution: settings.atmosphere.resolution,
                dithering: settings.atmosphere.dithering,
                ..Default::default()
            })
            .add_systems(Update, sync_atmosphere_settings);
    }

    app.insert_resource(settings)
        .insert_resource(settings_watcher)
        .insert_resource(bindings)
        .add_plugins(GlidePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, sync_vsync_settings)
        .add_systems(Update, update_player_fill_light.after(glider::GlideSet::Simulate));

    app.run();
}
