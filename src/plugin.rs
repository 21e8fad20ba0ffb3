//! `GlidePlugin`: wires settings reload, input, player and glide systems.
//!
//! The app must provide `Settings`, `InputBindings` and `World` resources
//! before the first `Update`. A stub `SettingsWatcher` is inserted when none
//! is present, which disables hot reload.

use crate::glide::{glide_tick, sync_glide_settings};
use crate::input::{collect_player_input, dispatch_player_input, sync_input_bindings, PlayerInput};
use crate::player::{apply_look, cursor_grab, player_movement, player_physics};
use crate::settings::loader::{check_settings_changes, SettingsWatcher};
use bevy::prelude::*;

/// System sets, in the order they run each frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlideSet {
    /// Settings reload and propagation.
    Config,
    /// Device state to `PlayerInput` events to handlers.
    Input,
    /// Movement, gravity, glide tick, camera orientation.
    Simulate,
}

pub struct GlidePlugin;

impl Plugin for GlidePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SettingsWatcher>() {
            app.insert_resource(SettingsWatcher::stub());
        }

        app.add_event::<PlayerInput>()
            .configure_sets(Update, (GlideSet::Config, GlideSet::Input, GlideSet::Simulate).chain())
            .add_systems(
                Update,
                (check_settings_changes, (sync_glide_settings, sync_input_bindings))
                    .chain()
                    .in_set(GlideSet::Config),
            )
            .add_systems(
                Update,
                (collect_player_input, dispatch_player_input)
                    .chain()
                    .in_set(GlideSet::Input),
            )
            .add_systems(
                Update,
                (player_movement, player_physics, glide_tick, apply_look)
                    .chain()
                    .in_set(GlideSet::Simulate),
            )
            .add_systems(Update, cursor_grab);
    }
}
