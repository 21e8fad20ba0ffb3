//! Player-related small systems.
use bevy::prelude::*;

/// Keep the `PlayerFillLight` on the player camera.
///
/// Silently no-ops if there is no player.
#[allow(clippy::needless_pass_by_value)]
pub fn update_player_fill_light(
    camera_query: Query<&GlobalTransform, With<glider::player::Player>>,
    mut lights: Query<&mut Transform, With<crate::PlayerFillLight>>,
) {
    if let Ok(cam) = camera_query.get_single() {
        let pos = cam.translation();
        for mut t in &mut lights {
            t.translation = pos;
        }
    }
}
