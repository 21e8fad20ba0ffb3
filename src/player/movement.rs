//! Horizontal player movement with collision detection.
//!
//! Consumes the movement axes gathered into `Player::move_input` this frame,
//! picks a speed from the current locomotion state, and slides along blocks
//! by testing the X and Z moves separately.

use crate::glide::MovementMode;
use crate::player::{Player, PLAYER_HEIGHT, PLAYER_RADIUS};
use crate::settings::{MovementSettings, Settings};
use crate::world::{floor_to_i32, World};
use bevy::prelude::*;

/// Horizontal speed for the player's current state.
#[must_use]
pub fn current_speed(player: &Player, movement: &MovementSettings) -> f32 {
    match player.mode {
        MovementMode::Flying => movement.glide_speed,
        MovementMode::Walking if player.on_ground => movement.walk_speed,
        MovementMode::Walking => movement.walk_speed * movement.air_control,
    }
}

/// Whether a body at eye height `eye_y` fits at horizontal position `(x, z)`.
fn column_clear(world: &World, x: f32, z: f32, eye_y: f32, rising: bool) -> bool {
    // check from slightly higher while rising so jumps clear ledges
    let y_offset = if rising { 0.5 } else { 0.0 };
    let feet_y = floor_to_i32(eye_y - PLAYER_HEIGHT + 0.1 + y_offset);
    let head_y = floor_to_i32(eye_y + y_offset);

    for y in feet_y..=head_y {
        for dx in [-PLAYER_RADIUS, PLAYER_RADIUS] {
            for dz in [-PLAYER_RADIUS, PLAYER_RADIUS] {
                if world.is_solid(floor_to_i32(x + dx), y, floor_to_i32(z + dz)) {
                    return false;
                }
            }
        }
    }
    true
}

/// Apply one frame of horizontal movement and clear the consumed input.
pub fn move_step(tf: &mut Transform, player: &mut Player, world: &World, dt: f32, movement: &MovementSettings) {
    let input = std::mem::take(&mut player.move_input);

    let forward_raw = tf.forward();
    let fwd = Vec3::new(forward_raw.x, 0.0, forward_raw.z).normalize_or_zero();
    let right_raw = tf.right();
    let right = Vec3::new(right_raw.x, 0.0, right_raw.z).normalize_or_zero();

    let dir = fwd * input.y + right * input.x;
    if dir.length_squared() <= 0.0001 {
        return;
    }
    // analog input below full deflection moves slower, keyboard diagonals don't move faster
    let step = dir.clamp_length_max(1.0) * current_speed(player, movement) * dt;

    let pos = tf.translation;
    let rising = player.velocity.y > 0.0;

    if column_clear(world, pos.x + step.x, pos.z, pos.y, rising) {
        tf.translation.x += step.x;
    }
    if column_clear(world, tf.translation.x, pos.z + step.z, pos.y, rising) {
        tf.translation.z += step.z;
    }
}

/// Handle player movement and collisions each frame.
#[allow(clippy::needless_pass_by_value)]
pub fn player_movement(
    world: Res<World>,
    time: Res<Time>,
    settings: Res<Settings>,
    mut query: Query<(&mut Transform, &mut Player)>,
) {
    for (mut tf, mut player) in &mut query {
        move_step(&mut tf, &mut player, &world, time.delta_seconds(), &settings.movement);
    }
}
