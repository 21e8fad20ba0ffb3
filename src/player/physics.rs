//! Player physics: gravity, jumping, and ground detection.
//!
//! Applies gravity each frame, performs a pending jump, and runs the ground
//! collision check that maintains `on_ground` and corrects vertical position.
//! Flying players are left alone; their height belongs to the glide controller.

use crate::glide::MovementMode;
use crate::player::Player;
use crate::settings::Settings;
use crate::world::{floor_to_i32, World};
use bevy::prelude::*;

pub const GRAVITY: f32 = -32.0;
pub const TERMINAL_VELOCITY: f32 = -50.0;
/// Eye height above the feet.
pub const PLAYER_HEIGHT: f32 = 1.7;
/// Half-width of the collision footprint.
pub const PLAYER_RADIUS: f32 = 0.35;

/// Step the vertical player physics for one frame.
///
/// Shared by the `player_physics` system and the benchmarks.
pub fn physics_step(tf: &mut Transform, player: &mut Player, world: &World, dt: f32, jump_velocity: f32) {
    if player.mode == MovementMode::Flying {
        player.velocity.y = 0.0;
        player.on_ground = false;
        return;
    }

    player.velocity.y = (player.velocity.y + GRAVITY * dt).max(TERMINAL_VELOCITY);

    if player.jump_requested && player.on_ground {
        player.velocity.y = jump_velocity;
        player.on_ground = false;
        player.jump_requested = false;
    }

    let new_y = tf.translation.y + player.velocity.y * dt;
    let feet_y = new_y - PLAYER_HEIGHT;
    let pr = PLAYER_RADIUS - 0.05;
    let mut gnd = false;
    for dx in [-pr, pr] {
        for dz in [-pr, pr] {
            if world.is_solid(
                floor_to_i32(tf.translation.x + dx),
                floor_to_i32(feet_y),
                floor_to_i32(tf.translation.z + dz),
            ) {
                gnd = true;
            }
        }
    }

    if gnd && player.velocity.y < 0.0 {
        tf.translation.y = feet_y.floor() + 1.0 + PLAYER_HEIGHT;
        player.velocity.y = 0.0;
        player.on_ground = true;
    } else {
        tf.translation.y = new_y;
        if player.velocity.y < 0.0 {
            player.on_ground = false;
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn player_physics(
    time: Res<Time>,
    world: Res<World>,
    settings: Res<Settings>,
    mut q: Query<(&mut Transform, &mut Player)>,
) {
    for (mut tf, mut player) in &mut q {
        physics_step(&mut tf, &mut player, &world, time.delta_seconds(), settings.movement.jump_velocity);
    }
}
