//! Adapter exposing a player entity to the glide controller.

use crate::glide::{GlideAgent, MovementMode};
use crate::player::{Player, PLAYER_HEIGHT};
use crate::world::World;
use bevy::prelude::*;

/// Borrowed view of one player entity plus the world it moves through.
///
/// The ground probe is mounted at the player's feet, so distances are
/// measured from `position() - PLAYER_HEIGHT` on the Y axis.
pub struct CharacterAgent<'a> {
    pub transform: &'a mut Transform,
    pub player: &'a mut Player,
    pub world: &'a World,
}

impl GlideAgent for CharacterAgent<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn set_movement_mode(&mut self, mode: MovementMode) {
        if mode == MovementMode::Flying {
            self.player.velocity.y = 0.0;
            self.player.on_ground = false;
        }
        self.player.mode = mode;
    }

    fn is_falling(&self) -> bool {
        self.player.is_falling()
    }

    fn ground_distance(&self, origin: Vec3, max_range: f32) -> Option<f32> {
        self.world.ground_distance(origin - Vec3::Y * PLAYER_HEIGHT, max_range)
    }

    fn jump(&mut self) {
        self.player.jump_requested = true;
    }

    fn stop_jumping(&mut self) {
        self.player.jump_requested = false;
    }
}
