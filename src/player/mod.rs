//! Player components and systems (look, movement, physics).
//!
//! The module provides the `Player` component, the `CharacterAgent` adapter
//! that exposes a player entity to the glide controller, and re-exports for
//! the player-related systems.
//!
//! # Example:
//!
//! ```ignore
//! // spawn an entity with camera, player state and glide state
//! commands.spawn((
//!     Camera3dBundle::default(),
//!     Player::default(),
//!     PlayerLook::default(),
//!     GlideState::from_config(&settings.glide),
//! ));
//! ```
pub mod agent;
pub mod camera;
pub mod movement;
pub mod physics;

use crate::glide::MovementMode;
use bevy::prelude::*;

pub use agent::*;
pub use camera::*;
pub use movement::*;
pub use physics::*;

/// Component tracking player state used by movement and physics systems.
#[derive(Component, Debug, Default, Clone)]
pub struct Player {
    /// Current player velocity in world units per second.
    pub velocity: Vec3,
    /// Whether the player is currently considered on the ground.
    pub on_ground: bool,
    /// Locomotion model; `Flying` disables gravity.
    pub mode: MovementMode,
    /// Set while the jump action is held; consumed by a successful jump.
    pub jump_requested: bool,
    /// Movement axes gathered this frame: `x` is right, `y` is forward.
    pub move_input: Vec2,
}

impl Player {
    /// Airborne under walking physics.
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.mode == MovementMode::Walking && !self.on_ground
    }
}
