//! Look orientation and cursor helpers.
//!
//! `PlayerLook` accumulates yaw/pitch from two kinds of input: absolute
//! deltas (mouse) and normalized rates (gamepad sticks, scaled by the glide
//! state's `turn_rate`). `apply_look` writes the result to the transform and
//! `cursor_grab` toggles cursor lock/visibility.

use crate::input::InputBindings;
use crate::player::Player;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

const CAMERA_MAX_PITCH_DEG: f32 = 85.0;
/// Radians of rotation per pixel of mouse motion at sensitivity 1.0.
const MOUSE_RADIANS_PER_PIXEL: f32 = 0.002;

/// Stores the player's look orientation (yaw and pitch) in radians.
///
/// - `yaw`: horizontal rotation around the Y axis.
/// - `pitch`: vertical rotation around the X axis, clamped to a safe range.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct PlayerLook {
    /// Horizontal angle (radians).
    pub yaw: f32,
    /// Vertical angle (radians).
    pub pitch: f32,
}

impl PlayerLook {
    /// Apply a raw mouse delta in pixels. Positive `x` turns right, positive
    /// `y` looks down.
    pub fn apply_delta(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity * MOUSE_RADIANS_PER_PIXEL;
        self.pitch -= delta.y * sensitivity * MOUSE_RADIANS_PER_PIXEL;
        self.clamp_pitch();
    }

    /// Turn at a normalized rate, where 1.0 means `turn_rate` degrees per
    /// second to the right.
    pub fn turn_at_rate(&mut self, rate: f32, turn_rate: f32, dt: f32) {
        self.yaw -= (rate * turn_rate * dt).to_radians();
    }

    /// Look up at a normalized rate, where 1.0 means `turn_rate` degrees per
    /// second upward.
    pub fn look_up_at_rate(&mut self, rate: f32, turn_rate: f32, dt: f32) {
        self.pitch += (rate * turn_rate * dt).to_radians();
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        let max_pitch = CAMERA_MAX_PITCH_DEG.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(bevy::math::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Write each player's look orientation to its transform.
pub fn apply_look(mut query: Query<(&mut Transform, &PlayerLook), (With<Player>, Changed<PlayerLook>)>) {
    for (mut transform, look) in &mut query {
        transform.rotation = look.rotation();
    }
}

/// Toggle cursor grab and visibility: left click grabs, the pause key
/// releases.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(bindings.pause) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
