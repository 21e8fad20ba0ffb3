//! Input bindings and dispatch.
//!
//! Input is handled in two steps. `collect_player_input` reads device state
//! (keyboard through the `InputBindings` table, mouse motion, gamepad sticks,
//! touches) and emits `PlayerInput` events. `dispatch_player_input` routes
//! each event to its handler: jump press/release go to the glide controller,
//! everything else to the host movement and look primitives.
//!
//! # Example:
//!
//! ```ignore
//! let bindings = InputBindings::from_controls(&settings.controls)?;
//! app.insert_resource(bindings)
//!     .add_event::<PlayerInput>()
//!     .add_systems(Update, (collect_player_input, dispatch_player_input).chain());
//! ```

use crate::glide::{GlideAgent, GlideState};
use crate::player::{CharacterAgent, Player, PlayerLook};
use crate::settings::{ControlsSettings, Settings};
use crate::world::World;
use bevy::input::gamepad::{GamepadAxis, GamepadAxisType, Gamepads};
use bevy::input::mouse::MouseMotion;
use bevy::input::touch::Touches;
use bevy::log::{debug, warn};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use thiserror::Error;

/// Problems found while building the binding table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("no key bound for required action `{0}`")]
    MissingAction(&'static str),
    #[error("action `{action}` is bound to unknown key `{key}`")]
    UnknownKey { action: String, key: String },
}

/// One frame's worth of player intent.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    JumpPressed,
    JumpReleased,
    /// Forward (+) / backward (-) axis.
    MoveForward(f32),
    /// Right (+) / left (-) axis.
    MoveRight(f32),
    /// Absolute horizontal look delta (mouse pixels, + is right).
    Turn(f32),
    /// Normalized horizontal look rate (gamepad, + is right).
    TurnAtRate(f32),
    /// Absolute vertical look delta (mouse pixels, + is down).
    LookUp(f32),
    /// Normalized vertical look rate (gamepad, + is up).
    LookUpAtRate(f32),
    TouchStarted { finger: u64, position: Vec2 },
    TouchStopped { finger: u64, position: Vec2 },
}

/// Keyboard binding table, built once from `controls.keybinds`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct InputBindings {
    pub jump: KeyCode,
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub pause: KeyCode,
}

impl InputBindings {
    /// Actions that must be present in the keybind map.
    pub const REQUIRED: [&'static str; 5] = ["jump", "forward", "back", "left", "right"];

    /// Build the binding table from the controls section of the settings.
    ///
    /// # Errors
    /// Returns `BindingError::MissingAction` if a required action has no key,
    /// and `BindingError::UnknownKey` if any action names a key that
    /// `Settings::keycode_from_str` does not recognise.
    pub fn from_controls(controls: &ControlsSettings) -> Result<Self, BindingError> {
        let lookup = |action: &'static str| -> Result<Option<KeyCode>, BindingError> {
            let Some(key) = controls.keybinds.get(action) else {
                return Ok(None);
            };
            Settings::keycode_from_str(key).map(Some).ok_or_else(|| BindingError::UnknownKey {
                action: action.to_string(),
                key: key.clone(),
            })
        };
        let required = |action: &'static str| lookup(action)?.ok_or(BindingError::MissingAction(action));

        for action in controls.keybinds.keys() {
            if !Self::REQUIRED.iter().any(|r| *r == action.as_str()) && action != "pause" {
                debug!("ignoring keybind for unknown action `{action}`");
            }
        }

        Ok(Self {
            jump: required("jump")?,
            forward: required("forward")?,
            back: required("back")?,
            left: required("left")?,
            right: required("right")?,
            pause: lookup("pause")?.unwrap_or(KeyCode::Escape),
        })
    }
}

/// Zero out stick values inside the deadzone.
#[must_use]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone { 0.0 } else { value }
}

/// Signed axis from a pair of keys.
fn key_axis(keys: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    f32::from(u8::from(keys.pressed(positive))) - f32::from(u8::from(keys.pressed(negative)))
}

/// Turn device state into `PlayerInput` events.
///
/// Mouse look is only forwarded while the cursor is grabbed.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn collect_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    settings: Res<Settings>,
    mut motion: EventReader<MouseMotion>,
    gamepads: Res<Gamepads>,
    axes: Res<Axis<GamepadAxis>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut out: EventWriter<PlayerInput>,
) {
    let controls = &settings.controls;

    if keys.just_pressed(bindings.jump) {
        out.send(PlayerInput::JumpPressed);
    }
    if keys.just_released(bindings.jump) {
        out.send(PlayerInput::JumpReleased);
    }

    let mut forward = key_axis(&keys, bindings.forward, bindings.back);
    let mut right = key_axis(&keys, bindings.right, bindings.left);
    let mut turn_rate = 0.0;
    let mut look_rate = 0.0;
    for gamepad in gamepads.iter() {
        let stick = |axis_type| {
            apply_deadzone(axes.get(GamepadAxis::new(gamepad, axis_type)).unwrap_or(0.0), controls.gamepad_deadzone)
        };
        forward += stick(GamepadAxisType::LeftStickY);
        right += stick(GamepadAxisType::LeftStickX);
        turn_rate += stick(GamepadAxisType::RightStickX);
        look_rate += stick(GamepadAxisType::RightStickY);
    }

    if forward != 0.0 {
        out.send(PlayerInput::MoveForward(forward));
    }
    if right != 0.0 {
        out.send(PlayerInput::MoveRight(right));
    }
    if turn_rate != 0.0 {
        out.send(PlayerInput::TurnAtRate(turn_rate));
    }
    if look_rate != 0.0 {
        out.send(PlayerInput::LookUpAtRate(look_rate));
    }

    let mut delta: Vec2 = motion.read().map(|ev| ev.delta).sum();
    let grabbed = windows.get_single().is_ok_and(|w| !w.cursor.visible);
    if grabbed && delta != Vec2::ZERO {
        if controls.invert_x {
            delta.x = -delta.x;
        }
        if controls.invert_y {
            delta.y = -delta.y;
        }
        out.send(PlayerInput::Turn(delta.x));
        out.send(PlayerInput::LookUp(delta.y));
    }

    for touch in touches.iter_just_pressed() {
        out.send(PlayerInput::TouchStarted { finger: touch.id(), position: touch.position() });
    }
    for touch in touches.iter_just_released() {
        out.send(PlayerInput::TouchStopped { finger: touch.id(), position: touch.position() });
    }
}

/// Route one event to its handler.
pub fn handle_player_input(
    event: PlayerInput,
    glide: &mut GlideState,
    look: &mut PlayerLook,
    agent: &mut CharacterAgent,
    settings: &Settings,
    dt: f32,
) {
    match event {
        PlayerInput::JumpPressed => glide.start_jump(agent),
        PlayerInput::JumpReleased => glide.stop_jump(agent),
        PlayerInput::MoveForward(v) => agent.player.move_input.y += v,
        PlayerInput::MoveRight(v) => agent.player.move_input.x += v,
        PlayerInput::Turn(dx) => look.apply_delta(Vec2::new(dx, 0.0), settings.controls.mouse_sensitivity),
        PlayerInput::LookUp(dy) => look.apply_delta(Vec2::new(0.0, dy), settings.controls.mouse_sensitivity),
        PlayerInput::TurnAtRate(rate) => look.turn_at_rate(rate, glide.turn_rate, dt),
        PlayerInput::LookUpAtRate(rate) => look.look_up_at_rate(rate, glide.turn_rate, dt),
        PlayerInput::TouchStarted { .. } => agent.jump(),
        PlayerInput::TouchStopped { .. } => agent.stop_jumping(),
    }
}

/// Apply this frame's `PlayerInput` events to the player entity.
#[allow(clippy::needless_pass_by_value)]
pub fn dispatch_player_input(
    mut events: EventReader<PlayerInput>,
    time: Res<Time>,
    world: Res<World>,
    settings: Res<Settings>,
    mut q: Query<(&mut Transform, &mut Player, &mut PlayerLook, &mut GlideState)>,
) {
    let Ok((mut tf, mut player, mut look, mut glide)) = q.get_single_mut() else {
        events.clear();
        return;
    };
    let dt = time.delta_seconds();
    let mut agent = CharacterAgent { transform: &mut tf, player: &mut player, world: &world };

    for event in events.read() {
        let was_gliding = glide.is_gliding;
        handle_player_input(*event, &mut glide, &mut look, &mut agent, &settings, dt);
        if glide.is_gliding != was_gliding {
            debug!("{event:?} switched gliding to {}", glide.is_gliding);
        }
    }
}

/// Rebuild the binding table after a settings reload. Invalid bindings keep
/// the previous table.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_input_bindings(settings: Res<Settings>, mut bindings: ResMut<InputBindings>) {
    if !settings.is_changed() {
        return;
    }
    match InputBindings::from_controls(&settings.controls) {
        Ok(new) => {
            if *bindings != new {
                *bindings = new;
            }
        }
        Err(e) => warn!("keeping previous key bindings: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::blocks;

    #[test]
    fn default_controls_bind_every_action() {
        let bindings = InputBindings::from_controls(&ControlsSettings::default()).expect("defaults bind");
        assert_eq!(bindings.jump, KeyCode::Space);
        assert_eq!(bindings.forward, KeyCode::KeyW);
        assert_eq!(bindings.left, KeyCode::KeyA);
        assert_eq!(bindings.pause, KeyCode::Escape);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.insert("jump".into(), "Hyperspace".into());
        assert_eq!(
            InputBindings::from_controls(&controls),
            Err(BindingError::UnknownKey { action: "jump".into(), key: "Hyperspace".into() })
        );
    }

    #[test]
    fn missing_jump_is_rejected() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.remove("jump");
        assert_eq!(InputBindings::from_controls(&controls), Err(BindingError::MissingAction("jump")));
    }

    #[test]
    fn pause_is_optional() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.remove("pause");
        controls.keybinds.insert("dance".into(), "K".into());
        let bindings = InputBindings::from_controls(&controls).expect("binds");
        assert_eq!(bindings.pause, KeyCode::Escape);
    }

    #[test]
    fn deadzone_filters_small_values() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.5, 0.15), -0.5);
    }

    #[test]
    fn events_reach_their_handlers() {
        let mut world = World::new();
        world.set_block(0, 0, 0, blocks::STONE);
        let settings = Settings::default();
        let mut tf = Transform::from_xyz(0.5, 80.0, 0.5);
        let mut player = Player::default();
        let mut look = PlayerLook::default();
        let mut glide = GlideState::default();
        let mut agent = CharacterAgent { transform: &mut tf, player: &mut player, world: &world };

        handle_player_input(PlayerInput::MoveForward(1.0), &mut glide, &mut look, &mut agent, &settings, 0.1);
        handle_player_input(PlayerInput::MoveRight(-0.5), &mut glide, &mut look, &mut agent, &settings, 0.1);
        assert_eq!(agent.player.move_input, Vec2::new(-0.5, 1.0));

        handle_player_input(PlayerInput::TurnAtRate(1.0), &mut glide, &mut look, &mut agent, &settings, 0.1);
        assert!((look.yaw + (glide.turn_rate * 0.1).to_radians()).abs() < 1e-6);

        // airborne: jump toggles glide instead of jumping
        handle_player_input(PlayerInput::JumpPressed, &mut glide, &mut look, &mut agent, &settings, 0.1);
        assert!(glide.is_gliding);
        assert!(!agent.player.jump_requested);

        // touch bypasses the glide controller
        handle_player_input(
            PlayerInput::TouchStarted { finger: 0, position: Vec2::ZERO },
            &mut glide, &mut look, &mut agent, &settings, 0.1,
        );
        assert!(agent.player.jump_requested);
        assert!(glide.is_gliding);
        handle_player_input(
            PlayerInput::TouchStopped { finger: 0, position: Vec2::ZERO },
            &mut glide, &mut look, &mut agent, &settings, 0.1,
        );
        assert!(!agent.player.jump_requested);
    }

    fn input_app() -> App {
        let mut world = World::new();
        world.set_block(0, 0, 0, blocks::STONE);
        let mut time = Time::<()>::default();
        time.advance_by(std::time::Duration::from_millis(100));

        let mut app = App::new();
        app.add_event::<PlayerInput>()
            .insert_resource(time)
            .insert_resource(world)
            .insert_resource(Settings::default())
            .insert_resource(InputBindings::from_controls(&ControlsSettings::default()).expect("defaults bind"))
            .add_systems(Update, (sync_input_bindings, dispatch_player_input).chain());
        app
    }

    #[test]
    fn jump_event_starts_glide_on_falling_player() {
        let mut app = input_app();
        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.5, 80.0, 0.5),
                Player::default(),
                PlayerLook::default(),
                GlideState::default(),
            ))
            .id();

        app.world_mut().send_event(PlayerInput::JumpPressed);
        app.update();

        let glide = app.world().get::<GlideState>(player).expect("glide state");
        assert!(glide.is_gliding);
        let body = app.world().get::<Player>(player).expect("player");
        assert_eq!(body.mode, crate::glide::MovementMode::Flying);
        assert!(!body.jump_requested);

        // events are consumed once
        app.update();
        assert!(app.world().get::<GlideState>(player).expect("glide state").is_gliding);
    }

    #[test]
    fn reloaded_bindings_replace_valid_and_keep_invalid() {
        let mut app = input_app();
        app.update();

        app.world_mut()
            .resource_mut::<Settings>()
            .controls
            .keybinds
            .insert("jump".into(), "J".into());
        app.update();
        assert_eq!(app.world().resource::<InputBindings>().jump, KeyCode::KeyJ);

        app.world_mut()
            .resource_mut::<Settings>()
            .controls
            .keybinds
            .insert("jump".into(), "Hyperspace".into());
        app.update();
        assert_eq!(app.world().resource::<InputBindings>().jump, KeyCode::KeyJ);
    }
}
