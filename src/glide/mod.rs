//! Gliding ability: the per-agent state machine and its tuning.
//!
//! A `GlideState` lives on the controlled agent and is driven once per frame.
//! It never touches the ECS directly; every effect goes through the
//! `GlideAgent` capability trait, so the same logic runs against a Bevy
//! player entity (`crate::player::CharacterAgent`), a benchmark harness, or a
//! test double.
//!
//! # Example:
//!
//! ```ignore
//! // jump pressed while airborne enters glide
//! state.start_jump(&mut agent);
//! // once per frame
//! state.tick(&mut agent, time.delta_seconds(), &settings.glide);
//! ```

pub mod systems;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub use systems::*;

/// Locomotion model currently governing the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MovementMode {
    /// Ground-based movement with gravity.
    #[default]
    Walking,
    /// No gravity; vertical position is driven by the glide controller.
    Flying,
}

/// Capabilities the glide controller needs from whatever owns the agent.
pub trait GlideAgent {
    /// Current world-space position of the agent.
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn set_movement_mode(&mut self, mode: MovementMode);
    /// True while the agent is airborne under normal (walking) physics.
    fn is_falling(&self) -> bool;
    /// Cast straight down from `origin` and return the distance to the first
    /// obstruction, or `None` if nothing is hit within `max_range`.
    fn ground_distance(&self, origin: Vec3, max_range: f32) -> Option<f32>;
    /// Host jump primitive.
    fn jump(&mut self);
    /// Host "stop jumping" primitive.
    fn stop_jumping(&mut self);
}

/// Glide tuning, stored under `glide` in the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlideConfig {
    #[serde(default = "GlideConfig::default_downward_force")]
    pub downward_force: f32, // Distance below the agent the glide interpolates toward each frame.
    #[serde(default = "GlideConfig::default_turn_rate")]
    pub turn_rate: f32, // Rate-based look speed in degrees per second.
    #[serde(default = "GlideConfig::default_min_ground_clearance")]
    pub min_ground_clearance: f32, // At or below this distance to the ground the glide ends.
    #[serde(default = "GlideConfig::default_interp_speed")]
    pub interp_speed: f32, // Exponential interpolation rate toward the glide target.
    #[serde(default = "GlideConfig::default_probe_range")]
    pub probe_range: f32, // Maximum length of the downward ground probe.
}

impl GlideConfig {
    fn default_downward_force() -> f32 { 50.0 }
    fn default_turn_rate() -> f32 { 50.0 }
    fn default_min_ground_clearance() -> f32 { 20.0 }
    fn default_interp_speed() -> f32 { 5.0 }
    fn default_probe_range() -> f32 { 2000.0 }
}

impl Default for GlideConfig {
    fn default() -> Self {
        Self {
            downward_force: Self::default_downward_force(),
            turn_rate: Self::default_turn_rate(),
            min_ground_clearance: Self::default_min_ground_clearance(),
            interp_speed: Self::default_interp_speed(),
            probe_range: Self::default_probe_range(),
        }
    }
}

/// Per-agent glide state.
///
/// `is_gliding` and the agent's movement mode always move together: every
/// transition that flips one goes through `start_glide`/`stop_glide`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GlideState {
    /// Whether the agent is high enough to enter a glide.
    pub can_glide: bool,
    /// Whether the agent is currently gliding.
    pub is_gliding: bool,
    /// Last probed distance to the ground. Only refreshed while gliding.
    pub distance_to_ground: f32,
    /// Descent parameter, see `GlideConfig::downward_force`.
    pub downward_force: f32,
    /// Look rate scale, see `GlideConfig::turn_rate`.
    pub turn_rate: f32,
}

impl Default for GlideState {
    fn default() -> Self {
        Self::from_config(&GlideConfig::default())
    }
}

impl GlideState {
    #[must_use]
    pub fn from_config(config: &GlideConfig) -> Self {
        Self {
            can_glide: true,
            is_gliding: false,
            distance_to_ground: 0.0,
            downward_force: config.downward_force,
            turn_rate: config.turn_rate,
        }
    }

    /// Copy the tunable fields from `config`, leaving the state flags alone.
    pub fn apply_config(&mut self, config: &GlideConfig) {
        self.downward_force = config.downward_force;
        self.turn_rate = config.turn_rate;
    }

    /// Enter glide if eligible, otherwise leave it.
    pub fn toggle_glide(&mut self, agent: &mut impl GlideAgent) {
        if self.can_glide && !self.is_gliding {
            self.start_glide(agent);
        } else {
            self.stop_glide(agent);
        }
    }

    pub fn start_glide(&mut self, agent: &mut impl GlideAgent) {
        agent.set_movement_mode(MovementMode::Flying);
        self.is_gliding = true;
        debug!("glide started");
    }

    /// Leave glide and re-arm `can_glide`. Safe to call when not gliding.
    pub fn stop_glide(&mut self, agent: &mut impl GlideAgent) {
        if self.is_gliding {
            debug!("glide stopped");
        }
        agent.set_movement_mode(MovementMode::Walking);
        self.is_gliding = false;
        self.can_glide = true;
    }

    /// Jump pressed: toggles glide while airborne, jumps otherwise.
    pub fn start_jump(&mut self, agent: &mut impl GlideAgent) {
        if agent.is_falling() {
            self.toggle_glide(agent);
        } else {
            agent.jump();
        }
    }

    /// Jump released.
    pub fn stop_jump(&mut self, agent: &mut impl GlideAgent) {
        agent.stop_jumping();
    }

    /// Probe the ground below the agent. A probe with no hit reads as
    /// infinitely far away.
    pub fn calculate_distance_to_ground(&mut self, agent: &impl GlideAgent, config: &GlideConfig) {
        self.distance_to_ground = agent
            .ground_distance(agent.position(), config.probe_range)
            .unwrap_or(f32::INFINITY);
    }

    /// Refresh `distance_to_ground` and force a landing once the agent is
    /// within `min_ground_clearance` of the ground.
    pub fn update_distance_to_ground(&mut self, agent: &mut impl GlideAgent, config: &GlideConfig) {
        self.calculate_distance_to_ground(&*agent, config);

        if self.distance_to_ground > config.min_ground_clearance {
            self.can_glide = true;
        } else {
            self.stop_glide(agent);
        }
    }

    /// Move the agent toward a point `downward_force` below it.
    ///
    /// The step uses frame-rate independent exponential smoothing, so the
    /// agent covers `1 - e^(-interp_speed * dt)` of the remaining distance and
    /// never overshoots the target. A zero (or negative) `dt` leaves the
    /// position untouched.
    pub fn update_gliding_position(&self, agent: &mut impl GlideAgent, dt: f32, config: &GlideConfig) {
        if dt <= 0.0 {
            return;
        }
        let current = agent.position();
        let target = current + Vec3::NEG_Y * self.downward_force;
        let t = interp_factor(dt, config.interp_speed);
        agent.set_position(current.lerp(target, t));
    }

    /// Per-frame update. Does nothing unless gliding.
    pub fn tick(&mut self, agent: &mut impl GlideAgent, dt: f32, config: &GlideConfig) {
        if !self.is_gliding {
            return;
        }

        // a landing forced here still takes this frame's step
        self.update_distance_to_ground(agent, config);
        self.update_gliding_position(agent, dt, config);
    }
}

/// Fraction of the remaining distance covered in `dt` seconds at `speed`.
#[must_use]
pub fn interp_factor(dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return 1.0;
    }
    (1.0 - (-speed * dt).exp()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Agent double with a fixed ground distance.
    struct TestAgent {
        position: Vec3,
        mode: MovementMode,
        falling: bool,
        ground: Option<f32>,
        jumps: u32,
        jump_held: bool,
        probes: Cell<u32>,
    }

    impl TestAgent {
        fn airborne(ground: Option<f32>) -> Self {
            Self {
                position: Vec3::new(0.0, 100.0, 0.0),
                mode: MovementMode::Walking,
                falling: true,
                ground,
                jumps: 0,
                jump_held: false,
                probes: Cell::new(0),
            }
        }
    }

    impl GlideAgent for TestAgent {
        fn position(&self) -> Vec3 { self.position }
        fn set_position(&mut self, position: Vec3) { self.position = position; }
        fn set_movement_mode(&mut self, mode: MovementMode) { self.mode = mode; }
        fn is_falling(&self) -> bool { self.falling }
        fn ground_distance(&self, _origin: Vec3, _max_range: f32) -> Option<f32> {
            self.probes.set(self.probes.get() + 1);
            self.ground
        }
        fn jump(&mut self) {
            self.jumps += 1;
            self.jump_held = true;
        }
        fn stop_jumping(&mut self) { self.jump_held = false; }
    }

    #[test]
    fn new_state_is_armed_and_walking() {
        let state = GlideState::default();
        assert!(state.can_glide);
        assert!(!state.is_gliding);
        assert_eq!(state.downward_force, 50.0);
        assert_eq!(state.turn_rate, 50.0);
    }

    #[test]
    fn toggle_twice_restores_mode() {
        let mut agent = TestAgent::airborne(Some(100.0));
        let mut state = GlideState::default();

        state.toggle_glide(&mut agent);
        assert!(state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Flying);

        state.toggle_glide(&mut agent);
        assert!(!state.is_gliding);
        assert!(state.can_glide);
        assert_eq!(agent.mode, MovementMode::Walking);
    }

    #[test]
    fn start_glide_is_idempotent() {
        let mut agent = TestAgent::airborne(Some(100.0));
        let mut state = GlideState::default();
        state.start_glide(&mut agent);
        state.start_glide(&mut agent);
        assert!(state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Flying);
    }

    #[test]
    fn toggle_without_eligibility_stops() {
        let mut agent = TestAgent::airborne(Some(100.0));
        let mut state = GlideState { can_glide: false, ..GlideState::default() };

        state.toggle_glide(&mut agent);
        assert!(!state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Walking);
        assert!(state.can_glide);
    }

    #[test]
    fn high_clearance_keeps_glide_eligible() {
        let mut agent = TestAgent::airborne(Some(25.0));
        let mut state = GlideState { can_glide: false, ..GlideState::default() };
        state.start_glide(&mut agent);

        state.update_distance_to_ground(&mut agent, &GlideConfig::default());
        assert_eq!(state.distance_to_ground, 25.0);
        assert!(state.can_glide);
        assert!(state.is_gliding);
    }

    #[test]
    fn low_clearance_forces_landing() {
        let mut agent = TestAgent::airborne(Some(10.0));
        let mut state = GlideState::default();
        state.start_glide(&mut agent);

        state.update_distance_to_ground(&mut agent, &GlideConfig::default());
        assert!(!state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Walking);
    }

    #[test]
    fn clearance_exactly_at_threshold_lands() {
        let mut agent = TestAgent::airborne(Some(20.0));
        let mut state = GlideState::default();
        state.start_glide(&mut agent);

        state.update_distance_to_ground(&mut agent, &GlideConfig::default());
        assert!(!state.is_gliding);
    }

    #[test]
    fn missing_ground_hit_keeps_gliding() {
        let mut agent = TestAgent::airborne(None);
        let mut state = GlideState::default();
        state.start_glide(&mut agent);

        state.update_distance_to_ground(&mut agent, &GlideConfig::default());
        assert!(state.distance_to_ground.is_infinite());
        assert!(state.is_gliding);
        assert!(state.can_glide);
    }

    #[test]
    fn zero_dt_leaves_position() {
        let mut agent = TestAgent::airborne(Some(100.0));
        let state = GlideState::default();
        let before = agent.position;
        state.update_gliding_position(&mut agent, 0.0, &GlideConfig::default());
        assert_eq!(agent.position, before);
    }

    #[test]
    fn glide_step_moves_down_without_overshoot() {
        let config = GlideConfig::default();
        let state = GlideState::default();
        for dt in [1.0 / 240.0, 1.0 / 60.0, 0.1, 1.0, 5.0] {
            let mut agent = TestAgent::airborne(Some(100.0));
            let start = agent.position;
            let target = start - Vec3::Y * state.downward_force;

            state.update_gliding_position(&mut agent, dt, &config);

            let moved = agent.position;
            assert_eq!(moved.x, start.x);
            assert_eq!(moved.z, start.z);
            assert!(moved.y < start.y, "dt={dt} did not move");
            assert!(moved.y >= target.y, "dt={dt} overshot");
        }
    }

    #[test]
    fn glide_step_matches_exponential_factor() {
        let config = GlideConfig::default();
        let state = GlideState::default();
        let mut agent = TestAgent::airborne(Some(100.0));
        let dt = 0.1;

        state.update_gliding_position(&mut agent, dt, &config);

        let expected = 100.0 - 50.0 * (1.0 - (-0.5f32).exp());
        assert!((agent.position.y - expected).abs() < 1e-4);
    }

    #[test]
    fn interp_factor_stays_in_unit_range() {
        assert_eq!(interp_factor(0.0, 5.0), 0.0);
        let f = interp_factor(1.0 / 60.0, 5.0);
        assert!(f > 0.0 && f < 1.0);
        assert!(interp_factor(1000.0, 5.0) <= 1.0);
        assert_eq!(interp_factor(0.5, 0.0), 1.0);
    }

    #[test]
    fn jump_on_ground_delegates_to_host() {
        let mut agent = TestAgent::airborne(Some(0.0));
        agent.falling = false;
        let mut state = GlideState::default();

        state.start_jump(&mut agent);
        assert_eq!(agent.jumps, 1);
        assert!(agent.jump_held);
        assert!(!state.is_gliding);

        state.stop_jump(&mut agent);
        assert!(!agent.jump_held);
    }

    #[test]
    fn tick_is_inert_while_walking() {
        let mut agent = TestAgent::airborne(Some(5.0));
        let mut state = GlideState::default();
        state.distance_to_ground = 123.0;
        state.tick(&mut agent, 1.0 / 60.0, &GlideConfig::default());
        assert_eq!(state.distance_to_ground, 123.0);
        assert_eq!(agent.position.y, 100.0);
        assert_eq!(agent.probes.get(), 0);
    }

    #[test]
    fn landing_tick_still_steps_down() {
        let mut agent = TestAgent::airborne(Some(15.0));
        let mut state = GlideState::default();
        state.start_glide(&mut agent);

        state.tick(&mut agent, 0.1, &GlideConfig::default());
        assert!(!state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Walking);
        let expected = 100.0 - 50.0 * (1.0 - (-0.5f32).exp());
        assert!((agent.position.y - expected).abs() < 1e-3);
        assert!((agent.position.y - 80.33).abs() < 0.01);

        // the next tick is inert
        let y = agent.position.y;
        state.tick(&mut agent, 0.1, &GlideConfig::default());
        assert_eq!(agent.position.y, y);
    }

    #[test]
    fn falling_jump_glides_then_lands() {
        let config = GlideConfig::default();
        let mut agent = TestAgent::airborne(Some(80.0));
        let mut state = GlideState::default();

        state.start_jump(&mut agent);
        assert!(state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Flying);
        assert_eq!(agent.jumps, 0);

        state.tick(&mut agent, 1.0 / 60.0, &config);
        assert!(state.is_gliding);
        assert!(agent.position.y < 100.0);

        agent.ground = Some(15.0);
        state.tick(&mut agent, 1.0 / 60.0, &config);
        assert!(!state.is_gliding);
        assert_eq!(agent.mode, MovementMode::Walking);
        assert!(state.can_glide);
    }

    #[test]
    fn apply_config_keeps_flags() {
        let mut agent = TestAgent::airborne(Some(80.0));
        let mut state = GlideState::default();
        state.start_glide(&mut agent);

        let config = GlideConfig { downward_force: 3.0, turn_rate: 90.0, ..GlideConfig::default() };
        state.apply_config(&config);
        assert!(state.is_gliding);
        assert_eq!(state.downward_force, 3.0);
        assert_eq!(state.turn_rate, 90.0);
    }
}
