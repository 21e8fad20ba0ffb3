//! Bevy systems driving `GlideState`.

use crate::glide::GlideState;
use crate::player::{CharacterAgent, Player};
use crate::settings::Settings;
use crate::world::World;
use bevy::log::info;
use bevy::prelude::*;

/// Advance every gliding agent by one frame.
#[allow(clippy::needless_pass_by_value)]
pub fn glide_tick(
    time: Res<Time>,
    world: Res<World>,
    settings: Res<Settings>,
    mut q: Query<(Entity, &mut Transform, &mut Player, &mut GlideState)>,
) {
    let dt = time.delta_seconds();
    for (entity, mut tf, mut player, mut glide) in &mut q {
        if !glide.is_gliding {
            continue;
        }
        let mut agent = CharacterAgent { transform: &mut tf, player: &mut player, world: &world };
        glide.tick(&mut agent, dt, &settings.glide);

        if !glide.is_gliding {
            info!(
                "{entity:?} landed from glide at {:.1} above ground",
                glide.distance_to_ground
            );
        }
    }
}

/// Push reloaded glide tuning into existing glide states.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_glide_settings(settings: Res<Settings>, mut q: Query<&mut GlideState>) {
    if !settings.is_changed() {
        return;
    }
    for mut glide in &mut q {
        glide.apply_config(&settings.glide);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glide::MovementMode;
    use crate::world::blocks;
    use std::time::Duration;

    fn glide_app(pillar_height: i32) -> App {
        let mut world = World::new();
        for y in 0..pillar_height {
            world.set_block(0, y, 0, blocks::STONE);
        }
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(100));

        let mut app = App::new();
        app.insert_resource(time)
            .insert_resource(world)
            .insert_resource(Settings::default())
            .add_systems(Update, (sync_glide_settings, glide_tick).chain());
        app
    }

    fn spawn_glider(app: &mut App, y: f32) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_xyz(0.5, y, 0.5),
                Player { mode: MovementMode::Flying, ..Player::default() },
                GlideState { is_gliding: true, ..GlideState::default() },
            ))
            .id()
    }

    #[test]
    fn gliding_player_sinks_each_update() {
        let mut app = glide_app(1);
        let entity = spawn_glider(&mut app, 80.0);

        app.update();
        let y = app.world().get::<Transform>(entity).expect("transform").translation.y;
        let expected = 80.0 - 50.0 * (1.0 - (-0.5f32).exp());
        assert!((y - expected).abs() < 1e-3);
        assert!(app.world().get::<GlideState>(entity).expect("glide").is_gliding);
    }

    #[test]
    fn low_clearance_lands_player() {
        // feet 8.3 above the pillar top
        let mut app = glide_app(10);
        let entity = spawn_glider(&mut app, 20.0);

        app.update();
        let glide = app.world().get::<GlideState>(entity).expect("glide");
        assert!(!glide.is_gliding);
        assert!(glide.can_glide);
        let player = app.world().get::<Player>(entity).expect("player");
        assert_eq!(player.mode, MovementMode::Walking);
    }

    #[test]
    fn reloaded_tuning_reaches_existing_states() {
        let mut app = glide_app(1);
        let entity = spawn_glider(&mut app, 80.0);
        app.update();

        {
            let mut settings = app.world_mut().resource_mut::<Settings>();
            settings.glide.downward_force = 3.0;
            settings.glide.turn_rate = 90.0;
        }
        app.update();

        let glide = app.world().get::<GlideState>(entity).expect("glide");
        assert_eq!(glide.downward_force, 3.0);
        assert_eq!(glide.turn_rate, 90.0);
        assert!(glide.is_gliding);
    }
}
