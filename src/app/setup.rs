//! Startup scene: terrain, lights and the player.
//!
//! Generates a small area of terrain around the origin, spawns one mesh per
//! chunk, and drops the player high above the spawn column so a glide can be
//! started right away.
use bevy::prelude::*;
use glider::glide::GlideState;
use glider::player::{Player, PlayerLook};
use glider::settings::Settings;
use glider::world::{TerrainNoise, World, CHUNK_SIZE};

/// Height above the terrain the player spawns at.
const SPAWN_ALTITUDE: f32 = 60.0;

/// Generate the world, spawn chunk meshes, lights and the player camera.
#[allow(clippy::needless_pass_by_value, clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    let noise = TerrainNoise::default();
    let world = World::generate_area(&noise, settings.graphics.view_radius.max(0));

    let terrain_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        metallic: 0.0,
        ..default()
    });

    let mut triangles = 0;
    for (&(cx, cz), chunk) in &world.chunks {
        let (mesh, tris) = chunk.build_mesh(&world, (cx, cz));
        triangles += tris;
        let size = CHUNK_SIZE as i32;
        commands.spawn(PbrBundle {
            mesh: meshes.add(mesh),
            material: terrain_material.clone(),
            transform: Transform::from_xyz((cx * size) as f32, 0.0, (cz * size) as f32),
            ..default()
        });
    }
    info!("spawned {} chunks ({triangles} triangles)", world.chunks.len());

    let spawn_y = world.surface_height(0, 0).unwrap_or(32.0) + SPAWN_ALTITUDE;
    commands.insert_resource(world);

    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 8000.0,
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_rotation(Quat::from_euler(
                bevy::math::EulerRot::YXZ,
                0.6,
                -0.9,
                0.0,
            )),
            ..default()
        },
        crate::Sun,
    ));

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(0.5, spawn_y, 0.5),
            ..default()
        },
        Player::default(),
        PlayerLook::default(),
        GlideState::from_config(&settings.glide),
        bevy_atmosphere::prelude::AtmosphereCamera::default(),
    ));

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                intensity: 4000.0,
                range: 60.0,
                color: Color::srgb(0.9, 0.92, 1.0),
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_xyz(0.5, spawn_y, 0.5),
            ..default()
        },
        crate::PlayerFillLight,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
}
