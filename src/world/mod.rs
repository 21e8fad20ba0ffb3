//! World storage, block access and the downward ground probe.
//!
//! This module provides the `World` resource which manages loaded chunks
//! (a `HashMap<(chunk_x, chunk_z), Chunk>`). Besides block reads and writes
//! it answers the one scene query the glide controller needs: how far the
//! first solid block lies straight below a point.
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec3;
//! use glider::world::{blocks, World};
//!
//! let mut world = World::new();
//! world.set_block(10, 39, -5, blocks::STONE);
//! assert_eq!(world.get_block(10, 39, -5), blocks::STONE);
//! // clearance below a point, `None` if nothing within 2000 units
//! assert_eq!(world.ground_distance(Vec3::new(10.5, 80.0, -4.5), 2000.0), Some(40.0));
//! ```

pub mod chunk;
pub mod mesh;

pub use chunk::{Chunk, TerrainNoise};

use bevy::prelude::*;
use std::collections::HashMap;

/// Compact block identifier stored in chunks.
pub type BlockId = u8;

/// Block ids known to the terrain generator and mesher.
pub mod blocks {
    use super::BlockId;

    /// Empty space.
    pub const AIR: BlockId = 0;
    pub const GRASS: BlockId = 1;
    pub const DIRT: BlockId = 2;
    pub const STONE: BlockId = 3;
}

/// Horizontal size of a chunk in blocks.
pub const CHUNK_SIZE: usize = 32;

/// Maximum world build height (exclusive upper bound).
pub const MAX_HEIGHT: usize = 128;

/// Floor a float to an `i32`, saturating at the `i32` range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn floor_to_i32(v: f32) -> i32 {
    let f = f64::from(v).floor();
    f.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// The `World` resource holds loaded chunks keyed by `(chunk_x, chunk_z)`.
#[derive(Resource, Default)]
pub struct World {
    pub chunks: HashMap<(i32, i32), Chunk>,
}

impl World {
    /// Create an empty `World` with no loaded chunks.
    #[must_use]
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Generate every chunk within `radius` chunks of the origin.
    #[must_use]
    pub fn generate_area(noise: &TerrainNoise, radius: i32) -> Self {
        let mut world = World::new();
        for cx in -radius..=radius {
            for cz in -radius..=radius {
                let mut c = Chunk::new();
                c.generate(cx, cz, noise);
                world.chunks.insert((cx, cz), c);
            }
        }
        world
    }

    /// Split world coordinates into chunk key and local indices.
    /// Returns `None` when `y` is outside `[0, MAX_HEIGHT)`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn locate(x: i32, y: i32, z: i32) -> Option<((i32, i32), usize, usize, usize)> {
        if y < 0 || y >= MAX_HEIGHT as i32 {
            return None;
        }
        let size = CHUNK_SIZE as i32;
        let key = (x.div_euclid(size), z.div_euclid(size));
        Some((
            key,
            x.rem_euclid(size) as usize,
            y as usize,
            z.rem_euclid(size) as usize,
        ))
    }

    /// Get the block id at world coordinates, `AIR` if out of bounds or
    /// the chunk is not loaded.
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        let Some((key, lx, ly, lz)) = Self::locate(x, y, z) else {
            return blocks::AIR;
        };
        self.chunks.get(&key).map_or(blocks::AIR, |c| c.get(lx, ly, lz))
    }

    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z) != blocks::AIR
    }

    /// Set a block at world coordinates, inserting an empty chunk if needed.
    ///
    /// # Return
    /// * `Option<(i32, i32)>` - the modified chunk key, or `None` if `y` is
    ///   outside the world height
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> Option<(i32, i32)> {
        let (key, lx, ly, lz) = Self::locate(x, y, z)?;
        self.chunks
            .entry(key)
            .or_insert_with(Chunk::new)
            .set(lx, ly, lz, block);
        Some(key)
    }

    /// World-space y of the top face of the highest solid block in column
    /// `(x, z)`, if any.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    pub fn surface_height(&self, x: i32, z: i32) -> Option<f32> {
        (0..MAX_HEIGHT as i32)
            .rev()
            .find(|&y| self.is_solid(x, y, z))
            .map(|y| (y + 1) as f32)
    }

    /// Cast a ray straight down from `origin` and return the distance to the
    /// top of the first solid block, or `None` when nothing is hit within
    /// `max_range`. An origin embedded in a block reports `0.0`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    pub fn ground_distance(&self, origin: Vec3, max_range: f32) -> Option<f32> {
        if !origin.is_finite() || max_range.is_nan() || max_range <= 0.0 {
            return None;
        }

        let x = floor_to_i32(origin.x);
        let z = floor_to_i32(origin.z);
        let top = floor_to_i32(origin.y).min(MAX_HEIGHT as i32 - 1);
        let bottom = floor_to_i32(origin.y - max_range).max(0);

        for y in (bottom..=top).rev() {
            if self.is_solid(x, y, z) {
                let distance = (origin.y - (y + 1) as f32).max(0.0);
                return (distance <= max_range).then_some(distance);
            }
        }
        None
    }
}
