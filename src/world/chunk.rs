//! Chunk block storage and terrain generation.

use super::{blocks, BlockId, CHUNK_SIZE, MAX_HEIGHT};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Noise stack used to shape the terrain height field.
pub struct TerrainNoise {
    base: Fbm<Perlin>,
    detail: Perlin,
}

impl TerrainNoise {
    const SEED_HEADROOM: u32 = 16;

    #[must_use]
    pub fn new(seed: u32) -> Self {
        // Fbm seeds octave i with `seed + i`, so keep headroom for its octaves
        let base_seed = seed.min(u32::MAX - Self::SEED_HEADROOM);
        Self {
            base: Fbm::<Perlin>::new(base_seed)
                .set_octaves(4)
                .set_frequency(0.01)
                .set_persistence(0.5),
            detail: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Column height (number of solid blocks) at world `(x, z)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn height_at(&self, x: i32, z: i32) -> usize {
        let xf = f64::from(x);
        let zf = f64::from(z);
        let base = self.base.get([xf, zf]) * 20.0 + 24.0;
        let detail = self.detail.get([xf * 0.1, zf * 0.1]) * 2.0;
        let h = (base + detail).floor();
        if h.is_finite() {
            (h.max(1.0) as usize).min(MAX_HEIGHT - 1)
        } else {
            1
        }
    }
}

impl Default for TerrainNoise {
    fn default() -> Self {
        Self::new(12345)
    }
}

#[derive(Clone)]
pub struct Chunk {
    pub blocks: Vec<BlockId>,
}

impl Chunk {
    /// Create a new chunk filled with `AIR`.
    #[must_use]
    pub fn new() -> Self {
        Chunk {
            blocks: vec![blocks::AIR; CHUNK_SIZE * MAX_HEIGHT * CHUNK_SIZE],
        }
    }

    /// Read a block at local coordinates, `AIR` if out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= CHUNK_SIZE || y >= MAX_HEIGHT || z >= CHUNK_SIZE {
            blocks::AIR
        } else {
            self.blocks[x + y * CHUNK_SIZE + z * CHUNK_SIZE * MAX_HEIGHT]
        }
    }

    /// Write a block at local coordinates; out of bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        if x < CHUNK_SIZE && y < MAX_HEIGHT && z < CHUNK_SIZE {
            self.blocks[x + y * CHUNK_SIZE + z * CHUNK_SIZE * MAX_HEIGHT] = block;
        }
    }

    /// Fill the chunk from the terrain height field: grass on top, a few
    /// layers of dirt, stone below.
    #[allow(clippy::cast_possible_wrap)]
    pub fn generate(&mut self, chunk_x: i32, chunk_z: i32, noise: &TerrainNoise) {
        let size = CHUNK_SIZE as i32;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let wx = chunk_x * size + x as i32;
                let wz = chunk_z * size + z as i32;
                let height = noise.height_at(wx, wz);

                for y in 0..height {
                    let depth_from_surface = height - y;
                    let block = if depth_from_surface == 1 {
                        blocks::GRASS
                    } else if depth_from_surface <= 4 {
                        blocks::DIRT
                    } else {
                        blocks::STONE
                    };
                    self.set(x, y, z, block);
                }
            }
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}
