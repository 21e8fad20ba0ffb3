//! Face-culling mesher for `Chunk`.
//!
//! Emits one quad per block face that borders air. Neighbour lookups go
//! through the `World`, so faces on chunk borders are culled against the
//! adjacent chunk when it is loaded. Bottom faces of the lowest layer are
//! never visible and are skipped.

use super::{blocks, BlockId, Chunk, World, CHUNK_SIZE, MAX_HEIGHT};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

// (offset to neighbour, normal, corners with counter-clockwise winding)
const FACES: [([i32; 3], [f32; 3], [[f32; 3]; 4]); 6] = [
    ([1, 0, 0], [1.0, 0.0, 0.0], [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]]),
    ([-1, 0, 0], [-1.0, 0.0, 0.0], [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
    ([0, 1, 0], [0.0, 1.0, 0.0], [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]]),
    ([0, -1, 0], [0.0, -1.0, 0.0], [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
    ([0, 0, 1], [0.0, 0.0, 1.0], [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]),
    ([0, 0, -1], [0.0, 0.0, -1.0], [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
];

/// Vertex colour for a block id.
fn block_color(block: BlockId) -> [f32; 4] {
    match block {
        blocks::GRASS => [0.32, 0.62, 0.25, 1.0],
        blocks::DIRT => [0.47, 0.33, 0.20, 1.0],
        blocks::STONE => [0.50, 0.50, 0.52, 1.0],
        _ => [1.0, 0.0, 1.0, 1.0],
    }
}

impl Chunk {
    /// Build a renderable mesh for the chunk at `chunk_coords`.
    ///
    /// Vertex positions are local to the chunk origin; spawn the mesh with a
    /// transform at `chunk_coords * CHUNK_SIZE`.
    ///
    /// # Return
    /// * `(Mesh, usize)` - the constructed mesh and its triangle count
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn build_mesh(&self, world: &World, chunk_coords: (i32, i32)) -> (Mesh, usize) {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut colors: Vec<[f32; 4]> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        let size = CHUNK_SIZE as i32;
        let (base_x, base_z) = (chunk_coords.0 * size, chunk_coords.1 * size);

        for y in 0..MAX_HEIGHT {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let block = self.get(x, y, z);
                    if block == blocks::AIR {
                        continue;
                    }
                    let (wx, wy, wz) = (base_x + x as i32, y as i32, base_z + z as i32);

                    for (offset, normal, corners) in &FACES {
                        if wy == 0 && offset[1] < 0 {
                            continue;
                        }
                        if world.is_solid(wx + offset[0], wy + offset[1], wz + offset[2]) {
                            continue;
                        }

                        let start = positions.len() as u32;
                        for c in corners {
                            positions.push([x as f32 + c[0], y as f32 + c[1], z as f32 + c[2]]);
                            normals.push(*normal);
                            colors.push(block_color(block));
                        }
                        indices.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
                    }
                }
            }
        }

        let triangle_count = indices.len() / 3;
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
        mesh.insert_indices(Indices::U32(indices));
        (mesh, triangle_count)
    }
}
