//! # Demo Scene
//!
//! A small hand-built world used by [`crate::run`]: a 3x3 patch of chunks with a
//! hardcoded sloped heightmap and a brick pillar in the middle chunk.

use crate::error::VoxelResult;
use crate::voxels::chunk::CHUNK_SIZE;
use crate::voxels::chunk_manager::ChunkManager;
use crate::voxels::position::ChunkPosition;
use crate::voxels::voxel::voxel_type::VoxelType;
use crate::voxels::voxel::Voxel;

/// Chunk-grid radius of the scene around the origin along X and Z.
pub const DEMO_RADIUS: i32 = 1;

/// Base terrain height in voxels.
const BASE_HEIGHT: i32 = 8;
/// Number of distinct heights the diagonal slope cycles through.
const HEIGHT_VARIATION: i32 = 8;
/// Dirt layers between the grass surface and the stone below.
const DIRT_DEPTH: i32 = 3;

/// Terrain column height at a global (x, z).
pub fn column_height(world_x: i32, world_z: i32) -> i32 {
    BASE_HEIGHT + (world_x + world_z).rem_euclid(HEIGHT_VARIATION)
}

/// Material of a terrain voxel at height `y` in a column of `height` voxels.
fn terrain_type(y: i32, height: i32) -> VoxelType {
    if y == height - 1 {
        VoxelType::GRASS
    } else if y >= height - 1 - DIRT_DEPTH {
        VoxelType::DIRT
    } else {
        VoxelType::STONE
    }
}

/// Populates `manager` with the demo scene.
///
/// # Returns
/// The positions of the chunks that make up the scene.
pub fn build_demo_scene(manager: &ChunkManager) -> VoxelResult<Vec<ChunkPosition>> {
    let mut positions = Vec::new();

    for cx in -DEMO_RADIUS..=DEMO_RADIUS {
        for cz in -DEMO_RADIUS..=DEMO_RADIUS {
            let position = ChunkPosition::new(cx, 0, cz);
            let chunk = manager.create_chunk(position);
            let origin = chunk.world_origin();

            for x in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    let height = column_height(origin.x + x, origin.z + z).min(CHUNK_SIZE);
                    for y in 0..height {
                        chunk.set_voxel(x, y, z, Voxel::new(terrain_type(y, height)));
                    }
                }
            }

            positions.push(position);
        }
    }

    let center = manager.get_chunk(ChunkPosition::new(0, 0, 0))?;
    for y in 10..20 {
        center.set_voxel(16, y, 16, Voxel::new(VoxelType::BRICK));
    }

    Ok(positions)
}
