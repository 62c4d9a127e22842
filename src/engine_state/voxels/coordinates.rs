//! # Coordinate Spaces
//!
//! Three coordinate systems coexist in the world and are kept apart by type:
//!
//! - **World**: global block coordinates, `Point3<i32>`, any sign.
//! - **Chunk**: one unit per chunk column on the horizontal plane, [`ChunkPosition`].
//! - **Local**: block coordinates inside one chunk, `Point3<i32>` in `[0, size)` per axis.
//!
//! Chunks are columns, so the vertical axis is never split at the chunk level. World y and
//! local y are the same value; only x and z are converted, with floored division and
//! modulus so that negative world coordinates land in the right chunk.

use std::fmt;

use cgmath::{Point3, Vector3};

use crate::core::floored::{floor_div, floor_mod};

use super::chunk::neighbor::Neighbor;

/// Horizontal position of a chunk column, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkPosition {
    /// Chunk index along world x
    pub x: i32,
    /// Chunk index along world z
    pub z: i32,
}

impl ChunkPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// Finds the chunk column that owns a world-space block position.
    ///
    /// # Arguments
    /// * `world` - World-space block coordinate, y is ignored
    /// * `chunk_size` - Chunk extent in blocks
    ///
    /// # Returns
    /// The chunk position, rounded toward negative infinity on both axes
    pub fn from_world(world: Point3<i32>, chunk_size: Vector3<i32>) -> Self {
        ChunkPosition {
            x: floor_div(world.x, chunk_size.x),
            z: floor_div(world.z, chunk_size.z),
        }
    }

    /// World-space position of the chunk's local `(0, 0, 0)` block.
    pub fn world_origin(&self, chunk_size: Vector3<i32>) -> Point3<i32> {
        Point3::new(self.x * chunk_size.x, 0, self.z * chunk_size.z)
    }

    /// Position of the adjacent chunk column in `direction`.
    pub fn neighbor(&self, direction: Neighbor) -> Self {
        let (dx, dz) = direction.offset();
        ChunkPosition {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev distance in chunks, used for square play areas.
    pub fn chebyshev_distance(&self, other: ChunkPosition) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Identifies one sub-chunk, the unit of mesh caching and invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubChunkKey {
    pub chunk: ChunkPosition,
    /// Slab index counted from the bottom of the chunk
    pub index: usize,
}

impl SubChunkKey {
    pub const fn new(chunk: ChunkPosition, index: usize) -> Self {
        SubChunkKey { chunk, index }
    }
}

impl fmt::Display for SubChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.chunk, self.index)
    }
}

/// Converts a world-space block position into the owning chunk's local space.
///
/// X and z use a floored modulus, y passes through unchanged.
pub fn world_to_local(world: Point3<i32>, chunk_size: Vector3<i32>) -> Point3<i32> {
    Point3::new(
        floor_mod(world.x, chunk_size.x),
        world.y,
        floor_mod(world.z, chunk_size.z),
    )
}

/// Splits a world-space block position into its chunk and local position.
pub fn split_world(world: Point3<i32>, chunk_size: Vector3<i32>) -> (ChunkPosition, Point3<i32>) {
    (
        ChunkPosition::from_world(world, chunk_size),
        world_to_local(world, chunk_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Vector3<i32> {
        Vector3::new(16, 256, 16)
    }

    #[test]
    fn negative_world_coordinates_use_floored_modulus() {
        let (chunk, local) = split_world(Point3::new(-1, 40, -1), size());
        assert_eq!(chunk, ChunkPosition::new(-1, -1));
        assert_eq!(local, Point3::new(15, 40, 15));

        let (chunk, local) = split_world(Point3::new(-17, 0, 3), size());
        assert_eq!(chunk, ChunkPosition::new(-2, 0));
        assert_eq!(local, Point3::new(15, 0, 3));
    }

    #[test]
    fn world_origin_inverts_split() {
        for x in -40..40 {
            for z in [-33, -16, -1, 0, 15, 16, 47] {
                let world = Point3::new(x, 7, z);
                let (chunk, local) = split_world(world, size());
                let origin = chunk.world_origin(size());
                assert_eq!(
                    Point3::new(origin.x + local.x, local.y, origin.z + local.z),
                    world
                );
            }
        }
    }

    #[test]
    fn neighbor_positions_follow_direction_offsets() {
        let origin = ChunkPosition::new(0, 0);
        assert_eq!(origin.neighbor(Neighbor::EAST), ChunkPosition::new(1, 0));
        assert_eq!(origin.neighbor(Neighbor::WEST), ChunkPosition::new(-1, 0));
        assert_eq!(origin.neighbor(Neighbor::SOUTH), ChunkPosition::new(0, 1));
        assert_eq!(origin.neighbor(Neighbor::NORTH), ChunkPosition::new(0, -1));
    }

    #[test]
    fn chebyshev_distance_is_square_radius() {
        let centre = ChunkPosition::new(2, -3);
        assert_eq!(centre.chebyshev_distance(ChunkPosition::new(4, -2)), 2);
        assert_eq!(centre.chebyshev_distance(ChunkPosition::new(2, -3)), 0);
        assert_eq!(centre.chebyshev_distance(ChunkPosition::new(-1, 0)), 3);
    }
}
