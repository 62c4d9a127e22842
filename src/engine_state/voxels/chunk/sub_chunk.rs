//! # Sub-Chunk
//!
//! A vertical slab of a chunk and the unit of mesh caching. A sub-chunk owns no block
//! data; it knows which slice of its parent's block buffer it covers and holds the mesh
//! built from that slice, along with a flag telling whether the mesh is stale.
//!
//! Regeneration goes through [`super::Chunk::sub_chunk_mesh`], which has the block data and
//! neighbor links the mesher needs. The buffers inside the cached mesh are reused from one
//! regeneration to the next.

use cgmath::{Point3, Vector3};

use crate::core::CoordinateIterator;
use crate::engine_state::error::VoxelResult;
use crate::engine_state::rendering::meshing::mesh::ChunkMesh;

/// One vertical slab of a chunk with its cached mesh.
#[derive(Debug)]
pub struct SubChunk {
    index: usize,
    /// Local position of the slab's lowest corner within the parent chunk
    offset: Point3<i32>,
    size: Vector3<i32>,
    pub(super) mesh: ChunkMesh,
    pub(super) invalidated: bool,
}

impl SubChunk {
    /// Creates the `index`-th slab of a chunk of `chunk_size` cut into slabs `height` tall.
    ///
    /// New sub-chunks start invalidated so their first mesh read builds geometry.
    pub(super) fn new(index: usize, chunk_size: Vector3<i32>, height: i32) -> Self {
        SubChunk {
            index,
            offset: Point3::new(0, index as i32 * height, 0),
            size: Vector3::new(chunk_size.x, height, chunk_size.z),
            mesh: ChunkMesh::new(),
            invalidated: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Local position of the slab's lowest corner within the parent chunk.
    pub fn offset(&self) -> Point3<i32> {
        self.offset
    }

    pub fn size(&self) -> Vector3<i32> {
        self.size
    }

    /// Returns `true` if local height `y` falls inside this slab.
    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.offset.y && y < self.offset.y + self.size.y
    }

    /// Enumerates the slab's block positions in chunk-local space.
    pub fn local_iterator(&self) -> VoxelResult<CoordinateIterator> {
        CoordinateIterator::new(self.size, self.offset)
    }

    /// Enumerates the slab's block positions in world space.
    ///
    /// # Arguments
    /// * `chunk_origin` - World position of the parent chunk's local origin
    pub fn world_iterator(&self, chunk_origin: Point3<i32>) -> VoxelResult<CoordinateIterator> {
        CoordinateIterator::new(
            self.size,
            Point3::new(
                chunk_origin.x + self.offset.x,
                chunk_origin.y + self.offset.y,
                chunk_origin.z + self.offset.z,
            ),
        )
    }

    /// Marks the cached mesh stale. The next mesh read regenerates it.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// The cached mesh, or `None` while it is stale.
    pub fn cached_mesh(&self) -> Option<&ChunkMesh> {
        if self.invalidated {
            None
        } else {
            Some(&self.mesh)
        }
    }
}
