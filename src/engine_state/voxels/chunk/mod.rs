//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size column of the voxel world with
//! dense block storage, cut vertically into independently meshed [`SubChunk`] slabs and
//! linked to its four horizontal neighbors.
//!
//! ## Memory Layout
//!
//! Blocks are one byte each, stored flat in a single buffer:
//!
//! `offset = y * size_x * size_z + z * size_x + x`
//!
//! so a whole horizontal layer is contiguous and layers stack upward. Walking the buffer
//! front to back visits the same order as a [`CoordinateIterator`] over the chunk.
//!
//! ## Neighbor Links
//!
//! Links are weak handles to the neighbor's shared resource. A chunk never keeps its
//! neighbors alive; a link whose target has been dropped reads as "not linked". The
//! registry sets both directions of a link in the same call.
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1), one multiply-add and a bounds check
//! - **Memory Usage**: `size_x * size_y * size_z` bytes plus one mesh per sub-chunk

use cgmath::{Point3, Vector3};

use crate::core::{CoordinateIterator, MtResource, MtWeakResource};
use crate::engine_state::error::{VoxelError, VoxelResult};
use crate::engine_state::rendering::meshing::mesh::{culled, ChunkMesh};

use super::block::catalog::BlockCatalog;
use super::block::{BlockId, AIR};
use super::coordinates::{world_to_local, ChunkPosition};

pub mod neighbor;
pub mod sub_chunk;

use neighbor::Neighbor;
use sub_chunk::SubChunk;

/// A column of blocks with cached per-slab meshes.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_engine::engine_state::voxels::chunk::Chunk;
/// use voxel_engine::engine_state::voxels::coordinates::ChunkPosition;
///
/// let mut chunk = Chunk::new(Vector3::new(16, 64, 16), 4, ChunkPosition::new(-1, 0)).unwrap();
/// assert_eq!(chunk.world_position(), Point3::new(-16, 0, 0));
///
/// chunk.set_block_at_world(Point3::new(-1, 10, 3), 1).unwrap();
/// assert_eq!(chunk.get_block_at_local(Point3::new(15, 10, 3)).unwrap(), 1);
/// ```
pub struct Chunk {
    size: Vector3<i32>,
    position: ChunkPosition,
    /// World position of local `(0, 0, 0)`
    world_position: Point3<i32>,
    blocks: Vec<BlockId>,
    sub_chunks: Vec<SubChunk>,
    sub_chunk_height: i32,
    neighbors: [Option<MtWeakResource<Chunk>>; 4],
}

impl Chunk {
    /// Creates an all-air chunk.
    ///
    /// # Arguments
    /// * `size` - Extent in blocks, every component greater than zero
    /// * `subdivisions` - Number of sub-chunks, must divide `size.y` evenly
    /// * `position` - Chunk-space position, also sets the world-space origin
    ///
    /// # Errors
    /// - [`VoxelError::InvalidSize`] for a non-positive size component
    /// - [`VoxelError::InvalidSubdivision`] if `subdivisions` is zero or does not divide `size.y`
    pub fn new(
        size: Vector3<i32>,
        subdivisions: usize,
        position: ChunkPosition,
    ) -> VoxelResult<Self> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(VoxelError::InvalidSize {
                x: size.x,
                y: size.y,
                z: size.z,
            });
        }
        let divisor = i32::try_from(subdivisions).unwrap_or(0);
        if divisor == 0 || size.y % divisor != 0 {
            return Err(VoxelError::InvalidSubdivision {
                height: size.y,
                subdivisions: i32::try_from(subdivisions).unwrap_or(i32::MAX),
            });
        }

        let sub_chunk_height = size.y / divisor;
        let volume = size.x as usize * size.y as usize * size.z as usize;

        Ok(Chunk {
            size,
            position,
            world_position: position.world_origin(size),
            blocks: vec![AIR; volume],
            sub_chunks: (0..subdivisions)
                .map(|index| SubChunk::new(index, size, sub_chunk_height))
                .collect(),
            sub_chunk_height,
            neighbors: [None, None, None, None],
        })
    }

    pub fn size(&self) -> Vector3<i32> {
        self.size
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    /// World position of the chunk's local origin.
    pub fn world_position(&self) -> Point3<i32> {
        self.world_position
    }

    /// Moves the chunk in chunk space and updates its world-space origin to match.
    pub fn set_chunk_space_position(&mut self, position: ChunkPosition) {
        self.position = position;
        self.world_position = position.world_origin(self.size);
    }

    /// Moves the chunk so that its local origin sits at world `(x, z)`.
    ///
    /// # Errors
    /// [`VoxelError::MisalignedWorldPosition`] unless both values are multiples of the chunk size
    pub fn set_world_space_position(&mut self, x: i32, z: i32) -> VoxelResult<()> {
        if x % self.size.x != 0 || z % self.size.z != 0 {
            return Err(VoxelError::MisalignedWorldPosition { x, z });
        }
        self.set_chunk_space_position(ChunkPosition::new(x / self.size.x, z / self.size.z));
        Ok(())
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if `local` lies in `[0, size)` on every axis.
    pub fn contains_local(&self, local: Point3<i32>) -> bool {
        (0..self.size.x).contains(&local.x)
            && (0..self.size.y).contains(&local.y)
            && (0..self.size.z).contains(&local.z)
    }

    /// Flat buffer offset of a local position, `None` when out of bounds.
    pub fn offset_of(&self, local: Point3<i32>) -> Option<usize> {
        if !self.contains_local(local) {
            return None;
        }
        Some(
            local.y as usize * self.size.x as usize * self.size.z as usize
                + local.z as usize * self.size.x as usize
                + local.x as usize,
        )
    }

    /// Inverse of [`Chunk::offset_of`].
    pub fn local_of_offset(&self, offset: usize) -> Option<Point3<i32>> {
        if offset >= self.blocks.len() {
            return None;
        }
        let row = self.size.x as usize;
        let layer = row * self.size.z as usize;
        Some(Point3::new(
            (offset % row) as i32,
            (offset / layer) as i32,
            (offset % layer / row) as i32,
        ))
    }

    fn checked_offset(&self, local: Point3<i32>) -> VoxelResult<usize> {
        self.offset_of(local)
            .ok_or(VoxelError::LocalPositionOutOfRange {
                x: local.x,
                y: local.y,
                z: local.z,
            })
    }

    /// Gets the block id at a chunk-local position.
    ///
    /// # Errors
    /// [`VoxelError::LocalPositionOutOfRange`] if `local` is outside the chunk
    pub fn get_block_at_local(&self, local: Point3<i32>) -> VoxelResult<BlockId> {
        Ok(self.blocks[self.checked_offset(local)?])
    }

    /// Sets the block id at a chunk-local position.
    ///
    /// Does not invalidate any mesh; the world registry decides which sub-chunks are affected.
    ///
    /// # Errors
    /// [`VoxelError::LocalPositionOutOfRange`] if `local` is outside the chunk
    pub fn set_block_at_local(&mut self, local: Point3<i32>, id: BlockId) -> VoxelResult<()> {
        let offset = self.checked_offset(local)?;
        self.blocks[offset] = id;
        Ok(())
    }

    /// Gets a block by world position, wrapping x and z into this chunk with a floored modulus.
    ///
    /// The position is not checked against the chunk's own footprint. Y passes through
    /// unchanged and is bounds-checked against the chunk height.
    pub fn get_block_at_world(&self, world: Point3<i32>) -> VoxelResult<BlockId> {
        self.get_block_at_local(world_to_local(world, self.size))
    }

    /// World-space counterpart of [`Chunk::set_block_at_local`].
    pub fn set_block_at_world(&mut self, world: Point3<i32>, id: BlockId) -> VoxelResult<()> {
        self.set_block_at_local(world_to_local(world, self.size), id)
    }

    /// Reads a block known to be inside the chunk.
    #[inline]
    pub(crate) fn block_in_bounds(&self, local: Point3<i32>) -> BlockId {
        self.blocks[local.y as usize * self.size.x as usize * self.size.z as usize
            + local.z as usize * self.size.x as usize
            + local.x as usize]
    }

    /// The raw block buffer in layout order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Mutable raw block buffer, for generators filling a whole chunk at once.
    pub fn blocks_mut(&mut self) -> &mut [BlockId] {
        &mut self.blocks
    }

    /// Sets every block to `id`.
    pub fn fill(&mut self, id: BlockId) {
        self.blocks.fill(id);
    }

    /// Returns `true` if the chunk holds nothing but air.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&id| id == AIR)
    }

    /// Enumerates every local position of the chunk in buffer order.
    pub fn local_iterator(&self) -> VoxelResult<CoordinateIterator> {
        CoordinateIterator::new(self.size, Point3::new(0, 0, 0))
    }

    /// Enumerates every world position covered by the chunk.
    pub fn world_iterator(&self) -> VoxelResult<CoordinateIterator> {
        CoordinateIterator::new(self.size, self.world_position)
    }

    /// Returns the linked neighbor in `direction`, if it is linked and still alive.
    pub fn neighbor(&self, direction: Neighbor) -> Option<MtResource<Chunk>> {
        self.neighbors[direction.index()]
            .as_ref()
            .and_then(MtWeakResource::upgrade)
    }

    /// Returns `true` if the link in `direction` points at `chunk`.
    pub fn is_linked_to(&self, direction: Neighbor, chunk: &MtResource<Chunk>) -> bool {
        self.neighbors[direction.index()]
            .as_ref()
            .is_some_and(|link| link.points_to(chunk))
    }

    /// Sets one side of a link. Only the registry calls this, always for both sides at once.
    pub(crate) fn set_neighbor(
        &mut self,
        direction: Neighbor,
        neighbor: Option<MtWeakResource<Chunk>>,
    ) {
        self.neighbors[direction.index()] = neighbor;
    }

    pub fn subdivisions(&self) -> usize {
        self.sub_chunks.len()
    }

    /// Height of one sub-chunk slab in blocks.
    pub fn sub_chunk_height(&self) -> i32 {
        self.sub_chunk_height
    }

    /// Index of the sub-chunk covering local height `y`, `None` outside the column.
    pub fn sub_chunk_index_of(&self, y: i32) -> Option<usize> {
        if (0..self.size.y).contains(&y) {
            Some((y / self.sub_chunk_height) as usize)
        } else {
            None
        }
    }

    pub fn sub_chunks(&self) -> &[SubChunk] {
        &self.sub_chunks
    }

    pub fn sub_chunk(&self, index: usize) -> VoxelResult<&SubChunk> {
        let count = self.sub_chunks.len();
        self.sub_chunks
            .get(index)
            .ok_or(VoxelError::SubChunkIndexOutOfRange { index, count })
    }

    fn sub_chunk_mut(&mut self, index: usize) -> VoxelResult<&mut SubChunk> {
        let count = self.sub_chunks.len();
        self.sub_chunks
            .get_mut(index)
            .ok_or(VoxelError::SubChunkIndexOutOfRange { index, count })
    }

    /// Marks one sub-chunk's mesh stale.
    pub fn invalidate_sub_chunk(&mut self, index: usize) -> VoxelResult<()> {
        self.sub_chunk_mut(index)?.invalidate();
        Ok(())
    }

    /// Marks every sub-chunk's mesh stale.
    pub fn invalidate_all(&mut self) {
        self.sub_chunks.iter_mut().for_each(SubChunk::invalidate);
    }

    /// Returns the mesh of one sub-chunk, rebuilding it first if it was invalidated.
    ///
    /// Reading twice without an invalidation in between returns the same cached geometry
    /// without touching the block data. Neighbor chunks are read-locked while the mesh is
    /// rebuilt, so the caller must not hold a write guard on any of them.
    ///
    /// # Errors
    /// - [`VoxelError::SubChunkIndexOutOfRange`] for a bad index
    /// - [`VoxelError::MissingBlockModel`] if the slab (or a touching block) uses an unknown id
    pub fn sub_chunk_mesh(
        &mut self,
        index: usize,
        catalog: &BlockCatalog,
    ) -> VoxelResult<&ChunkMesh> {
        if self.sub_chunk(index)?.is_invalidated() {
            let mut mesh = std::mem::take(&mut self.sub_chunks[index].mesh);
            let built = culled::mesh_sub_chunk(self, index, catalog, &mut mesh);
            let sub_chunk = &mut self.sub_chunks[index];
            sub_chunk.mesh = mesh;
            built?;
            sub_chunk.invalidated = false;
        }
        Ok(&self.sub_chunks[index].mesh)
    }
}
