//! # World Module
//!
//! This module provides the `World` struct, the registry of every chunk column in the voxel
//! world. It creates chunks on demand, links them to their neighbors, routes world-space
//! block edits to the owning chunk and records which sub-chunk meshes became stale.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach: a hash map from [`ChunkPosition`] to a shared
//! chunk handle. Chunks are created the first time they are requested and then kept for
//! the lifetime of the world. Separately, a *loaded* set records which chunks are currently
//! shown; unloading a chunk removes it from that set but keeps its blocks in memory.
//!
//! ## Events
//!
//! The world never touches rendering state. Every change a renderer may care about is
//! recorded as a [`WorldEvent`] and handed out by [`World::drain_events`]:
//!
//! - [`WorldEvent::ChunksLoaded`] / [`WorldEvent::ChunksUnloaded`] when the loaded set changes
//! - [`WorldEvent::MeshInvalidated`] for every sub-chunk whose cached mesh went stale
//! - [`WorldEvent::ChunkDiscarded`] when a chunk is destroyed
//!
//! ## Invalidation
//!
//! A block edit invalidates the smallest set of sub-chunks whose geometry can change:
//! the slab holding the block, the slab above or below when the block sits on a slab
//! boundary, and the same slab of the horizontal neighbor when the block sits on a chunk
//! edge. See [`World::invalidation_set`].
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - Neighbor links are weak, dropping a chunk from the map frees it
//! - Unloaded chunks keep their block data; there is no eviction

use std::collections::{BTreeSet, HashMap, HashSet};

use cgmath::{Point3, Vector3};
use log::{debug, info, trace, warn};
use web_time::Instant;

use crate::core::MtResource;
use crate::engine_state::config::WorldSettings;
use crate::engine_state::error::{VoxelError, VoxelResult};
use crate::engine_state::voxels::block::{BlockId, AIR};
use crate::engine_state::voxels::chunk::neighbor::Neighbor;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::coordinates::{split_world, ChunkPosition, SubChunkKey};
use crate::engine_state::voxels::generation::{GenerationContext, TerrainGenerator};

/// A change recorded by the world for whoever presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    /// Chunks that entered the loaded set, in the order they were loaded
    ChunksLoaded(Vec<ChunkPosition>),
    /// Chunks that left the loaded set
    ChunksUnloaded(Vec<ChunkPosition>),
    /// A sub-chunk whose cached mesh is stale
    MeshInvalidated(SubChunkKey),
    /// A chunk removed from the world together with its blocks
    ChunkDiscarded(ChunkPosition),
}

/// Registry of chunk columns.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_engine::engine_state::config::{TerrainKind, WorldSettings};
/// use voxel_engine::engine_state::voxels::block::catalog::BlockCatalog;
/// use voxel_engine::engine_state::voxels::generation;
/// use voxel_engine::engine_state::voxels::world::World;
///
/// let mut settings = WorldSettings::default();
/// settings.terrain.kind = TerrainKind::Flat;
/// let catalog = BlockCatalog::builtin().unwrap();
/// let generator = generation::from_settings(&settings.terrain, &catalog).unwrap();
/// let mut world = World::new(&settings, generator).unwrap();
///
/// // Edits create the owning chunk on demand
/// world.set_block_at(Point3::new(-1, 100, -1), 1).unwrap();
/// assert_eq!(world.get_block_at(Point3::new(-1, 100, -1)).unwrap(), 1);
/// assert_eq!(world.chunk_count(), 1);
/// ```
pub struct World {
    chunk_size: Vector3<i32>,
    subdivisions: usize,
    generator: Box<dyn TerrainGenerator>,
    chunks: HashMap<ChunkPosition, MtResource<Chunk>>,
    loaded: HashSet<ChunkPosition>,
    events: Vec<WorldEvent>,
}

impl World {
    /// Creates an empty world and initializes its terrain generator.
    ///
    /// # Arguments
    /// * `settings` - Chunk layout; validated here
    /// * `generator` - Fills every chunk the world creates
    ///
    /// # Errors
    /// [`VoxelError::InvalidSize`] or [`VoxelError::InvalidSubdivision`] for a bad layout
    pub fn new(
        settings: &WorldSettings,
        mut generator: Box<dyn TerrainGenerator>,
    ) -> VoxelResult<Self> {
        settings.validate()?;
        generator.initialize();

        let chunk_size = settings.chunk_size();
        info!(
            "World created (chunk size {}x{}x{}, {} sub-chunks)",
            chunk_size.x, chunk_size.y, chunk_size.z, settings.subdivisions
        );

        Ok(World {
            chunk_size,
            subdivisions: settings.subdivisions,
            generator,
            chunks: HashMap::new(),
            loaded: HashSet::new(),
            events: Vec::new(),
        })
    }

    pub fn chunk_size(&self) -> Vector3<i32> {
        self.chunk_size
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Height of one sub-chunk slab in blocks.
    pub fn sub_chunk_height(&self) -> i32 {
        self.chunk_size.y / self.subdivisions as i32
    }

    /// Retrieves the chunk at a chunk-space position without creating it.
    pub fn get_chunk(&self, position: ChunkPosition) -> Option<MtResource<Chunk>> {
        self.chunks.get(&position).cloned()
    }

    pub fn contains_chunk(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Number of chunks in memory, loaded or not.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    /// Returns the chunk at `position`, generating and linking it first if it does not exist.
    ///
    /// A new chunk is filled by the terrain generator, linked both ways to every existing
    /// horizontal neighbor, and then receives the generator's out-of-chunk writes. All of
    /// its sub-chunks and every sub-chunk of each newly linked neighbor are invalidated,
    /// since faces along the shared seam may appear or disappear on either side.
    ///
    /// # Errors
    /// Whatever the generator reports. The chunk is not registered in that case.
    pub fn get_or_create_chunk(
        &mut self,
        position: ChunkPosition,
    ) -> VoxelResult<MtResource<Chunk>> {
        if let Some(chunk) = self.chunks.get(&position) {
            return Ok(chunk.clone());
        }

        let started = Instant::now();
        let mut chunk = Chunk::new(self.chunk_size, self.subdivisions, position)?;
        let mut context = GenerationContext::new();
        self.generator.generate(&mut chunk, &mut context)?;

        let resource = MtResource::new(chunk);
        self.chunks.insert(position, resource.clone());
        self.link_neighbors(position, &resource);
        self.record_chunk_invalidated(position);

        let spilled = context.into_spilled();
        let spill_count = spilled.len();
        for block in spilled {
            let target = ChunkPosition::from_world(block.world, self.chunk_size);
            if !self.chunks.contains_key(&target) {
                warn!(
                    "Dropping generated block {} at ({}, {}, {}): chunk {} does not exist",
                    block.id, block.world.x, block.world.y, block.world.z, target
                );
                continue;
            }
            self.set_block_at(block.world, block.id)?;
        }

        debug!(
            "Generated chunk {} in {:?} ({} spilled writes)",
            position,
            started.elapsed(),
            spill_count
        );
        Ok(resource)
    }

    /// Links a freshly inserted chunk with its existing neighbors, both directions at once.
    fn link_neighbors(&mut self, position: ChunkPosition, chunk: &MtResource<Chunk>) {
        for direction in Neighbor::all() {
            let neighbor_position = position.neighbor(direction);
            let Some(neighbor) = self.chunks.get(&neighbor_position).cloned() else {
                continue;
            };

            chunk
                .get_mut()
                .set_neighbor(direction, Some(neighbor.downgrade()));
            {
                let mut neighbor = neighbor.get_mut();
                neighbor.set_neighbor(direction.opposite(), Some(chunk.downgrade()));
                neighbor.invalidate_all();
            }
            self.record_chunk_invalidated(neighbor_position);

            debug!("Linked chunk {} to {:?} neighbor {}", position, direction, neighbor_position);
        }
    }

    /// Reads a block by world position.
    ///
    /// Positions in chunks that do not exist read as air.
    ///
    /// # Errors
    /// [`VoxelError::WorldHeightOutOfRange`] if `world.y` is outside the chunk column
    pub fn get_block_at(&self, world: Point3<i32>) -> VoxelResult<BlockId> {
        self.check_height(world.y)?;
        let (position, local) = split_world(world, self.chunk_size);
        match self.chunks.get(&position) {
            Some(chunk) => chunk.get().get_block_at_local(local),
            None => Ok(AIR),
        }
    }

    /// Writes a block by world position, creating the owning chunk if needed, and
    /// invalidates the minimal set of affected sub-chunks.
    ///
    /// # Errors
    /// - [`VoxelError::WorldHeightOutOfRange`] if `world.y` is outside the chunk column
    /// - Any error from generating the owning chunk
    pub fn set_block_at(&mut self, world: Point3<i32>, id: BlockId) -> VoxelResult<()> {
        self.check_height(world.y)?;
        let (position, local) = split_world(world, self.chunk_size);
        let chunk = self.get_or_create_chunk(position)?;
        chunk.get_mut().set_block_at_local(local, id)?;

        for key in self.invalidation_set(world) {
            self.invalidate_sub_chunk(key);
        }
        Ok(())
    }

    /// Invalidates the sub-chunks touched by a batch of edits, each one once.
    ///
    /// Use after writing many blocks straight into chunk buffers.
    ///
    /// # Returns
    /// The invalidated keys, in ascending order. Keys of chunks that do not exist are skipped.
    pub fn update_around_world_positions(
        &mut self,
        positions: impl IntoIterator<Item = Point3<i32>>,
    ) -> Vec<SubChunkKey> {
        let keys: BTreeSet<SubChunkKey> = positions
            .into_iter()
            .flat_map(|world| self.invalidation_set(world))
            .collect();

        keys.into_iter()
            .filter(|&key| self.invalidate_sub_chunk(key))
            .collect()
    }

    /// Sub-chunks whose mesh can change when the block at `world` changes.
    ///
    /// # Returns
    /// - The slab containing the block
    /// - The slab below, if the block is on the bottom layer of its slab
    /// - The slab above, if the block is on the top layer of its slab
    /// - The same slab of the West/East/North/South neighbor, if the block is on that edge
    ///
    /// Empty when `world.y` is outside the chunk column. Neighbor keys are included whether
    /// or not that chunk exists.
    pub fn invalidation_set(&self, world: Point3<i32>) -> Vec<SubChunkKey> {
        if world.y < 0 || world.y >= self.chunk_size.y {
            return Vec::new();
        }

        let (position, local) = split_world(world, self.chunk_size);
        let height = self.sub_chunk_height();
        let index = (local.y / height) as usize;
        let mut keys = vec![SubChunkKey::new(position, index)];

        if local.y % height == 0 && index > 0 {
            keys.push(SubChunkKey::new(position, index - 1));
        }
        if local.y % height == height - 1 && index + 1 < self.subdivisions {
            keys.push(SubChunkKey::new(position, index + 1));
        }

        let edges = [
            (local.x == 0, Neighbor::WEST),
            (local.x == self.chunk_size.x - 1, Neighbor::EAST),
            (local.z == 0, Neighbor::NORTH),
            (local.z == self.chunk_size.z - 1, Neighbor::SOUTH),
        ];
        for (on_edge, direction) in edges {
            if on_edge {
                keys.push(SubChunkKey::new(position.neighbor(direction), index));
            }
        }

        trace!(
            "Block ({}, {}, {}) invalidates {:?}",
            world.x,
            world.y,
            world.z,
            keys
        );
        keys
    }

    /// Marks one sub-chunk's mesh stale and records the event.
    ///
    /// # Returns
    /// `false` if the chunk does not exist or the index is out of range
    pub fn invalidate_sub_chunk(&mut self, key: SubChunkKey) -> bool {
        let Some(chunk) = self.chunks.get(&key.chunk) else {
            return false;
        };
        if chunk.get_mut().invalidate_sub_chunk(key.index).is_err() {
            return false;
        }
        self.events.push(WorldEvent::MeshInvalidated(key));
        true
    }

    /// Marks every sub-chunk of a chunk stale.
    ///
    /// # Errors
    /// [`VoxelError::ChunkNotFound`] if there is no chunk at `position`
    pub fn invalidate_chunk(&mut self, position: ChunkPosition) -> VoxelResult<()> {
        let chunk = self
            .chunks
            .get(&position)
            .ok_or(VoxelError::ChunkNotFound(position))?;
        chunk.get_mut().invalidate_all();
        self.record_chunk_invalidated(position);
        Ok(())
    }

    fn record_chunk_invalidated(&mut self, position: ChunkPosition) {
        self.events.extend(
            (0..self.subdivisions)
                .map(|index| WorldEvent::MeshInvalidated(SubChunkKey::new(position, index))),
        );
    }

    /// Adds a chunk to the loaded set, generating it if it does not exist yet.
    ///
    /// # Returns
    /// `true` if the chunk was not loaded before
    pub fn load_chunk(&mut self, position: ChunkPosition) -> VoxelResult<bool> {
        Ok(!self.load_chunks([position])?.is_empty())
    }

    /// Loads a batch of chunks and records one [`WorldEvent::ChunksLoaded`] for those that
    /// were not loaded yet.
    ///
    /// # Returns
    /// The newly loaded positions
    ///
    /// # Errors
    /// Stops at the first chunk that fails to generate. Chunks loaded before it stay loaded
    /// and are still reported in an event.
    pub fn load_chunks(
        &mut self,
        positions: impl IntoIterator<Item = ChunkPosition>,
    ) -> VoxelResult<Vec<ChunkPosition>> {
        let mut newly_loaded = Vec::new();
        let mut result = Ok(());

        for position in positions {
            if self.loaded.contains(&position) {
                continue;
            }
            if let Err(err) = self.get_or_create_chunk(position) {
                result = Err(err);
                break;
            }
            self.loaded.insert(position);
            newly_loaded.push(position);
        }

        if !newly_loaded.is_empty() {
            info!("Loaded {} chunks", newly_loaded.len());
            self.events
                .push(WorldEvent::ChunksLoaded(newly_loaded.clone()));
        }
        result.map(|_| newly_loaded)
    }

    /// Removes a chunk from the loaded set. Its blocks stay in memory.
    ///
    /// # Returns
    /// `true` if the chunk was loaded
    pub fn unload_chunk(&mut self, position: ChunkPosition) -> bool {
        !self.unload_chunks([position]).is_empty()
    }

    /// Unloads a batch of chunks and records one [`WorldEvent::ChunksUnloaded`].
    ///
    /// # Returns
    /// The positions that were loaded before the call
    pub fn unload_chunks(
        &mut self,
        positions: impl IntoIterator<Item = ChunkPosition>,
    ) -> Vec<ChunkPosition> {
        let unloaded: Vec<ChunkPosition> = positions
            .into_iter()
            .filter(|position| self.loaded.remove(position))
            .collect();

        if !unloaded.is_empty() {
            info!("Unloaded {} chunks", unloaded.len());
            self.events.push(WorldEvent::ChunksUnloaded(unloaded.clone()));
        }
        unloaded
    }

    pub fn is_loaded(&self, position: ChunkPosition) -> bool {
        self.loaded.contains(&position)
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.loaded.iter().copied()
    }

    /// Destroys a chunk and its blocks.
    ///
    /// The chunk is unloaded first if needed, unlinked from its neighbors on both sides,
    /// and every sub-chunk of each former neighbor is invalidated. A later request for the
    /// same position generates a fresh chunk.
    ///
    /// # Errors
    /// [`VoxelError::ChunkNotFound`] if there is no chunk at `position`
    pub fn discard_chunk(&mut self, position: ChunkPosition) -> VoxelResult<()> {
        let chunk = self
            .chunks
            .remove(&position)
            .ok_or(VoxelError::ChunkNotFound(position))?;
        self.unload_chunks([position]);

        for direction in Neighbor::all() {
            chunk.get_mut().set_neighbor(direction, None);

            let neighbor_position = position.neighbor(direction);
            let Some(neighbor) = self.chunks.get(&neighbor_position).cloned() else {
                continue;
            };
            {
                let mut neighbor = neighbor.get_mut();
                neighbor.set_neighbor(direction.opposite(), None);
                neighbor.invalidate_all();
            }
            self.record_chunk_invalidated(neighbor_position);
        }

        self.events.push(WorldEvent::ChunkDiscarded(position));
        debug!("Discarded chunk {}", position);
        Ok(())
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Hands out every event recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_height(&self, y: i32) -> VoxelResult<()> {
        if y < 0 || y >= self.chunk_size.y {
            return Err(VoxelError::WorldHeightOutOfRange {
                y,
                height: self.chunk_size.y,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::catalog::BlockCatalog;

    /// Leaves chunks empty, optionally spilling one block east of each chunk.
    struct TestGenerator {
        spill: Option<BlockId>,
        initialized: bool,
    }

    impl TerrainGenerator for TestGenerator {
        fn initialize(&mut self) {
            self.initialized = true;
        }

        fn generate(
            &mut self,
            chunk: &mut Chunk,
            context: &mut GenerationContext,
        ) -> VoxelResult<()> {
            assert!(self.initialized);
            if let Some(id) = self.spill {
                let origin = chunk.world_position();
                context.set_block(chunk, Point3::new(origin.x + chunk.size().x, 1, origin.z), id)?;
            }
            Ok(())
        }
    }

    fn settings() -> WorldSettings {
        WorldSettings {
            chunk_size: [16, 32, 16],
            subdivisions: 4,
            ..WorldSettings::default()
        }
    }

    fn world() -> World {
        World::new(
            &settings(),
            Box::new(TestGenerator {
                spill: None,
                initialized: false,
            }),
        )
        .unwrap()
    }

    fn invalidated(events: &[WorldEvent]) -> BTreeSet<SubChunkKey> {
        events
            .iter()
            .filter_map(|event| match event {
                WorldEvent::MeshInvalidated(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    fn key(x: i32, z: i32, index: usize) -> SubChunkKey {
        SubChunkKey::new(ChunkPosition::new(x, z), index)
    }

    #[test]
    fn rejects_invalid_layout() {
        let settings = WorldSettings {
            chunk_size: [16, 30, 16],
            subdivisions: 4,
            ..WorldSettings::default()
        };
        let generator = Box::new(TestGenerator {
            spill: None,
            initialized: false,
        });
        assert!(matches!(
            World::new(&settings, generator),
            Err(VoxelError::InvalidSubdivision { .. })
        ));
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut world = world();
        let a = world.get_or_create_chunk(ChunkPosition::new(2, -1)).unwrap();
        let b = world.get_or_create_chunk(ChunkPosition::new(2, -1)).unwrap();

        assert!(a.ptr_eq(&b));
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn neighbors_are_linked_both_ways() {
        let mut world = world();
        let a = world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        let b = world.get_or_create_chunk(ChunkPosition::new(1, 0)).unwrap();
        let c = world.get_or_create_chunk(ChunkPosition::new(0, 1)).unwrap();

        assert!(a.get().is_linked_to(Neighbor::EAST, &b));
        assert!(b.get().is_linked_to(Neighbor::WEST, &a));
        assert!(a.get().is_linked_to(Neighbor::SOUTH, &c));
        assert!(c.get().is_linked_to(Neighbor::NORTH, &a));
        assert!(b.get().neighbor(Neighbor::SOUTH).is_none());
    }

    #[test]
    fn linking_invalidates_both_sides() {
        let mut world = world();
        world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        world.drain_events();

        world.get_or_create_chunk(ChunkPosition::new(-1, 0)).unwrap();
        let keys = invalidated(&world.drain_events());

        for index in 0..4 {
            assert!(keys.contains(&key(0, 0, index)));
            assert!(keys.contains(&key(-1, 0, index)));
        }
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn missing_chunk_reads_as_air() {
        let world = world();
        assert_eq!(world.get_block_at(Point3::new(100, 5, -100)).unwrap(), AIR);
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn height_is_checked() {
        let mut world = world();
        assert!(matches!(
            world.get_block_at(Point3::new(0, 32, 0)),
            Err(VoxelError::WorldHeightOutOfRange { y: 32, height: 32 })
        ));
        assert!(matches!(
            world.set_block_at(Point3::new(0, -1, 0), 1),
            Err(VoxelError::WorldHeightOutOfRange { y: -1, .. })
        ));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn set_routes_with_floored_modulus() {
        let mut world = world();
        world.set_block_at(Point3::new(-1, 3, -17), 4).unwrap();

        let chunk = world.get_chunk(ChunkPosition::new(-1, -2)).unwrap();
        assert_eq!(chunk.get().get_block_at_local(Point3::new(15, 3, 15)).unwrap(), 4);
        assert_eq!(world.get_block_at(Point3::new(-1, 3, -17)).unwrap(), 4);
    }

    #[test]
    fn interior_edit_invalidates_one_sub_chunk() {
        let world = world();
        assert_eq!(world.invalidation_set(Point3::new(5, 10, 5)), vec![key(0, 0, 1)]);
    }

    #[test]
    fn slab_boundaries_include_vertical_neighbors() {
        let world = world();

        let bottom = world.invalidation_set(Point3::new(5, 8, 5));
        assert_eq!(bottom, vec![key(0, 0, 1), key(0, 0, 0)]);

        let top = world.invalidation_set(Point3::new(5, 15, 5));
        assert_eq!(top, vec![key(0, 0, 1), key(0, 0, 2)]);

        // The column's first and last layers have nothing beyond them.
        assert_eq!(world.invalidation_set(Point3::new(5, 0, 5)), vec![key(0, 0, 0)]);
        assert_eq!(world.invalidation_set(Point3::new(5, 31, 5)), vec![key(0, 0, 3)]);
    }

    #[test]
    fn chunk_edges_include_horizontal_neighbors() {
        let world = world();

        assert_eq!(
            world.invalidation_set(Point3::new(16, 4, 7)),
            vec![key(1, 0, 0), key(0, 0, 0)]
        );
        assert_eq!(
            world.invalidation_set(Point3::new(-1, 4, -16)),
            vec![key(-1, -1, 0), key(0, -1, 0), key(-1, -2, 0)]
        );
    }

    #[test]
    fn edge_edit_invalidates_existing_neighbor() {
        let mut world = world();
        world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        world.get_or_create_chunk(ChunkPosition::new(-1, 0)).unwrap();

        let catalog = BlockCatalog::builtin().unwrap();
        let west = world.get_chunk(ChunkPosition::new(-1, 0)).unwrap();
        for chunk in [world.get_chunk(ChunkPosition::new(0, 0)).unwrap(), west.clone()] {
            for index in 0..4 {
                chunk.get_mut().sub_chunk_mesh(index, &catalog).unwrap();
            }
        }
        world.drain_events();

        world.set_block_at(Point3::new(0, 20, 3), 1).unwrap();

        assert!(west.get().sub_chunk(2).unwrap().is_invalidated());
        assert!(!west.get().sub_chunk(1).unwrap().is_invalidated());
        assert_eq!(
            invalidated(&world.drain_events()),
            BTreeSet::from([key(0, 0, 2), key(-1, 0, 2)])
        );
    }

    #[test]
    fn batch_update_deduplicates() {
        let mut world = world();
        world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        world.drain_events();

        let keys = world.update_around_world_positions([
            Point3::new(3, 3, 3),
            Point3::new(4, 4, 4),
            Point3::new(0, 9, 3),
        ]);

        // The West neighbor of the last edit does not exist and is skipped.
        assert_eq!(keys, vec![key(0, 0, 0), key(0, 0, 1)]);
        assert_eq!(world.drain_events().len(), 2);
    }

    #[test]
    fn load_and_unload_keep_data() {
        let mut world = world();
        world.set_block_at(Point3::new(1, 1, 1), 3).unwrap();
        world.drain_events();

        assert!(world.load_chunk(ChunkPosition::new(0, 0)).unwrap());
        assert!(!world.load_chunk(ChunkPosition::new(0, 0)).unwrap());
        assert!(world.is_loaded(ChunkPosition::new(0, 0)));

        assert!(world.unload_chunk(ChunkPosition::new(0, 0)));
        assert!(!world.unload_chunk(ChunkPosition::new(0, 0)));
        assert!(!world.is_loaded(ChunkPosition::new(0, 0)));
        assert_eq!(world.get_block_at(Point3::new(1, 1, 1)).unwrap(), 3);

        assert_eq!(
            world.drain_events(),
            vec![
                WorldEvent::ChunksLoaded(vec![ChunkPosition::new(0, 0)]),
                WorldEvent::ChunksUnloaded(vec![ChunkPosition::new(0, 0)]),
            ]
        );
    }

    #[test]
    fn discard_unlinks_and_invalidates_neighbors() {
        let mut world = world();
        let a = world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        world.load_chunk(ChunkPosition::new(1, 0)).unwrap();
        world.drain_events();

        world.discard_chunk(ChunkPosition::new(1, 0)).unwrap();

        assert!(a.get().neighbor(Neighbor::EAST).is_none());
        assert!(!world.contains_chunk(ChunkPosition::new(1, 0)));
        assert!(!world.is_loaded(ChunkPosition::new(1, 0)));

        let events = world.drain_events();
        assert_eq!(events[0], WorldEvent::ChunksUnloaded(vec![ChunkPosition::new(1, 0)]));
        assert_eq!(
            events.last(),
            Some(&WorldEvent::ChunkDiscarded(ChunkPosition::new(1, 0)))
        );
        assert_eq!(invalidated(&events).len(), 4);

        assert!(matches!(
            world.discard_chunk(ChunkPosition::new(1, 0)),
            Err(VoxelError::ChunkNotFound(_))
        ));
    }

    #[test]
    fn spilled_writes_land_in_existing_chunks_only() {
        let mut world = World::new(
            &settings(),
            Box::new(TestGenerator {
                spill: Some(7),
                initialized: false,
            }),
        )
        .unwrap();

        // Chunk (1, 0) does not exist yet, so chunk (0, 0)'s spill is dropped.
        world.get_or_create_chunk(ChunkPosition::new(0, 0)).unwrap();
        world.get_or_create_chunk(ChunkPosition::new(1, 0)).unwrap();
        assert_eq!(world.get_block_at(Point3::new(16, 1, 0)).unwrap(), AIR);

        // Chunk (0, 0) exists when (-1, 0) is generated, so its spill lands.
        world.get_or_create_chunk(ChunkPosition::new(-1, 0)).unwrap();
        assert_eq!(world.get_block_at(Point3::new(0, 1, 0)).unwrap(), 7);
    }
}
