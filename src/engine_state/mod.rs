//! # Engine State Module
//!
//! The core engine module that ties the voxel world to whatever presents it.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container, advanced one `tick()` per frame
//! * `config` - World and terrain settings loaded from JSON
//! * `error` - The crate-wide error type
//! * `rendering` - Sub-chunk meshing and the view interface meshes are handed to
//! * `task_management` - The incremental redraw scheduler
//! * `voxels` - Blocks, chunks, the world registry and terrain generation
//!
//! ## Architecture
//!
//! `EngineState` owns one instance of every subsystem and is the only place where they
//! meet. The world records events when chunks are loaded or meshes go stale; each tick the
//! engine drains those events into the redraw scheduler, loads at most one requested chunk
//! and remeshes at most one sub-chunk. Work requested in bursts is therefore spread over
//! many frames.
//!
//! ## Performance Considerations
//!
//! * Chunk loading and remeshing are bounded to one item per tick
//! * Unloaded chunks are released from the view immediately, never left on screen
//! * A chunk that fails to load or mesh is logged and skipped, the rest of the world goes on

use std::collections::{HashSet, VecDeque};

use cgmath::Point3;
use log::{info, trace, warn};
use web_time::Instant;

use config::WorldSettings;
use error::VoxelResult;
use rendering::{MeshStore, RenderView};
use task_management::RedrawScheduler;
use voxels::block::catalog::BlockCatalog;
use voxels::block::BlockId;
use voxels::coordinates::{ChunkPosition, SubChunkKey};
use voxels::generation;
use voxels::play_area::PlayableArea;
use voxels::world::{World, WorldEvent};

pub mod config;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// What one [`EngineState::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunk loaded this tick
    pub loaded: Option<ChunkPosition>,
    /// Sub-chunk remeshed and uploaded this tick
    pub redrawn: Option<SubChunkKey>,
}

impl TickReport {
    /// `true` if the tick found nothing to do.
    pub fn is_idle(&self) -> bool {
        self.loaded.is_none() && self.redrawn.is_none()
    }
}

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use voxel_engine::engine_state::config::{TerrainKind, WorldSettings};
/// use voxel_engine::engine_state::voxels::coordinates::ChunkPosition;
/// use voxel_engine::engine_state::EngineState;
///
/// let mut settings = WorldSettings {
///     chunk_size: [16, 32, 16],
///     subdivisions: 2,
///     ..WorldSettings::default()
/// };
/// settings.terrain.kind = TerrainKind::Flat;
///
/// let mut engine = EngineState::new(&settings).unwrap();
/// engine.request_chunk_loads([ChunkPosition::new(0, 0)]);
///
/// // Main loop
/// while !engine.is_idle() {
///     engine.tick();
/// }
/// assert_eq!(engine.view.len(), 2);
/// ```
pub struct EngineState<V: RenderView = MeshStore> {
    /// The voxel world containing all chunk data
    pub world: World,
    /// Block definitions used by generation and meshing
    pub catalog: BlockCatalog,
    /// Sub-chunks waiting for a remesh
    pub scheduler: RedrawScheduler,
    /// Receives finished meshes
    pub view: V,
    /// Square of chunks kept loaded around the player
    pub play_area: PlayableArea,
    load_queue: VecDeque<ChunkPosition>,
    load_pending: HashSet<ChunkPosition>,
    frame: u64,
}

impl EngineState<MeshStore> {
    /// Creates an engine presenting into an in-memory [`MeshStore`].
    pub fn new(settings: &WorldSettings) -> VoxelResult<Self> {
        Self::with_view(settings, MeshStore::new())
    }
}

impl<V: RenderView> EngineState<V> {
    /// Creates an engine with all subsystems initialized
    ///
    /// # Arguments
    ///
    /// * `settings` - Chunk layout, terrain and catalog location
    /// * `view` - Receives finished meshes
    ///
    /// # Errors
    ///
    /// Invalid settings, an unreadable or malformed catalog, or a catalog missing a block
    /// the terrain generator places
    pub fn with_view(settings: &WorldSettings, view: V) -> VoxelResult<Self> {
        let catalog = match &settings.catalog_path {
            Some(path) => BlockCatalog::from_path(path)?,
            None => BlockCatalog::builtin()?,
        };
        let generator = generation::from_settings(&settings.terrain, &catalog)?;
        let world = World::new(settings, generator)?;

        info!(
            "Engine ready ({} block types, {:?} terrain)",
            catalog.len(),
            settings.terrain.kind
        );

        Ok(EngineState {
            world,
            catalog,
            scheduler: RedrawScheduler::new(),
            view,
            play_area: PlayableArea::new(settings.play_area_radius),
            load_queue: VecDeque::new(),
            load_pending: HashSet::new(),
            frame: 0,
        })
    }

    /// Queues chunks for loading, one per tick, in the given order.
    ///
    /// # Returns
    ///
    /// The number of positions that were neither loaded nor queued already
    pub fn request_chunk_loads(
        &mut self,
        positions: impl IntoIterator<Item = ChunkPosition>,
    ) -> usize {
        let mut queued = 0;
        for position in positions {
            if self.world.is_loaded(position) || !self.load_pending.insert(position) {
                continue;
            }
            self.load_queue.push_back(position);
            queued += 1;
        }
        queued
    }

    /// Number of chunks waiting to be loaded.
    pub fn pending_loads(&self) -> usize {
        self.load_queue.len()
    }

    /// Moves the play area, unloading chunks that left it at once and queueing the ones that
    /// entered it.
    pub fn update_play_area(&mut self, center: ChunkPosition) -> VoxelResult<()> {
        let change = self.play_area.update(center, &self.world)?;
        if change.is_empty() {
            return Ok(());
        }

        // Requests from an earlier centre that are now out of range are dropped.
        let play_area = &self.play_area;
        self.load_queue.retain(|position| play_area.contains(*position));
        self.load_pending.retain(|position| play_area.contains(*position));

        self.world.unload_chunks(change.to_unload);
        self.request_chunk_loads(change.to_load);
        self.process_world_events();
        Ok(())
    }

    /// Moves the play area to the chunk containing a world-space position.
    pub fn update_play_area_around(&mut self, world: Point3<i32>) -> VoxelResult<()> {
        let center = ChunkPosition::from_world(world, self.world.chunk_size());
        if self.play_area.center() == Some(center) {
            return Ok(());
        }
        self.update_play_area(center)
    }

    pub fn get_block_at(&self, world: Point3<i32>) -> VoxelResult<BlockId> {
        self.world.get_block_at(world)
    }

    /// Writes a block. Affected meshes are redrawn over the following ticks.
    pub fn set_block_at(&mut self, world: Point3<i32>, id: BlockId) -> VoxelResult<()> {
        self.world.set_block_at(world, id)
    }

    /// Advances the engine by one frame.
    ///
    /// Loads at most one requested chunk, moves new world events into the scheduler and
    /// remeshes at most one sub-chunk. Failures are logged and confined to the chunk they
    /// happened in.
    pub fn tick(&mut self) -> TickReport {
        let started = Instant::now();
        self.frame += 1;
        let mut report = TickReport::default();

        if let Some(position) = self.load_queue.pop_front() {
            self.load_pending.remove(&position);
            match self.world.load_chunk(position) {
                Ok(_) => report.loaded = Some(position),
                Err(err) => warn!("Failed to load chunk {}: {}", position, err),
            }
        }

        self.process_world_events();

        if let Some(processed) = self
            .scheduler
            .process_next(&self.world, &self.catalog, &mut self.view)
        {
            match processed.result {
                Ok(_) => report.redrawn = Some(processed.key),
                Err(err) => warn!("Failed to redraw sub-chunk {}: {}", processed.key, err),
            }
        }

        if !report.is_idle() {
            trace!("Frame {}: {:?} in {:?}", self.frame, report, started.elapsed());
        }
        report
    }

    /// `true` once no load, event or redraw is pending.
    pub fn is_idle(&self) -> bool {
        self.load_queue.is_empty() && self.scheduler.is_empty() && !self.world.has_pending_events()
    }

    /// Ticks until idle or until `max_ticks` ticks have run.
    ///
    /// # Returns
    ///
    /// The number of ticks run
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_idle() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Moves world events into the scheduler and the view.
    ///
    /// Unloaded and discarded chunks are released right away so their geometry is not shown
    /// for even one more frame.
    fn process_world_events(&mut self) {
        let subdivisions = self.world.subdivisions();

        for event in self.world.drain_events() {
            match event {
                WorldEvent::MeshInvalidated(key) => {
                    if self.world.is_loaded(key.chunk) {
                        self.scheduler.enqueue(key);
                    }
                }
                WorldEvent::ChunksLoaded(positions) => {
                    for position in positions {
                        self.scheduler.enqueue_chunk(position, subdivisions);
                    }
                }
                WorldEvent::ChunksUnloaded(positions) => {
                    for position in positions {
                        self.scheduler.cancel_chunk(position);
                        self.view.release_chunk(position, subdivisions);
                    }
                }
                WorldEvent::ChunkDiscarded(position) => {
                    self.scheduler.cancel_chunk(position);
                    self.view.release_chunk(position, subdivisions);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::TerrainKind;
    use crate::engine_state::voxels::block::AIR;

    fn settings() -> WorldSettings {
        let mut settings = WorldSettings {
            chunk_size: [8, 16, 8],
            subdivisions: 2,
            play_area_radius: 1,
            ..WorldSettings::default()
        };
        settings.terrain.kind = TerrainKind::Flat;
        settings.terrain.flat_height = 3;
        settings
    }

    #[test]
    fn loads_one_chunk_and_redraws_one_sub_chunk_per_tick() {
        let mut engine = EngineState::new(&settings()).unwrap();
        assert_eq!(
            engine.request_chunk_loads([ChunkPosition::new(0, 0), ChunkPosition::new(1, 0)]),
            2
        );

        let first = engine.tick();
        assert_eq!(first.loaded, Some(ChunkPosition::new(0, 0)));
        assert_eq!(first.redrawn, Some(SubChunkKey::new(ChunkPosition::new(0, 0), 0)));
        assert_eq!(engine.pending_loads(), 1);

        let second = engine.tick();
        assert_eq!(second.loaded, Some(ChunkPosition::new(1, 0)));
        assert_eq!(engine.view.upload_count(), 2);

        engine.run_until_idle(100);
        assert!(engine.is_idle());
        assert_eq!(engine.view.len(), 4);
        assert!(engine.tick().is_idle());
    }

    #[test]
    fn duplicate_load_requests_are_ignored() {
        let mut engine = EngineState::new(&settings()).unwrap();
        engine.request_chunk_loads([ChunkPosition::new(0, 0)]);
        assert_eq!(engine.request_chunk_loads([ChunkPosition::new(0, 0)]), 0);

        engine.run_until_idle(100);
        assert_eq!(engine.request_chunk_loads([ChunkPosition::new(0, 0)]), 0);
    }

    #[test]
    fn edits_are_redrawn_on_following_ticks() {
        let mut engine = EngineState::new(&settings()).unwrap();
        engine.request_chunk_loads([ChunkPosition::new(0, 0)]);
        engine.run_until_idle(100);
        let uploads = engine.view.upload_count();

        engine.set_block_at(Point3::new(4, 12, 4), 1).unwrap();
        assert!(!engine.is_idle());

        let report = engine.tick();
        assert_eq!(report.redrawn, Some(SubChunkKey::new(ChunkPosition::new(0, 0), 1)));
        assert_eq!(engine.view.upload_count(), uploads + 1);
        assert!(engine.is_idle());
    }

    #[test]
    fn edits_in_unloaded_chunks_are_not_redrawn() {
        let mut engine = EngineState::new(&settings()).unwrap();
        engine.set_block_at(Point3::new(-20, 5, 3), 1).unwrap();

        assert!(engine.tick().is_idle());
        assert!(engine.view.is_empty());
        assert_eq!(engine.get_block_at(Point3::new(-20, 5, 3)).unwrap(), 1);
    }

    #[test]
    fn play_area_releases_chunks_that_leave_it() {
        let mut engine = EngineState::new(&settings()).unwrap();
        engine.update_play_area(ChunkPosition::new(0, 0)).unwrap();
        engine.run_until_idle(1000);
        assert_eq!(engine.world.loaded_chunks().count(), 9);
        assert!(engine.view.contains_chunk(ChunkPosition::new(-1, 0)));

        engine.update_play_area_around(Point3::new(8, 0, 0)).unwrap();

        // Released before the next tick.
        assert!(!engine.view.contains_chunk(ChunkPosition::new(-1, 0)));
        assert!(!engine.world.is_loaded(ChunkPosition::new(-1, 0)));
        // Unloading keeps the blocks.
        assert_ne!(engine.world.get_block_at(Point3::new(-8, 0, 0)).unwrap(), AIR);

        engine.run_until_idle(1000);
        assert!(engine.view.contains_chunk(ChunkPosition::new(2, 0)));
        assert_eq!(engine.world.loaded_chunks().count(), 9);
    }
}
