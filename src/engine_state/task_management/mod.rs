//! # Task Management System
//!
//! This module spreads mesh rebuilding over many frames. A burst of invalidations (a chunk
//! load, an explosion, a structure placed across a seam) queues one redraw task per stale
//! sub-chunk, and the engine drains at most one remesh per tick, so no single frame pays
//! for the whole burst.
//!
//! ## Architecture Overview
//!
//! - [`RedrawScheduler`]: deduplicating FIFO of sub-chunk keys
//! - [`task::redraw_sub_chunk`]: the work done for one key
//! - [`task::RedrawOutcome`]: what happened to it
//!
//! ## Scheduling Rules
//! - A key already queued is not queued again; it keeps its original place
//! - [`RedrawScheduler::process_next`] performs at most one remesh per call
//! - Keys whose chunk was unloaded or discarded are dropped when reached, not treated as errors
//! - [`RedrawScheduler::redraw_now`] bypasses the queue for changes that must show at once
//! - Cancellation removes keys before they are processed; a running remesh is never interrupted
//!
//! ## Performance Considerations
//! - **Latency**: between invalidation and redraw a sub-chunk shows its previous mesh
//! - **Memory**: the queue holds keys only, never meshes
//!
//! ## Example Usage
//! ```rust
//! use voxel_engine::engine_state::task_management::RedrawScheduler;
//! use voxel_engine::engine_state::voxels::coordinates::{ChunkPosition, SubChunkKey};
//!
//! let mut scheduler = RedrawScheduler::new();
//! let key = SubChunkKey::new(ChunkPosition::new(0, 0), 3);
//!
//! assert!(scheduler.enqueue(key));
//! assert!(!scheduler.enqueue(key));
//! assert_eq!(scheduler.len(), 1);
//! ```

pub mod task;

use std::collections::{HashSet, VecDeque};

use log::{trace, warn};

use crate::engine_state::error::VoxelResult;
use crate::engine_state::rendering::RenderView;
use crate::engine_state::voxels::block::catalog::BlockCatalog;
use crate::engine_state::voxels::coordinates::{ChunkPosition, SubChunkKey};
use crate::engine_state::voxels::world::World;
use task::{redraw_sub_chunk, RedrawOutcome};

/// Result of one [`RedrawScheduler::process_next`] call that reached a remesh.
#[derive(Debug)]
pub struct ProcessedRedraw {
    pub key: SubChunkKey,
    pub result: VoxelResult<RedrawOutcome>,
}

/// Deduplicating FIFO of sub-chunks waiting for a remesh.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    queued: VecDeque<SubChunkKey>,
    pending: HashSet<SubChunkKey>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sub-chunk for redraw.
    ///
    /// # Returns
    /// `false` if it was already queued
    pub fn enqueue(&mut self, key: SubChunkKey) -> bool {
        if !self.pending.insert(key) {
            return false;
        }
        self.queued.push_back(key);
        true
    }

    /// Queues every sub-chunk of a chunk, bottom to top.
    ///
    /// # Returns
    /// The number of keys that were not queued yet
    pub fn enqueue_chunk(&mut self, chunk: ChunkPosition, subdivisions: usize) -> usize {
        (0..subdivisions)
            .filter(|&index| self.enqueue(SubChunkKey::new(chunk, index)))
            .count()
    }

    pub fn contains(&self, key: SubChunkKey) -> bool {
        self.pending.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Removes one queued key.
    ///
    /// # Returns
    /// `true` if it was queued
    pub fn cancel(&mut self, key: SubChunkKey) -> bool {
        if !self.pending.remove(&key) {
            return false;
        }
        self.queued.retain(|queued| *queued != key);
        true
    }

    /// Removes every queued key of a chunk.
    ///
    /// # Returns
    /// The number of keys removed
    pub fn cancel_chunk(&mut self, chunk: ChunkPosition) -> usize {
        let before = self.queued.len();
        self.queued.retain(|key| key.chunk != chunk);
        self.pending.retain(|key| key.chunk != chunk);
        before - self.queued.len()
    }

    pub fn clear(&mut self) {
        self.queued.clear();
        self.pending.clear();
    }

    /// Pops keys until one needs a remesh, and performs that one remesh.
    ///
    /// Keys of chunks that are missing or unloaded are dropped on the way.
    ///
    /// # Returns
    /// `None` once the queue is empty. A failed remesh is reported in
    /// [`ProcessedRedraw::result`]; the key is not requeued.
    pub fn process_next(
        &mut self,
        world: &World,
        catalog: &BlockCatalog,
        view: &mut dyn RenderView,
    ) -> Option<ProcessedRedraw> {
        while let Some(key) = self.queued.pop_front() {
            self.pending.remove(&key);

            match redraw_sub_chunk(world, key, catalog, view) {
                Ok(outcome) if !outcome.is_uploaded() => {
                    trace!("Skipping redraw of {}: {}", key, outcome);
                }
                result => return Some(ProcessedRedraw { key, result }),
            }
        }
        None
    }

    /// Drains the whole queue in one go.
    ///
    /// # Returns
    /// The number of sub-chunks uploaded. Failures are logged and skipped.
    pub fn process_all(
        &mut self,
        world: &World,
        catalog: &BlockCatalog,
        view: &mut dyn RenderView,
    ) -> usize {
        let mut uploaded = 0;
        while let Some(processed) = self.process_next(world, catalog, view) {
            match processed.result {
                Ok(_) => uploaded += 1,
                Err(err) => warn!("Failed to redraw sub-chunk {}: {}", processed.key, err),
            }
        }
        uploaded
    }

    /// Redraws a sub-chunk immediately, removing it from the queue if it was there.
    pub fn redraw_now(
        &mut self,
        world: &World,
        key: SubChunkKey,
        catalog: &BlockCatalog,
        view: &mut dyn RenderView,
    ) -> VoxelResult<RedrawOutcome> {
        self.cancel(key);
        redraw_sub_chunk(world, key, catalog, view)
    }
}
