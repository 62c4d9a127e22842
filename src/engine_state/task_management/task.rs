//! # Redraw Task
//!
//! The unit of work of the redraw scheduler: bring the view's copy of one sub-chunk mesh
//! up to date. A task rebuilds the mesh only if it was invalidated, otherwise it re-uploads
//! the cached one.
//!
//! ## Task Lifecycle
//! 1. A [`SubChunkKey`] is queued in the `RedrawScheduler`
//! 2. The scheduler pops it on a tick and calls [`redraw_sub_chunk`]
//! 3. The chunk is write-locked, its neighbors read-locked while the mesh is rebuilt
//! 4. The finished mesh is borrowed straight from the cache into [`RenderView::upload`]
//!
//! Chunks that were unloaded or discarded while the task waited are skipped.

use std::fmt;

use log::debug;
use web_time::Instant;

use crate::engine_state::error::VoxelResult;
use crate::engine_state::rendering::RenderView;
use crate::engine_state::voxels::block::catalog::BlockCatalog;
use crate::engine_state::voxels::coordinates::SubChunkKey;
use crate::engine_state::voxels::world::World;

/// What a redraw task did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// The mesh was handed to the view
    Uploaded {
        /// Number of quads in the uploaded mesh
        faces: usize,
    },
    /// The chunk is no longer in the world
    ChunkMissing,
    /// The chunk exists but is not loaded
    ChunkUnloaded,
}

impl RedrawOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, RedrawOutcome::Uploaded { .. })
    }
}

impl fmt::Display for RedrawOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedrawOutcome::Uploaded { faces } => write!(f, "uploaded {faces} faces"),
            RedrawOutcome::ChunkMissing => write!(f, "chunk missing"),
            RedrawOutcome::ChunkUnloaded => write!(f, "chunk unloaded"),
        }
    }
}

/// Remeshes one sub-chunk if needed and uploads it to `view`.
///
/// # Arguments
/// * `world` - Registry owning the chunk; not modified
/// * `key` - Sub-chunk to redraw
/// * `catalog` - Block definitions for the mesher
/// * `view` - Receives the mesh
///
/// # Errors
/// Meshing errors, e.g. [`crate::engine_state::error::VoxelError::MissingBlockModel`].
/// Nothing is uploaded in that case.
pub fn redraw_sub_chunk(
    world: &World,
    key: SubChunkKey,
    catalog: &BlockCatalog,
    view: &mut dyn RenderView,
) -> VoxelResult<RedrawOutcome> {
    let Some(chunk) = world.get_chunk(key.chunk) else {
        return Ok(RedrawOutcome::ChunkMissing);
    };
    if !world.is_loaded(key.chunk) {
        return Ok(RedrawOutcome::ChunkUnloaded);
    }

    let started = Instant::now();
    let mut chunk = chunk.get_mut();
    let origin = chunk.world_position();
    let mesh = chunk.sub_chunk_mesh(key.index, catalog)?;
    let faces = mesh.face_count();
    view.upload(key, origin, mesh);

    debug!("Redrew sub-chunk {} ({} faces) in {:?}", key, faces, started.elapsed());
    Ok(RedrawOutcome::Uploaded { faces })
}
