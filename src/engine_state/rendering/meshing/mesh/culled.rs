//! Face-culling mesher for sub-chunks.
//!
//! Every non-air block in the slab is visited once. Each of its six faces is emitted only
//! when the block it touches lets it show through:
//!
//! - air, or nothing at all (above or below the chunk column), shows the face
//! - a block in an unlinked neighbor chunk shows the face, and the link later
//!   invalidates the slab so the seam is rebuilt with real data
//! - an opaque block hides the face
//! - a transparent block shows the face, unless both blocks share an id whose model
//!   hides connecting faces (water next to water renders as one volume)
//!
//! Neighbor lookups that cross the slab's vertical boundary read the parent chunk
//! directly; lookups across the chunk's horizontal edge read the linked neighbor chunk.

use std::sync::RwLockReadGuard;

use cgmath::Point3;

use crate::core::floored::floor_mod;
use crate::core::MtResource;
use crate::engine_state::error::VoxelResult;
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, catalog::BlockCatalog, BlockId, AIR},
    chunk::{neighbor::Neighbor, Chunk},
};

use super::{face::face_corners, mesh::ChunkMesh};

/// Read access to a chunk and its four neighbors for the duration of one mesh build.
struct NeighborhoodView<'a> {
    chunk: &'a Chunk,
    neighbors: [Option<RwLockReadGuard<'a, Chunk>>; 4],
}

impl NeighborhoodView<'_> {
    /// Block touching `position` from outside or inside the chunk.
    ///
    /// # Returns
    /// `None` when there is nothing to test against: outside the column vertically, or in
    /// a neighbor chunk that is not linked
    fn block_at(&self, position: Point3<i32>) -> Option<BlockId> {
        let size = self.chunk.size();
        if position.y < 0 || position.y >= size.y {
            return None;
        }

        let direction = if position.x < 0 {
            Some(Neighbor::WEST)
        } else if position.x >= size.x {
            Some(Neighbor::EAST)
        } else if position.z < 0 {
            Some(Neighbor::NORTH)
        } else if position.z >= size.z {
            Some(Neighbor::SOUTH)
        } else {
            None
        };

        match direction {
            None => Some(self.chunk.block_in_bounds(position)),
            Some(direction) => {
                let neighbor = self.neighbors[direction.index()].as_ref()?;
                let local = Point3::new(
                    floor_mod(position.x, size.x),
                    position.y,
                    floor_mod(position.z, size.z),
                );
                neighbor.get_block_at_local(local).ok()
            }
        }
    }
}

/// Rebuilds the mesh of one sub-chunk of `chunk` into `mesh`.
///
/// `mesh` is cleared first and its buffers reused. Positions are chunk-local.
///
/// # Arguments
/// * `chunk` - Parent chunk of the slab
/// * `index` - Sub-chunk index
/// * `catalog` - Block metadata
/// * `mesh` - Output buffers
///
/// # Errors
/// - [`crate::engine_state::error::VoxelError::SubChunkIndexOutOfRange`] for a bad index
/// - [`crate::engine_state::error::VoxelError::MissingBlockModel`] when a block in the slab,
///   or a block touching one, has no catalog entry
pub fn mesh_sub_chunk(
    chunk: &Chunk,
    index: usize,
    catalog: &BlockCatalog,
    mesh: &mut ChunkMesh,
) -> VoxelResult<()> {
    mesh.clear();

    let sub_chunk = chunk.sub_chunk(index)?;
    let linked: [Option<MtResource<Chunk>>; 4] =
        Neighbor::all().map(|direction| chunk.neighbor(direction));
    let view = NeighborhoodView {
        chunk,
        neighbors: linked
            .each_ref()
            .map(|neighbor| neighbor.as_ref().map(MtResource::get)),
    };

    for position in sub_chunk.local_iterator()? {
        let block = chunk.block_in_bounds(position);
        if block == AIR {
            continue;
        }
        let model = catalog.require(block)?;

        for side in BlockSide::all() {
            let visible = match view.block_at(position + side.normal()) {
                None | Some(AIR) => true,
                Some(touching) => {
                    let touching_model = catalog.require(touching)?;
                    touching_model.transparent
                        && !(block == touching && model.hide_connecting_faces)
                }
            };

            if visible {
                mesh.push_face(
                    face_corners(position, side),
                    catalog.atlas_uvs(model.texture_index(side)),
                );
            }
        }
    }

    Ok(())
}
