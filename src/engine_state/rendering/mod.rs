//! Rendering system for the voxel engine.
//!
//! The engine core stops at geometry: it builds one [`ChunkMesh`] per sub-chunk and hands
//! finished meshes to a [`RenderView`]. The view owns everything backend specific (normal
//! and tangent computation, GPU upload, collision meshes). [`MeshStore`] is an in-memory
//! view used by the headless binary and by tests.

use std::collections::HashMap;

use cgmath::Point3;
use log::trace;

use super::voxels::coordinates::{ChunkPosition, SubChunkKey};

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::ChunkMesh;
pub use vertex::Vertex;

/// Consumer of finished sub-chunk meshes.
pub trait RenderView {
    /// Receives a freshly built mesh, replacing whatever was shown for `key`.
    ///
    /// # Arguments
    /// * `key` - Sub-chunk the mesh belongs to
    /// * `origin` - World position of the owning chunk's origin; mesh vertices are relative to it
    /// * `mesh` - The geometry, borrowed from the sub-chunk's cache
    fn upload(&mut self, key: SubChunkKey, origin: Point3<i32>, mesh: &ChunkMesh);

    /// Stops showing the mesh of one sub-chunk.
    fn release(&mut self, key: SubChunkKey);

    /// Stops showing every sub-chunk of a chunk.
    fn release_chunk(&mut self, chunk: ChunkPosition, subdivisions: usize) {
        for index in 0..subdivisions {
            self.release(SubChunkKey::new(chunk, index));
        }
    }
}

/// A mesh as last uploaded to a [`MeshStore`].
#[derive(Debug, Clone)]
pub struct StoredMesh {
    pub origin: Point3<i32>,
    pub mesh: ChunkMesh,
}

/// In-memory [`RenderView`] keeping a copy of every uploaded mesh.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_engine::engine_state::rendering::{ChunkMesh, MeshStore, RenderView};
/// use voxel_engine::engine_state::voxels::coordinates::{ChunkPosition, SubChunkKey};
///
/// let mut store = MeshStore::new();
/// let key = SubChunkKey::new(ChunkPosition::new(0, 0), 2);
///
/// store.upload(key, Point3::new(0, 0, 0), &ChunkMesh::new());
/// assert!(store.contains(key));
///
/// store.release(key);
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: HashMap<SubChunkKey, StoredMesh>,
    uploads: usize,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SubChunkKey) -> Option<&StoredMesh> {
        self.meshes.get(&key)
    }

    pub fn contains(&self, key: SubChunkKey) -> bool {
        self.meshes.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total number of uploads received, including replacements.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Returns `true` if any sub-chunk of `chunk` is shown.
    pub fn contains_chunk(&self, chunk: ChunkPosition) -> bool {
        self.meshes.keys().any(|key| key.chunk == chunk)
    }

    /// Sum of faces over every shown mesh.
    pub fn total_faces(&self) -> usize {
        self.meshes.values().map(|stored| stored.mesh.face_count()).sum()
    }
}

impl RenderView for MeshStore {
    fn upload(&mut self, key: SubChunkKey, origin: Point3<i32>, mesh: &ChunkMesh) {
        trace!("Storing mesh {} ({} faces)", key, mesh.face_count());
        self.uploads += 1;
        match self.meshes.get_mut(&key) {
            Some(stored) => {
                stored.origin = origin;
                stored.mesh.clone_from(mesh);
            }
            None => {
                self.meshes.insert(
                    key,
                    StoredMesh {
                        origin,
                        mesh: mesh.clone(),
                    },
                );
            }
        }
    }

    fn release(&mut self, key: SubChunkKey) {
        self.meshes.remove(&key);
    }

    fn release_chunk(&mut self, chunk: ChunkPosition, _subdivisions: usize) {
        self.meshes.retain(|key, _| key.chunk != chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_replaces_previous_mesh() {
        let mut store = MeshStore::new();
        let key = SubChunkKey::new(ChunkPosition::new(1, 1), 0);

        let mut mesh = ChunkMesh::new();
        store.upload(key, Point3::new(16, 0, 16), &mesh);

        mesh.push_face(
            [Point3::new(0, 0, 0); 4],
            [[0.0, 0.0]; 4],
        );
        store.upload(key, Point3::new(16, 0, 16), &mesh);

        assert_eq!(store.len(), 1);
        assert_eq!(store.upload_count(), 2);
        assert_eq!(store.total_faces(), 1);
    }

    #[test]
    fn release_chunk_drops_every_slab() {
        let mut store = MeshStore::new();
        let chunk = ChunkPosition::new(0, 0);
        let other = ChunkPosition::new(1, 0);
        for index in 0..3 {
            store.upload(SubChunkKey::new(chunk, index), Point3::new(0, 0, 0), &ChunkMesh::new());
        }
        store.upload(SubChunkKey::new(other, 0), Point3::new(16, 0, 0), &ChunkMesh::new());

        store.release_chunk(chunk, 3);

        assert!(!store.contains_chunk(chunk));
        assert!(store.contains_chunk(other));
    }
}
