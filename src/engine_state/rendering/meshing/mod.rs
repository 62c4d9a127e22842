//! Mesh generation for voxel rendering.
//!
//! This module handles the conversion of voxel data into renderable geometry, one
//! sub-chunk at a time.
//!
//! # Architecture
//! - `mesh::ChunkMesh`: Vertex, UV and triangle buffers of one sub-chunk
//! - `mesh::face`: Unit-cube corner and triangle templates for each block face
//! - `mesh::culled`: The face-culling mesher
//!
//! Meshes are cached on their sub-chunk and only rebuilt after an invalidation, see
//! [`crate::engine_state::voxels::chunk::Chunk::sub_chunk_mesh`].
//!
//! # Performance Considerations
//! - Faces between two opaque blocks are never emitted
//! - Mesh buffers are cleared and refilled in place, so steady-state remeshing does not allocate
//! - Neighbor chunks are locked once per build, not once per block

pub mod mesh;

pub use mesh::ChunkMesh;
