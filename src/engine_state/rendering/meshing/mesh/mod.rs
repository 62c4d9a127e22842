//! Core mesh data structures and the face-culling mesher.

pub mod culled;
pub mod face;
#[allow(clippy::module_inception)]
pub mod mesh;

pub use mesh::ChunkMesh;
