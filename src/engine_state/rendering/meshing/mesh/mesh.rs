//! Mesh data structures for voxel rendering.
//!
//! A [`ChunkMesh`] holds the geometry of one sub-chunk as three flat buffers: vertex
//! positions, one UV per vertex, and triangle indices into the vertex buffer. Every face
//! contributes exactly four vertices and six indices.

use cgmath::Point3;

use crate::engine_state::rendering::Vertex;

use super::face::FACE_TRIANGLE_OFFSETS;

/// Geometry of one sub-chunk.
///
/// Positions are chunk-local: add the chunk's world origin to place the mesh in the world.
/// Normals and tangents are left to the consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex positions, four per face
    pub vertices: Vec<[f32; 3]>,
    /// Atlas UV of each vertex
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, six per face
    pub triangles: Vec<u32>,
}

impl ChunkMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the mesh while keeping its allocations for the next build.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.triangles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (a third of the index count).
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of block faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends one quad.
    ///
    /// # Arguments
    /// * `corners` - The four corners, in face template order
    /// * `uvs` - The UV of each corner
    ///
    /// Triangle indices are derived from the vertex count after the corners are appended,
    /// so quads can be pushed one after another without bookkeeping.
    pub fn push_face(&mut self, corners: [Point3<i32>; 4], uvs: [[f32; 2]; 4]) {
        for corner in corners {
            self.vertices
                .push([corner.x as f32, corner.y as f32, corner.z as f32]);
        }
        self.uvs.extend_from_slice(&uvs);

        let last = self.vertices.len() as u32 - 1;
        self.triangles
            .extend(FACE_TRIANGLE_OFFSETS.iter().map(|offset| last - offset));
    }

    /// Builds an interleaved vertex buffer for upload.
    ///
    /// # Returns
    /// One [`Vertex`] per entry in `vertices`, in the same order, so `triangles`
    /// indexes the result directly
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.uvs)
            .map(|(&position, &tex_coords)| Vertex::new(position, tex_coords))
            .collect()
    }
}
