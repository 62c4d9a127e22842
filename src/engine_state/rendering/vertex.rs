//! Vertex data structures for uploading voxel meshes.
//!
//! The mesher keeps positions, UVs and indices in separate buffers. A rendering backend
//! that wants a single interleaved vertex buffer converts through [`Vertex`], whose layout
//! is fixed and safe to hand to the GPU as raw bytes.

/// A single interleaved mesh vertex.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local block units
/// - Texture Coordinates: [f32; 2] (8 bytes), normalized atlas UVs
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the owning chunk's origin
    pub position: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes, the stride of an interleaved buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - The vertex position relative to the chunk origin
    /// * `tex_coords` - Normalized texture atlas coordinates
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            tex_coords,
        }
    }
}
