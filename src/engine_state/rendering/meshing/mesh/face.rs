//! Geometry templates for the six faces of a unit block.
//!
//! Corners of the unit cube are numbered once, and each face lists four of them. The
//! tables are indexed by [`BlockSide`] discriminant.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Corners of the unit cube: the bottom square counter-clockwise from the origin, then
/// the top square in the same order.
pub const CUBE_CORNERS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 0, 1],
    [0, 0, 1],
    [0, 1, 0],
    [1, 1, 0],
    [1, 1, 1],
    [0, 1, 1],
];

/// The four corners of each face, in [`BlockSide`] order.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [1, 2, 6, 5], // RIGHT
    [3, 0, 4, 7], // LEFT
    [4, 5, 6, 7], // TOP
    [3, 2, 1, 0], // BOTTOM
    [2, 3, 7, 6], // FRONT
    [0, 1, 5, 4], // BACK
];

/// Two triangles over a face's four corners, as offsets back from the last vertex pushed.
///
/// After pushing the four corners of a face, the index of each triangle vertex is
/// `vertex_count - 1 - offset`. Faces are appended to a flat buffer without tracking where
/// each one starts.
pub const FACE_TRIANGLE_OFFSETS: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Positions of a face's four corners for the block at `block`.
///
/// # Arguments
/// * `block` - Position of the block's minimum corner
/// * `side` - Which face to build
///
/// # Returns
/// The four corner positions, in the order the UV corners are assigned
pub fn face_corners(block: Point3<i32>, side: BlockSide) -> [Point3<i32>; 4] {
    FACE_CORNERS[side.index()].map(|corner| {
        let [x, y, z] = CUBE_CORNERS[corner];
        Point3::new(block.x + x, block.y + y, block.z + z)
    })
}
