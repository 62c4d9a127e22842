//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the unit normal of each.
//! The discriminants double as indices into per-face tables (texture indices in the
//! catalog, vertex templates in the mesher).

use cgmath::Vector3;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK], i.e. +X, -X, +Y, -Y, +Z, -Z.
/// Catalog texture arrays are written in this order.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The right face (facing positive X)
    RIGHT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in table order.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Looks a face up by its table index.
    ///
    /// # Returns
    /// `None` for indices past 5
    pub fn from_index(index: usize) -> Option<BlockSide> {
        BlockSide::from_usize(index)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector pointing out of the face, toward the block it touches.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// The face on the touching block that shares this face's plane.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_index(side.index()), Some(side));
        }
        assert_eq!(BlockSide::from_index(6), None);
    }

    #[test]
    fn opposite_normals_cancel() {
        for side in BlockSide::all() {
            assert_eq!(side.normal() + side.opposite().normal(), Vector3::new(0, 0, 0));
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
