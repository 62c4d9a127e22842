//! Multi-block structures stamped onto generated terrain.

use cgmath::{Point3, Vector3};

use crate::core::CoordinateIterator;
use crate::engine_state::error::VoxelResult;
use crate::engine_state::voxels::block::BlockId;

/// Horizontal reach of a tree's canopy from its trunk.
pub const LEAVES_RADIUS: i32 = 2;
/// Shortest trunk a random tree gets (inclusive).
pub const MIN_TREE_HEIGHT: i32 = 3;
/// Tallest trunk a random tree gets (exclusive).
pub const MAX_TREE_HEIGHT: i32 = 8;

/// A log trunk under a two-layer leaf canopy with a smaller cap on top.
///
/// The structure occupies a `(2r + 1) x (height + r) x (2r + 1)` box with the trunk in the
/// middle column, `r` being [`LEAVES_RADIUS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStructure {
    height: i32,
    log: BlockId,
    leaves: BlockId,
}

impl TreeStructure {
    pub fn new(height: i32, log: BlockId, leaves: BlockId) -> Self {
        TreeStructure {
            height,
            log,
            leaves,
        }
    }

    /// A tree with a trunk height drawn from `rng` in `[MIN_TREE_HEIGHT, MAX_TREE_HEIGHT)`.
    pub fn random(rng: &mut fastrand::Rng, log: BlockId, leaves: BlockId) -> Self {
        Self::new(rng.i32(MIN_TREE_HEIGHT..MAX_TREE_HEIGHT), log, leaves)
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Extent of the structure's bounding box.
    pub fn size(&self) -> Vector3<i32> {
        Vector3::new(
            LEAVES_RADIUS * 2 + 1,
            self.height + LEAVES_RADIUS,
            LEAVES_RADIUS * 2 + 1,
        )
    }

    /// World position of the box's minimum corner for a trunk rooted at `base`.
    pub fn origin(&self, base: Point3<i32>) -> Point3<i32> {
        Point3::new(base.x - LEAVES_RADIUS, base.y, base.z - LEAVES_RADIUS)
    }

    /// Block at a position relative to the box's minimum corner, `None` for empty cells.
    pub fn block_at(&self, relative: Point3<i32>) -> Option<BlockId> {
        let Point3 { x, y, z } = relative;

        if x == LEAVES_RADIUS && z == LEAVES_RADIUS {
            return Some(if y < self.height { self.log } else { self.leaves });
        }

        // Wide canopy on the two layers below the trunk top.
        if y == self.height - 2 || y == self.height - 1 {
            return Some(self.leaves);
        }

        // Narrow cap level with the trunk top.
        let cap = LEAVES_RADIUS / 2..=LEAVES_RADIUS / 2 + LEAVES_RADIUS;
        if y == self.height && cap.contains(&x) && cap.contains(&z) {
            return Some(self.leaves);
        }

        None
    }

    /// Every non-empty block of a tree rooted at `base`, in world space.
    pub fn blocks(&self, base: Point3<i32>) -> VoxelResult<Vec<(Point3<i32>, BlockId)>> {
        let origin = self.origin(base);
        Ok(CoordinateIterator::new(self.size(), Point3::new(0, 0, 0))?
            .filter_map(|relative| {
                self.block_at(relative).map(|id| {
                    (
                        Point3::new(
                            origin.x + relative.x,
                            origin.y + relative.y,
                            origin.z + relative.z,
                        ),
                        id,
                    )
                })
            })
            .collect())
    }
}
