//! Horizontal neighbor directions between chunk columns.
//!
//! Axis convention: East is +X, West is -X, South is +Z and North is -Z. The z names are
//! the reverse of compass intuition and match the world's block-face convention
//! (`BlockSide::FRONT` faces +Z, toward the South neighbor).

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// One of the four chunk columns sharing a vertical face with a chunk.
///
/// The discriminant is the slot of the neighbor in a chunk's link array.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum Neighbor {
    /// +X
    EAST = 0,
    /// -Z
    NORTH = 1,
    /// -X
    WEST = 2,
    /// +Z
    SOUTH = 3,
}

impl Neighbor {
    pub fn all() -> [Neighbor; 4] {
        [
            Neighbor::EAST,
            Neighbor::NORTH,
            Neighbor::WEST,
            Neighbor::SOUTH,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Neighbor> {
        Neighbor::from_usize(index)
    }

    /// Offset `(dx, dz)` in chunk units from a chunk to this neighbor.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Neighbor::EAST => (1, 0),
            Neighbor::NORTH => (0, -1),
            Neighbor::WEST => (-1, 0),
            Neighbor::SOUTH => (0, 1),
        }
    }

    /// The direction that points back from the neighbor.
    pub fn opposite(self) -> Neighbor {
        match self {
            Neighbor::EAST => Neighbor::WEST,
            Neighbor::NORTH => Neighbor::SOUTH,
            Neighbor::WEST => Neighbor::EAST,
            Neighbor::SOUTH => Neighbor::NORTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        assert_eq!(Neighbor::EAST.opposite(), Neighbor::WEST);
        assert_eq!(Neighbor::NORTH.opposite(), Neighbor::SOUTH);
        for direction in Neighbor::all() {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dx, dz) = direction.offset();
            let (ox, oz) = direction.opposite().offset();
            assert_eq!((dx + ox, dz + oz), (0, 0));
        }
    }

    #[test]
    fn indices_match_slots() {
        for (slot, direction) in Neighbor::all().into_iter().enumerate() {
            assert_eq!(direction.index(), slot);
            assert_eq!(Neighbor::from_index(slot), Some(direction));
        }
        assert_eq!(Neighbor::from_index(4), None);
    }
}
