//! # Coordinate Iterator
//!
//! A single-loop replacement for the three nested `x`/`z`/`y` loops that walk a box of
//! block positions. Every volume traversal in the engine (meshing a sub-chunk,
//! filling a chunk column, stamping a structure, computing a play area) goes through
//! this type so that they all share one enumeration order.
//!
//! ## Enumeration Order
//!
//! X increments fastest (a full row), then Z (a full horizontal layer), then Y
//! (the next layer up). This matches the flat block layout of a chunk
//! (`offset = y * size_x * size_z + z * size_x + x`), so walking a chunk with a
//! zero-offset iterator visits its block buffer front to back.

use cgmath::{Point3, Vector3};

use crate::engine_state::error::{VoxelError, VoxelResult};

/// A restartable cursor over every integer coordinate inside `offset .. offset + size`.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_engine::core::CoordinateIterator;
///
/// let iterator = CoordinateIterator::new(Vector3::new(2, 2, 2), Point3::new(0, 0, 0)).unwrap();
/// let visited: Vec<_> = iterator.collect();
///
/// assert_eq!(visited.len(), 8);
/// assert_eq!(visited[0], Point3::new(0, 0, 0));
/// assert_eq!(visited[1], Point3::new(1, 0, 0));
/// assert_eq!(visited[2], Point3::new(0, 0, 1));
/// assert_eq!(visited[4], Point3::new(0, 1, 0));
/// ```
///
/// # Thread Safety
/// Single cursor, single consumer. Clone it to walk the same box twice at once.
#[derive(Debug, Clone)]
pub struct CoordinateIterator {
    size: Vector3<i32>,
    offset: Point3<i32>,
    /// Last coordinate produced, inclusive (`offset + size - 1`)
    target: Point3<i32>,
    current: Point3<i32>,
    /// Sequential index of `current`, `None` before the first call to `next`
    index: Option<usize>,
    volume: usize,
}

impl CoordinateIterator {
    /// Creates an iterator positioned before the first coordinate.
    ///
    /// # Arguments
    /// * `size` - Extent of the box, every component must be greater than zero
    /// * `offset` - First coordinate of the box
    ///
    /// # Errors
    /// [`VoxelError::InvalidSize`] if any component of `size` is zero or negative.
    pub fn new(size: Vector3<i32>, offset: Point3<i32>) -> VoxelResult<Self> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(VoxelError::InvalidSize {
                x: size.x,
                y: size.y,
                z: size.z,
            });
        }

        Ok(CoordinateIterator {
            size,
            offset,
            target: offset + size - Vector3::new(1, 1, 1),
            current: Point3::new(offset.x - 1, offset.y, offset.z),
            index: None,
            volume: size.x as usize * size.y as usize * size.z as usize,
        })
    }

    /// Places the cursor back before the first coordinate.
    pub fn reset(&mut self) {
        self.index = None;
        self.current = Point3::new(self.offset.x - 1, self.offset.y, self.offset.z);
    }

    pub fn size(&self) -> Vector3<i32> {
        self.size
    }

    pub fn offset(&self) -> Point3<i32> {
        self.offset
    }

    /// Last coordinate of the box (inclusive).
    pub fn target(&self) -> Point3<i32> {
        self.target
    }

    /// Total number of coordinates (`size.x * size.y * size.z`).
    pub fn volume(&self) -> usize {
        self.volume
    }

    /// Sequential index of the coordinate most recently returned by `next`.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns `true` if `position` lies inside the box.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        (self.offset.x..=self.target.x).contains(&position.x)
            && (self.offset.y..=self.target.y).contains(&position.y)
            && (self.offset.z..=self.target.z).contains(&position.z)
    }

    /// Computes the sequential index `position` would be produced at, without iterating.
    pub fn index_of(&self, position: Point3<i32>) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let relative = position - self.offset;
        Some(
            relative.y as usize * self.size.x as usize * self.size.z as usize
                + relative.z as usize * self.size.x as usize
                + relative.x as usize,
        )
    }

    /// Inverse of [`CoordinateIterator::index_of`].
    pub fn position_at(&self, index: usize) -> Option<Point3<i32>> {
        if index >= self.volume {
            return None;
        }
        let row = self.size.x as usize;
        let layer = row * self.size.z as usize;
        Some(Point3::new(
            self.offset.x + (index % row) as i32,
            self.offset.y + (index / layer) as i32,
            self.offset.z + (index % layer / row) as i32,
        ))
    }

    fn remaining(&self) -> usize {
        match self.index {
            None => self.volume,
            Some(index) => self.volume - index - 1,
        }
    }
}

impl Iterator for CoordinateIterator {
    type Item = Point3<i32>;

    fn next(&mut self) -> Option<Point3<i32>> {
        if self.current.x < self.target.x {
            self.current.x += 1;
        } else if self.current.z < self.target.z {
            self.current.z += 1;
            self.current.x = self.offset.x;
        } else if self.current.y < self.target.y {
            self.current.y += 1;
            self.current.x = self.offset.x;
            self.current.z = self.offset.z;
        } else {
            return None;
        }

        self.index = Some(self.index.map_or(0, |index| index + 1));
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CoordinateIterator {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn rejects_non_positive_sizes() {
        for size in [
            Vector3::new(0, 1, 1),
            Vector3::new(1, 0, 1),
            Vector3::new(1, 1, -3),
        ] {
            assert!(matches!(
                CoordinateIterator::new(size, Point3::new(0, 0, 0)),
                Err(VoxelError::InvalidSize { .. })
            ));
        }
    }

    #[test]
    fn yields_every_coordinate_exactly_once() {
        let size = Vector3::new(3, 4, 5);
        let offset = Point3::new(-2, 7, -9);
        let iterator = CoordinateIterator::new(size, offset).unwrap();
        assert_eq!(iterator.len(), 60);

        let visited: Vec<_> = iterator.collect();
        let unique: HashSet<_> = visited.iter().map(|p| (p.x, p.y, p.z)).collect();

        assert_eq!(visited.len(), 60);
        assert_eq!(unique.len(), 60);
        assert_eq!(visited.first(), Some(&offset));
        assert_eq!(visited.last(), Some(&Point3::new(0, 10, -5)));
        for p in &visited {
            assert!((-2..=0).contains(&p.x));
            assert!((7..=10).contains(&p.y));
            assert!((-9..=-5).contains(&p.z));
        }
    }

    #[test]
    fn x_then_z_then_y() {
        let visited: Vec<_> = CoordinateIterator::new(Vector3::new(2, 2, 2), Point3::new(0, 0, 0))
            .unwrap()
            .collect();

        assert_eq!(
            visited,
            vec![
                Point3::new(0, 0, 0),
                Point3::new(1, 0, 0),
                Point3::new(0, 0, 1),
                Point3::new(1, 0, 1),
                Point3::new(0, 1, 0),
                Point3::new(1, 1, 0),
                Point3::new(0, 1, 1),
                Point3::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn reset_restores_identical_order() {
        let mut iterator =
            CoordinateIterator::new(Vector3::new(3, 2, 2), Point3::new(5, 5, 5)).unwrap();
        let first: Vec<_> = iterator.by_ref().collect();
        assert!(iterator.next().is_none());

        iterator.reset();
        assert_eq!(iterator.index(), None);
        let second: Vec<_> = iterator.by_ref().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn index_tracks_enumeration() {
        let mut iterator =
            CoordinateIterator::new(Vector3::new(4, 3, 2), Point3::new(1, -1, 3)).unwrap();

        let mut expected = 0;
        while let Some(position) = iterator.next() {
            assert_eq!(iterator.index(), Some(expected));
            assert_eq!(iterator.index_of(position), Some(expected));
            assert_eq!(iterator.position_at(expected), Some(position));
            expected += 1;
        }
        assert_eq!(expected, iterator.volume());
        assert_eq!(iterator.position_at(expected), None);
        assert_eq!(iterator.index_of(Point3::new(0, 0, 0)), None);
    }

    #[test]
    fn single_cell_box() {
        let mut iterator =
            CoordinateIterator::new(Vector3::new(1, 1, 1), Point3::new(-4, 2, 9)).unwrap();

        assert_eq!(iterator.next(), Some(Point3::new(-4, 2, 9)));
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.size_hint(), (0, Some(0)));
    }
}
