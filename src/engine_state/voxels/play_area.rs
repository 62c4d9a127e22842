//! Square area of loaded chunks that follows a centre position, typically the player.

use cgmath::{Point3, Vector3};

use crate::core::CoordinateIterator;
use crate::engine_state::error::VoxelResult;
use crate::engine_state::voxels::coordinates::ChunkPosition;
use crate::engine_state::voxels::world::World;

/// Chunks to load and unload after the play area moved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayAreaChange {
    /// Chunks inside the area that are not loaded, nearest to the centre first
    pub to_load: Vec<ChunkPosition>,
    /// Loaded chunks outside the area
    pub to_unload: Vec<ChunkPosition>,
}

impl PlayAreaChange {
    pub fn is_empty(&self) -> bool {
        self.to_load.is_empty() && self.to_unload.is_empty()
    }
}

/// Keeps every chunk within `radius` (Chebyshev distance) of a centre loaded.
#[derive(Debug, Clone)]
pub struct PlayableArea {
    radius: i32,
    center: Option<ChunkPosition>,
}

impl PlayableArea {
    pub fn new(radius: u32) -> Self {
        PlayableArea {
            radius: i32::try_from(radius).unwrap_or(i32::MAX / 2),
            center: None,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// The centre passed to the last [`PlayableArea::update`].
    pub fn center(&self) -> Option<ChunkPosition> {
        self.center
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.center
            .is_some_and(|center| center.chebyshev_distance(position) <= self.radius)
    }

    /// Every chunk position of the area around `center`, nearest first.
    pub fn positions(&self, center: ChunkPosition) -> VoxelResult<Vec<ChunkPosition>> {
        let side = self.radius * 2 + 1;
        let iterator = CoordinateIterator::new(
            Vector3::new(side, 1, side),
            Point3::new(center.x - self.radius, 0, center.z - self.radius),
        )?;

        let mut positions: Vec<ChunkPosition> = iterator
            .map(|point| ChunkPosition::new(point.x, point.z))
            .collect();
        positions.sort_by_key(|position| center.chebyshev_distance(*position));
        Ok(positions)
    }

    /// Moves the area to `center` and compares it with what `world` has loaded.
    ///
    /// The world is not modified; the caller applies the change.
    pub fn update(&mut self, center: ChunkPosition, world: &World) -> VoxelResult<PlayAreaChange> {
        let to_load = self
            .positions(center)?
            .into_iter()
            .filter(|position| !world.is_loaded(*position))
            .collect();

        self.center = Some(center);
        let mut to_unload: Vec<ChunkPosition> = world
            .loaded_chunks()
            .filter(|position| !self.contains(*position))
            .collect();
        to_unload.sort();

        Ok(PlayAreaChange { to_load, to_unload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::{TerrainKind, WorldSettings};
    use crate::engine_state::voxels::block::catalog::BlockCatalog;
    use crate::engine_state::voxels::generation;

    fn world() -> World {
        let mut settings = WorldSettings {
            chunk_size: [8, 16, 8],
            subdivisions: 2,
            ..WorldSettings::default()
        };
        settings.terrain.kind = TerrainKind::Flat;
        let catalog = BlockCatalog::builtin().unwrap();
        World::new(&settings, generation::from_settings(&settings.terrain, &catalog).unwrap()).unwrap()
    }

    #[test]
    fn positions_cover_the_square_nearest_first() {
        let area = PlayableArea::new(1);
        let positions = area.positions(ChunkPosition::new(5, -2)).unwrap();

        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], ChunkPosition::new(5, -2));
        assert!(positions.contains(&ChunkPosition::new(4, -3)));
        assert!(positions.contains(&ChunkPosition::new(6, -1)));
    }

    #[test]
    fn zero_radius_is_a_single_chunk() {
        let area = PlayableArea::new(0);
        assert_eq!(
            area.positions(ChunkPosition::new(1, 1)).unwrap(),
            vec![ChunkPosition::new(1, 1)]
        );
    }

    #[test]
    fn moving_reports_chunks_that_left_and_entered() {
        let mut world = world();
        let mut area = PlayableArea::new(1);

        let change = area.update(ChunkPosition::new(0, 0), &world).unwrap();
        assert_eq!(change.to_load.len(), 9);
        assert!(change.to_unload.is_empty());
        world.load_chunks(change.to_load).unwrap();

        assert!(area.update(ChunkPosition::new(0, 0), &world).unwrap().is_empty());

        let change = area.update(ChunkPosition::new(1, 0), &world).unwrap();
        assert_eq!(
            change.to_unload,
            vec![
                ChunkPosition::new(-1, -1),
                ChunkPosition::new(-1, 0),
                ChunkPosition::new(-1, 1),
            ]
        );
        assert_eq!(change.to_load.len(), 3);
        assert!(change.to_load.iter().all(|position| position.x == 2));
    }
}
