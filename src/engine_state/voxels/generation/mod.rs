//! # Terrain Generation
//!
//! Terrain is produced by a [`TerrainGenerator`], which the world registry calls exactly
//! once per chunk, right after allocating it. The generator fills the chunk's block buffer
//! in place. Writes that land outside the chunk (a tree planted near an edge) are
//! collected in the [`GenerationContext`] and applied by the registry afterwards.
//!
//! ## Generators
//! - [`flat::FlatTerrainGenerator`]: level layers, deterministic, used by tests
//! - [`plains::PlainsTerrainGenerator`]: octave Perlin height-map with water and trees

use cgmath::Point3;

use super::block::catalog::BlockCatalog;
use super::block::BlockId;
use super::chunk::Chunk;
use super::coordinates::split_world;
use crate::engine_state::config::{TerrainKind, TerrainSettings};
use crate::engine_state::error::{VoxelError, VoxelResult};

pub mod flat;
pub mod plains;
pub mod structures;

/// Fills freshly created chunks with terrain.
pub trait TerrainGenerator: Send {
    /// One-time setup (seeding, noise tables) before the first chunk is generated.
    fn initialize(&mut self);

    /// Populates `chunk`'s blocks. The chunk arrives all air with its position set.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to fill
    /// * `context` - Receives writes outside `chunk`
    fn generate(&mut self, chunk: &mut Chunk, context: &mut GenerationContext)
        -> VoxelResult<()>;
}

/// Builds the generator described by `settings`.
///
/// The world calls [`TerrainGenerator::initialize`] when it takes ownership.
pub fn from_settings(
    settings: &TerrainSettings,
    catalog: &BlockCatalog,
) -> VoxelResult<Box<dyn TerrainGenerator>> {
    let palette = TerrainPalette::from_catalog(catalog)?;
    let generator: Box<dyn TerrainGenerator> = match settings.kind {
        TerrainKind::Flat => Box::new(flat::FlatTerrainGenerator::new(
            settings.flat_height,
            palette,
        )),
        TerrainKind::Plains => Box::new(plains::PlainsTerrainGenerator::new(
            settings.clone(),
            palette,
        )),
    };
    Ok(generator)
}

/// Block ids the built-in generators place, looked up by name once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainPalette {
    pub bedrock: BlockId,
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub water: BlockId,
    pub log: BlockId,
    pub leaves: BlockId,
}

impl TerrainPalette {
    /// Resolves every palette entry from the catalog.
    ///
    /// # Errors
    /// [`VoxelError::UnknownBlockName`] naming the first block the catalog lacks
    pub fn from_catalog(catalog: &BlockCatalog) -> VoxelResult<Self> {
        let lookup = |name: &str| {
            catalog
                .id_by_name(name)
                .ok_or_else(|| VoxelError::UnknownBlockName(name.to_string()))
        };
        Ok(TerrainPalette {
            bedrock: lookup("bedrock")?,
            stone: lookup("stone")?,
            dirt: lookup("dirt")?,
            grass: lookup("grass")?,
            water: lookup("water")?,
            log: lookup("log")?,
            leaves: lookup("leaves")?,
        })
    }

    /// Soil layering of one terrain column.
    ///
    /// Bedrock at the bottom, a grass cap on dry columns, four blocks of dirt under the
    /// surface, stone below that.
    pub fn column_block(&self, y: i32, height: i32, dry: bool) -> BlockId {
        if y == 0 {
            self.bedrock
        } else if dry && y == height - 1 {
            self.grass
        } else if y > height - 5 {
            self.dirt
        } else {
            self.stone
        }
    }
}

/// A block write requested by a generator outside the chunk being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpilledBlock {
    pub world: Point3<i32>,
    pub id: BlockId,
}

/// Side channel for writes a generator cannot apply to its own chunk.
#[derive(Debug, Default)]
pub struct GenerationContext {
    spilled: Vec<SpilledBlock>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a block by world position, into `chunk` when it owns the position and into
    /// the spill list otherwise.
    ///
    /// # Errors
    /// [`VoxelError::WorldHeightOutOfRange`] if `world.y` is outside the chunk column
    pub fn set_block(
        &mut self,
        chunk: &mut Chunk,
        world: Point3<i32>,
        id: BlockId,
    ) -> VoxelResult<()> {
        let height = chunk.size().y;
        if world.y < 0 || world.y >= height {
            return Err(VoxelError::WorldHeightOutOfRange { y: world.y, height });
        }

        let (position, local) = split_world(world, chunk.size());
        if position == chunk.position() {
            chunk.set_block_at_local(local, id)
        } else {
            self.set_block_at_world(world, id);
            Ok(())
        }
    }

    /// Records a write for the registry to route through the world after generation.
    pub fn set_block_at_world(&mut self, world: Point3<i32>, id: BlockId) {
        self.spilled.push(SpilledBlock { world, id });
    }

    pub fn spilled(&self) -> &[SpilledBlock] {
        &self.spilled
    }

    pub fn into_spilled(self) -> Vec<SpilledBlock> {
        self.spilled
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::voxels::coordinates::ChunkPosition;

    #[test]
    fn builtin_catalog_has_a_full_palette() {
        let catalog = BlockCatalog::builtin().unwrap();
        let palette = TerrainPalette::from_catalog(&catalog).unwrap();

        assert_eq!(Some(palette.water), catalog.id_by_name("water"));
        assert_ne!(palette.log, palette.leaves);
    }

    #[test]
    fn missing_palette_block_is_named() {
        let catalog = BlockCatalog::from_json_str(
            r#"{ "blocks": [ { "id": 1, "name": "stone", "texture_indices": [0, 0, 0, 0, 0, 0] } ] }"#,
        )
        .unwrap();

        match TerrainPalette::from_catalog(&catalog) {
            Err(VoxelError::UnknownBlockName(name)) => assert_eq!(name, "bedrock"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn column_layering() {
        let palette = TerrainPalette::from_catalog(&BlockCatalog::builtin().unwrap()).unwrap();

        assert_eq!(palette.column_block(0, 10, true), palette.bedrock);
        assert_eq!(palette.column_block(9, 10, true), palette.grass);
        assert_eq!(palette.column_block(9, 10, false), palette.dirt);
        assert_eq!(palette.column_block(6, 10, true), palette.dirt);
        assert_eq!(palette.column_block(5, 10, true), palette.stone);
    }

    #[test]
    fn context_splits_local_and_spilled_writes() {
        let mut chunk = Chunk::new(Vector3::new(8, 16, 8), 2, ChunkPosition::new(1, 0)).unwrap();
        let mut context = GenerationContext::new();

        context.set_block(&mut chunk, Point3::new(9, 3, 2), 5).unwrap();
        context.set_block(&mut chunk, Point3::new(16, 3, 2), 5).unwrap();
        context.set_block(&mut chunk, Point3::new(7, 3, 2), 5).unwrap();

        assert_eq!(chunk.get_block_at_local(Point3::new(1, 3, 2)).unwrap(), 5);
        assert_eq!(
            context.spilled(),
            &[
                SpilledBlock { world: Point3::new(16, 3, 2), id: 5 },
                SpilledBlock { world: Point3::new(7, 3, 2), id: 5 },
            ]
        );
        assert!(matches!(
            context.set_block(&mut chunk, Point3::new(9, 16, 2), 5),
            Err(VoxelError::WorldHeightOutOfRange { y: 16, height: 16 })
        ));
    }
}
