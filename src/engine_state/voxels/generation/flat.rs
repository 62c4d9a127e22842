//! Level terrain: every column has the same height and the same layers.

use log::debug;

use super::{GenerationContext, TerrainGenerator, TerrainPalette};
use crate::engine_state::error::VoxelResult;
use crate::engine_state::voxels::chunk::Chunk;

/// Fills every column up to a fixed height with the palette's soil layering.
#[derive(Debug, Clone)]
pub struct FlatTerrainGenerator {
    height: i32,
    palette: TerrainPalette,
}

impl FlatTerrainGenerator {
    pub fn new(height: i32, palette: TerrainPalette) -> Self {
        FlatTerrainGenerator { height, palette }
    }
}

impl TerrainGenerator for FlatTerrainGenerator {
    fn initialize(&mut self) {
        debug!("Flat terrain generator ready (surface height {})", self.height);
    }

    fn generate(
        &mut self,
        chunk: &mut Chunk,
        _context: &mut GenerationContext,
    ) -> VoxelResult<()> {
        let size = chunk.size();
        let height = self.height.clamp(0, size.y);
        let layer = size.x as usize * size.z as usize;

        // Layers are contiguous in the block buffer, so each one is a single fill.
        let blocks = chunk.blocks_mut();
        for y in 0..height {
            let id = self.palette.column_block(y, height, true);
            let start = y as usize * layer;
            blocks[start..start + layer].fill(id);
        }
        Ok(())
    }
}
