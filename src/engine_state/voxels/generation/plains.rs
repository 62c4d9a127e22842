//! # Plains Terrain
//!
//! Rolling grassland generated from a 2D height-map. The height of each column comes from
//! several octaves of Perlin noise, each sampled at a random offset derived from the seed.
//! Columns below the water level are topped with water up to it, and a tree is planted at
//! the centre of every chunk whose centre column is dry.

use cgmath::Point3;
use log::{debug, trace};
use noise::{NoiseFn, Perlin};

use super::structures::{TreeStructure, LEAVES_RADIUS, MAX_TREE_HEIGHT};
use super::{GenerationContext, TerrainGenerator, TerrainPalette};
use crate::engine_state::config::TerrainSettings;
use crate::engine_state::error::VoxelResult;
use crate::engine_state::voxels::chunk::Chunk;

/// Range of the random per-octave sampling offsets.
const OCTAVE_OFFSET_RANGE: std::ops::Range<i32> = -100_000..100_000;

/// Octave Perlin height-map generator.
pub struct PlainsTerrainGenerator {
    settings: TerrainSettings,
    palette: TerrainPalette,
    perlin: Perlin,
    octave_offsets: Vec<[f64; 2]>,
}

impl PlainsTerrainGenerator {
    /// Creates a generator. Call [`TerrainGenerator::initialize`] before generating.
    pub fn new(settings: TerrainSettings, palette: TerrainPalette) -> Self {
        PlainsTerrainGenerator {
            perlin: Perlin::new(settings.seed),
            settings,
            palette,
            octave_offsets: Vec::new(),
        }
    }

    /// Summed octave noise at a world column, roughly in `[-1, 1]`.
    fn sample(&self, x: i32, z: i32) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut noise = 0.0;

        for offset in &self.octave_offsets {
            let sample_x = x as f64 * self.settings.scale * frequency + offset[0];
            let sample_z = z as f64 * self.settings.scale * frequency + offset[1];
            noise += self.perlin.get([sample_x, sample_z]) * amplitude;

            amplitude *= self.settings.persistence;
            frequency *= self.settings.lacunarity;
        }

        noise
    }

    /// Terrain height of a world column, before clamping to the chunk.
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let noise = self.sample(x, z);
        let baseline = self.settings.baseline_height as f64;
        let variance = baseline * noise;
        ((noise * 2.0 - 1.0) * variance + (baseline - variance).max(0.0)).floor() as i32
    }

    fn tree_rng(&self, chunk: &Chunk) -> fastrand::Rng {
        let position = chunk.position();
        let key = ((position.x as u32 as u64) << 32) | position.z as u32 as u64;
        fastrand::Rng::with_seed(key ^ ((self.settings.seed as u64) << 16))
    }
}

impl TerrainGenerator for PlainsTerrainGenerator {
    fn initialize(&mut self) {
        let mut rng = fastrand::Rng::with_seed(self.settings.seed as u64);
        self.octave_offsets = (0..self.settings.octaves.max(1))
            .map(|_| {
                // Perlin noise is zero on integer lattice points.
                [
                    rng.i32(OCTAVE_OFFSET_RANGE) as f64 + rng.f64(),
                    rng.i32(OCTAVE_OFFSET_RANGE) as f64 + rng.f64(),
                ]
            })
            .collect();
        debug!(
            "Plains terrain generator ready (seed {}, {} octaves)",
            self.settings.seed,
            self.octave_offsets.len()
        );
    }

    fn generate(
        &mut self,
        chunk: &mut Chunk,
        context: &mut GenerationContext,
    ) -> VoxelResult<()> {
        let size = chunk.size();
        let origin = chunk.world_position();
        let water_level = self.settings.water_level.clamp(0, size.y);
        let mut centre_height = None;

        for x in 0..size.x {
            for z in 0..size.z {
                let height = self
                    .column_height(origin.x + x, origin.z + z)
                    .clamp(0, size.y);
                let dry = height >= water_level;

                for y in 0..height {
                    let id = self.palette.column_block(y, height, dry);
                    chunk.set_block_at_local(Point3::new(x, y, z), id)?;
                }
                for y in height..water_level {
                    chunk.set_block_at_local(Point3::new(x, y, z), self.palette.water)?;
                }

                if x == size.x / 2 && z == size.z / 2 && dry {
                    centre_height = Some(height);
                }
            }
        }

        if !self.settings.trees {
            return Ok(());
        }
        let Some(height) = centre_height else {
            return Ok(());
        };
        if height + MAX_TREE_HEIGHT + LEAVES_RADIUS > size.y {
            trace!("No room for a tree in chunk {}", chunk.position());
            return Ok(());
        }

        let tree = TreeStructure::random(
            &mut self.tree_rng(chunk),
            self.palette.log,
            self.palette.leaves,
        );
        let base = Point3::new(origin.x + size.x / 2, height, origin.z + size.z / 2);
        for (world, id) in tree.blocks(base)? {
            context.set_block(chunk, world, id)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::voxels::block::catalog::BlockCatalog;
    use crate::engine_state::voxels::block::AIR;
    use crate::engine_state::voxels::coordinates::ChunkPosition;

    fn generator(settings: TerrainSettings) -> PlainsTerrainGenerator {
        let palette = TerrainPalette::from_catalog(&BlockCatalog::builtin().unwrap()).unwrap();
        let mut generator = PlainsTerrainGenerator::new(settings, palette);
        generator.initialize();
        generator
    }

    fn generate(generator: &mut PlainsTerrainGenerator, position: ChunkPosition) -> Chunk {
        let mut chunk = Chunk::new(Vector3::new(16, 64, 16), 4, position).unwrap();
        generator
            .generate(&mut chunk, &mut GenerationContext::new())
            .unwrap();
        chunk
    }

    #[test]
    fn same_seed_same_terrain() {
        let settings = TerrainSettings {
            seed: 99,
            ..TerrainSettings::default()
        };
        let mut a = generator(settings.clone());
        let mut b = generator(settings);

        for position in [ChunkPosition::new(0, 0), ChunkPosition::new(-3, 5)] {
            assert_eq!(generate(&mut a, position).blocks(), generate(&mut b, position).blocks());
        }
    }

    #[test]
    fn bottom_layer_is_bedrock_and_water_fills_low_columns() {
        let mut generator = generator(TerrainSettings {
            baseline_height: 4,
            water_level: 10,
            trees: false,
            ..TerrainSettings::default()
        });
        let palette = generator.palette;
        let chunk = generate(&mut generator, ChunkPosition::new(2, 2));

        for x in 0..16 {
            for z in 0..16 {
                let height = generator
                    .column_height(chunk.world_position().x + x, chunk.world_position().z + z)
                    .clamp(0, 64);
                if height > 0 {
                    assert_eq!(chunk.get_block_at_local(Point3::new(x, 0, z)).unwrap(), palette.bedrock);
                }
                for y in height..10 {
                    assert_eq!(chunk.get_block_at_local(Point3::new(x, y, z)).unwrap(), palette.water);
                }
                assert_eq!(chunk.get_block_at_local(Point3::new(x, 10.max(height), z)).unwrap(), AIR);
            }
        }
    }

    #[test]
    fn dry_chunk_centre_gets_a_tree() {
        let mut generator = generator(TerrainSettings {
            baseline_height: 4,
            water_level: 0,
            ..TerrainSettings::default()
        });
        let palette = generator.palette;
        let chunk = generate(&mut generator, ChunkPosition::new(0, 0));

        let height = generator.column_height(8, 8).clamp(0, 64);
        assert_eq!(chunk.get_block_at_local(Point3::new(8, height, 8)).unwrap(), palette.log);
    }
}
