//! # Engine Configuration
//!
//! World and terrain settings, read from JSON. Every field has a default, so an empty
//! document (`{}`) describes the standard world: 16x256x16 chunks cut into 16 slabs,
//! plains terrain and the builtin block catalog.
//!
//! ```json
//! {
//!   "chunk_size": [16, 128, 16],
//!   "subdivisions": 8,
//!   "play_area_radius": 3,
//!   "terrain": { "kind": "plains", "seed": 1337, "water_level": 20 }
//! }
//! ```

use std::path::{Path, PathBuf};

use cgmath::Vector3;
use serde::Deserialize;

use super::error::{VoxelError, VoxelResult};

/// Chunk dimensions used when no settings are given.
pub const DEFAULT_CHUNK_SIZE: [i32; 3] = [16, 256, 16];
/// Sub-chunks per chunk used when no settings are given.
pub const DEFAULT_SUBDIVISIONS: usize = 16;
/// Play area radius, in chunks, used when no settings are given.
pub const DEFAULT_PLAY_AREA_RADIUS: u32 = 2;

/// Which built-in terrain generator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    /// Level layers of bedrock, stone, dirt and grass
    Flat,
    /// Rolling noise height-map with water and trees
    #[default]
    Plains,
}

/// Parameters of terrain generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub kind: TerrainKind,
    pub seed: u32,
    /// Number of noise layers
    pub octaves: u32,
    /// Noise sampling scale applied to world coordinates
    pub scale: f64,
    /// Amplitude multiplier between octaves
    pub persistence: f64,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Reference value for the height map
    pub baseline_height: i32,
    /// Columns lower than this are filled with water up to it
    pub water_level: i32,
    /// Surface height of the flat generator
    pub flat_height: i32,
    /// Whether the plains generator plants trees
    pub trees: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            kind: TerrainKind::default(),
            seed: 0,
            octaves: 3,
            scale: 0.005,
            persistence: 0.25,
            lacunarity: 4.0,
            baseline_height: 32,
            water_level: 25,
            flat_height: 8,
            trees: true,
        }
    }
}

/// World layout and generation settings.
///
/// # Examples
///
/// ```
/// use voxel_engine::engine_state::config::{TerrainKind, WorldSettings};
///
/// let settings = WorldSettings::from_json_str(
///     r#"{ "chunk_size": [8, 32, 8], "subdivisions": 4, "terrain": { "kind": "flat" } }"#,
/// ).unwrap();
///
/// assert_eq!(settings.subdivisions, 4);
/// assert_eq!(settings.terrain.kind, TerrainKind::Flat);
/// assert_eq!(settings.play_area_radius, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Chunk extent in blocks, `[x, y, z]`
    pub chunk_size: [i32; 3],
    /// Sub-chunks per chunk, must divide `chunk_size[1]`
    pub subdivisions: usize,
    /// Chunks kept loaded on each side of the play area centre
    pub play_area_radius: u32,
    /// Block catalog document; the builtin catalog is used when absent
    pub catalog_path: Option<PathBuf>,
    pub terrain: TerrainSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            chunk_size: DEFAULT_CHUNK_SIZE,
            subdivisions: DEFAULT_SUBDIVISIONS,
            play_area_radius: DEFAULT_PLAY_AREA_RADIUS,
            catalog_path: None,
            terrain: TerrainSettings::default(),
        }
    }
}

impl WorldSettings {
    /// Parses and validates a settings document.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        let settings: WorldSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a settings file.
    pub fn from_path(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn chunk_size(&self) -> Vector3<i32> {
        Vector3::from(self.chunk_size)
    }

    /// Checks the chunk layout.
    ///
    /// # Errors
    /// - [`VoxelError::InvalidSize`] for a non-positive chunk dimension
    /// - [`VoxelError::InvalidSubdivision`] if `subdivisions` is zero or does not divide the height
    pub fn validate(&self) -> VoxelResult<()> {
        let [x, y, z] = self.chunk_size;
        if x <= 0 || y <= 0 || z <= 0 {
            return Err(VoxelError::InvalidSize { x, y, z });
        }
        let subdivisions = i32::try_from(self.subdivisions).unwrap_or(0);
        if subdivisions == 0 || y % subdivisions != 0 {
            return Err(VoxelError::InvalidSubdivision {
                height: y,
                subdivisions: i32::try_from(self.subdivisions).unwrap_or(i32::MAX),
            });
        }
        Ok(())
    }
}
