//! # Block Catalog
//!
//! An immutable table from block id to [`BlockModel`], loaded once from JSON:
//!
//! ```json
//! {
//!   "atlas_width": 16,
//!   "blocks": [
//!     { "id": 1, "name": "stone", "texture_indices": [1, 1, 1, 1, 1, 1] }
//!   ]
//! }
//! ```
//!
//! Lookups go through a dense 256-slot table indexed by the id itself, so every query
//! during meshing is a single bounds-free array read.

use std::path::Path;

use log::info;
use serde::Deserialize;

use super::{BlockId, BlockModel, AIR};
use crate::engine_state::error::{VoxelError, VoxelResult};

/// Catalog shipped with the engine.
pub const BUILTIN_CATALOG: &str = include_str!("../../../../assets/blocks.json");

/// Atlas width used when a catalog document does not specify one.
pub const DEFAULT_ATLAS_WIDTH: u32 = 16;

const SLOT_COUNT: usize = BlockId::MAX as usize + 1;

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default = "default_atlas_width")]
    atlas_width: u32,
    blocks: Vec<BlockModel>,
}

fn default_atlas_width() -> u32 {
    DEFAULT_ATLAS_WIDTH
}

/// Immutable block metadata table.
///
/// # Examples
///
/// ```
/// use voxel_engine::engine_state::voxels::block::catalog::BlockCatalog;
///
/// let catalog = BlockCatalog::builtin().unwrap();
/// let stone = catalog.id_by_name("stone").unwrap();
/// assert!(!catalog.require(stone).unwrap().transparent);
/// assert!(catalog.get(0).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    atlas_width: u32,
    models: Vec<Option<BlockModel>>,
    len: usize,
}

impl BlockCatalog {
    /// Builds a catalog from a list of models.
    ///
    /// # Arguments
    /// * `atlas_width` - Number of cells per row (and column) of the square texture atlas
    /// * `models` - Block definitions, in any order
    ///
    /// # Errors
    /// - [`VoxelError::ReservedBlockId`] if a model uses id 0
    /// - [`VoxelError::DuplicateBlockId`] if two models share an id
    /// - [`VoxelError::InvalidAtlasWidth`] if `atlas_width` is 0
    pub fn from_models(atlas_width: u32, models: Vec<BlockModel>) -> VoxelResult<Self> {
        if atlas_width == 0 {
            return Err(VoxelError::InvalidAtlasWidth);
        }

        let mut slots: Vec<Option<BlockModel>> = vec![None; SLOT_COUNT];
        let len = models.len();
        for model in models {
            if model.id == AIR {
                return Err(VoxelError::ReservedBlockId);
            }
            let slot = &mut slots[model.id as usize];
            if slot.is_some() {
                return Err(VoxelError::DuplicateBlockId(model.id));
            }
            *slot = Some(model);
        }

        Ok(BlockCatalog {
            atlas_width,
            models: slots,
            len,
        })
    }

    /// Parses a catalog document.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self::from_models(document.atlas_width, document.blocks)?;
        info!(
            "Loaded block catalog with {} blocks (atlas width {})",
            catalog.len, catalog.atlas_width
        );
        Ok(catalog)
    }

    /// Reads and parses a catalog document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The catalog embedded in the binary (`assets/blocks.json`).
    pub fn builtin() -> VoxelResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Looks a block model up by id. Air and unknown ids return `None`.
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockModel> {
        self.models[id as usize].as_ref()
    }

    /// Looks a block model up by id, treating absence as corrupt data.
    ///
    /// # Errors
    /// [`VoxelError::MissingBlockModel`] if no model has this id
    #[inline]
    pub fn require(&self, id: BlockId) -> VoxelResult<&BlockModel> {
        self.get(id).ok_or(VoxelError::MissingBlockModel(id))
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Finds the id of the block with the given name.
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.iter().find(|model| model.name == name).map(|model| model.id)
    }

    /// Iterates over every defined model in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockModel> {
        self.models.iter().flatten()
    }

    pub fn atlas_width(&self) -> u32 {
        self.atlas_width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Computes the four UV corners of an atlas cell.
    ///
    /// Cells are numbered row by row: `column = index % width`, `row = index / width`.
    /// Corners are returned in the same winding as the face vertex templates:
    /// `(u0, v0)`, `(u1, v0)`, `(u1, v1)`, `(u0, v1)`.
    pub fn atlas_uvs(&self, texture_index: u32) -> [[f32; 2]; 4] {
        let width = self.atlas_width as f32;
        let column = (texture_index % self.atlas_width) as f32;
        let row = (texture_index / self.atlas_width) as f32;

        let u0 = column / width;
        let u1 = (column + 1.0) / width;
        let v0 = row / width;
        let v1 = (row + 1.0) / width;

        [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: BlockId, name: &str) -> BlockModel {
        BlockModel {
            id,
            name: name.to_string(),
            texture_indices: [0; 6],
            transparent: false,
            hide_connecting_faces: false,
            solid: true,
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = BlockCatalog::builtin().unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.get(AIR).is_none());
        for name in ["stone", "dirt", "grass", "water", "leaves", "glass", "log", "sand", "bedrock"] {
            assert!(catalog.id_by_name(name).is_some(), "missing {name}");
        }

        let water = catalog.require(catalog.id_by_name("water").unwrap()).unwrap();
        assert!(water.transparent);
        assert!(water.hide_connecting_faces);
        assert!(!water.solid);
    }

    #[test]
    fn rejects_air_id() {
        let result = BlockCatalog::from_models(16, vec![model(0, "void")]);
        assert!(matches!(result, Err(VoxelError::ReservedBlockId)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = BlockCatalog::from_models(16, vec![model(3, "a"), model(3, "b")]);
        assert!(matches!(result, Err(VoxelError::DuplicateBlockId(3))));
    }

    #[test]
    fn rejects_zero_atlas_width() {
        let result = BlockCatalog::from_models(0, vec![model(1, "a")]);
        assert!(matches!(result, Err(VoxelError::InvalidAtlasWidth)));
    }

    #[test]
    fn missing_model_is_an_error() {
        let catalog = BlockCatalog::from_models(16, vec![model(1, "stone")]).unwrap();
        assert!(matches!(
            catalog.require(200),
            Err(VoxelError::MissingBlockModel(200))
        ));
        assert_eq!(catalog.require(1).unwrap().name, "stone");
    }

    #[test]
    fn json_flags_default() {
        let catalog = BlockCatalog::from_json_str(
            r#"{ "blocks": [ { "id": 9, "name": "plank", "texture_indices": [4, 4, 4, 4, 4, 4] } ] }"#,
        )
        .unwrap();

        let plank = catalog.require(9).unwrap();
        assert_eq!(catalog.atlas_width(), DEFAULT_ATLAS_WIDTH);
        assert!(!plank.transparent);
        assert!(!plank.hide_connecting_faces);
        assert!(plank.solid);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = BlockCatalog::from_json_str(r#"{ "blocks": [ { "id": "x" } ] }"#);
        assert!(matches!(result, Err(VoxelError::ConfigParse(_))));
    }

    #[test]
    fn atlas_uvs_address_cells_row_by_row() {
        let catalog = BlockCatalog::from_models(16, vec![model(1, "a")]).unwrap();

        let uvs = catalog.atlas_uvs(17);
        assert_eq!(uvs[0], [1.0 / 16.0, 1.0 / 16.0]);
        assert_eq!(uvs[1], [2.0 / 16.0, 1.0 / 16.0]);
        assert_eq!(uvs[2], [2.0 / 16.0, 2.0 / 16.0]);
        assert_eq!(uvs[3], [1.0 / 16.0, 2.0 / 16.0]);
    }
}
