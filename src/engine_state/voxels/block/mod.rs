//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! Blocks are stored in chunks as bare ids; everything else about a block (textures,
//! transparency, face merging) lives in the [`catalog::BlockCatalog`].

use serde::Deserialize;

use block_side::BlockSide;

pub mod block_side;
pub mod catalog;

/// The underlying integer type used to represent a block in chunk storage.
pub type BlockId = u8;

/// The reserved id for empty space. Never present in the catalog.
pub const AIR: BlockId = 0;

/// Per-id metadata describing how a block looks and how it culls its neighbors.
///
/// # Examples
///
/// ```
/// use voxel_engine::engine_state::voxels::block::BlockModel;
///
/// let water: BlockModel = serde_json::from_str(
///     r#"{ "id": 7, "name": "water", "texture_indices": [3, 3, 3, 3, 3, 3],
///          "transparent": true, "hide_connecting_faces": true, "solid": false }"#,
/// ).unwrap();
/// assert!(water.transparent && water.hide_connecting_faces);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockModel {
    pub id: BlockId,

    /// Human readable name, used by generators to look ids up
    pub name: String,

    /// Texture atlas cell of each face, in [`BlockSide`] order
    pub texture_indices: [u32; 6],

    /// Whether neighbors should render the faces they share with this block
    #[serde(default)]
    pub transparent: bool,

    /// Suppress faces between two adjacent blocks of this same id (water, leaves)
    #[serde(default)]
    pub hide_connecting_faces: bool,

    /// Collision flag, carried for gameplay layers
    #[serde(default = "default_solid")]
    pub solid: bool,
}

fn default_solid() -> bool {
    true
}

impl BlockModel {
    /// Gets the atlas cell used by one face of this block.
    ///
    /// # Arguments
    /// * `side` - The face being textured
    ///
    /// # Returns
    /// The texture atlas index for that face
    pub fn texture_index(&self, side: BlockSide) -> u32 {
        self.texture_indices[side.index()]
    }
}
