//! # Engine Errors
//!
//! A single error type covers every fallible voxel operation. Errors fall in three groups:
//!
//! - **Construction**: invalid sizes, subdivisions or positions passed when building an
//!   iterator, chunk or world. Nothing is partially constructed.
//! - **Bounds**: a block coordinate outside a chunk or sub-chunk. Never clamped or wrapped.
//! - **Data consistency**: a block id with no catalog entry, or a malformed catalog.
//!
//! A neighbor chunk that has not been linked yet is *not* an error; the mesher renders the
//! face and waits for the seam remesh triggered by the link.

use thiserror::Error;

use super::voxels::block::BlockId;
use super::voxels::coordinates::ChunkPosition;

/// Errors raised by the voxel world, its meshes and its configuration.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// A box size with a zero or negative component
    #[error("invalid size ({x}, {y}, {z}): every component must be greater than zero")]
    InvalidSize {
        /// Size on the x axis
        x: i32,
        /// Size on the y axis
        y: i32,
        /// Size on the z axis
        z: i32,
    },

    /// Chunk height not evenly divisible into sub-chunks
    #[error("chunk height {height} cannot be split into {subdivisions} sub-chunks")]
    InvalidSubdivision {
        /// Chunk height in blocks
        height: i32,
        /// Requested number of sub-chunks
        subdivisions: i32,
    },

    /// A local block coordinate outside `[0, size)` on some axis
    #[error("local position ({x}, {y}, {z}) is outside chunk bounds")]
    LocalPositionOutOfRange {
        /// Local x coordinate
        x: i32,
        /// Local y coordinate
        y: i32,
        /// Local z coordinate
        z: i32,
    },

    /// A world position above or below the chunk column
    #[error("world height {y} is outside the chunk column [0, {height})")]
    WorldHeightOutOfRange {
        /// Requested world y coordinate
        y: i32,
        /// Chunk height in blocks
        height: i32,
    },

    /// A sub-chunk index past the chunk's subdivision count
    #[error("sub-chunk index {index} is out of range (chunk has {count})")]
    SubChunkIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of sub-chunks in the chunk
        count: usize,
    },

    /// World-space chunk origin that is not a multiple of the chunk size
    #[error("world position ({x}, {z}) is not aligned to the chunk size")]
    MisalignedWorldPosition {
        /// World x coordinate
        x: i32,
        /// World z coordinate
        z: i32,
    },

    /// A block id present in chunk data but absent from the catalog
    #[error("block id {0} has no catalog entry")]
    MissingBlockModel(BlockId),

    /// The catalog tried to register the reserved air id
    #[error("block id 0 is reserved for air and cannot be defined")]
    ReservedBlockId,

    /// The catalog defines the same id twice
    #[error("block id {0} is defined more than once")]
    DuplicateBlockId(BlockId),

    /// A generator asked for a block name the catalog does not define
    #[error("no block named \"{0}\" in the catalog")]
    UnknownBlockName(String),

    /// The catalog atlas width is zero
    #[error("texture atlas width must be greater than zero")]
    InvalidAtlasWidth,

    /// An operation that needs an existing chunk was given an empty position
    #[error("no chunk at {0}")]
    ChunkNotFound(ChunkPosition),

    /// Malformed JSON in a settings or catalog document
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A settings or catalog file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for voxel operations.
pub type VoxelResult<T> = Result<T, VoxelError>;
