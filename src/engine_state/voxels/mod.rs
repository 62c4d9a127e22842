//! # Voxel World
//!
//! This module contains the data side of the engine: blocks, chunks, the world registry
//! and terrain generation.
//!
//! ## Architecture
//!
//! * **Block**: block ids, faces and the [`block::catalog::BlockCatalog`] describing them
//! * **Chunk**: a fixed-size column of block ids, split vertically into sub-chunks that
//!   each cache their own mesh, linked to its four horizontal neighbors
//! * **Coordinates**: world, chunk and local spaces and the conversions between them
//! * **World**: the registry creating, linking, loading and invalidating chunks
//! * **Play area**: the square of chunks kept loaded around a centre
//! * **Generation**: terrain generators filling new chunks
//!
//! ## Data Flow
//!
//! 1. The world receives a request for block access or modification
//! 2. The world routes it to the owning chunk, generating the chunk if necessary
//! 3. The change invalidates the affected sub-chunk meshes and records events
//! 4. The redraw scheduler picks the events up and remeshes one sub-chunk per tick

pub mod block;
pub mod chunk;
pub mod coordinates;
pub mod generation;
pub mod play_area;
pub mod world;
