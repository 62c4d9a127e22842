//! # Core Module
//!
//! Fundamental primitives shared by every engine subsystem.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking, and its
//!   non-owning `MtWeakResource` counterpart
//! - `CoordinateIterator`: Restartable enumeration of every coordinate in a box
//! - `floored`: Floored division and modulus for signed world coordinates
//!
//! ## Usage
//! ```rust
//! use cgmath::{Point3, Vector3};
//! use voxel_engine::core::{CoordinateIterator, MtResource};
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let cells = CoordinateIterator::new(Vector3::new(4, 4, 4), Point3::new(0, 0, 0)).unwrap();
//! assert_eq!(cells.volume(), 64);
//! ```

pub mod coordinate_iterator;
pub mod floored;
pub mod mt_resource;

pub use coordinate_iterator::CoordinateIterator;
pub use mt_resource::{MtResource, MtWeakResource};
