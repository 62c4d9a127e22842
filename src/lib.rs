#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Engine
//!
//! A chunked voxel world with face-culled sub-chunk meshing and incremental redraw.
//!
//! This crate keeps a world of fixed-size chunk columns, generates terrain for them on
//! demand, and turns their blocks into meshes one vertical slab at a time. Meshes are
//! cached per slab and rebuilt only after an edit that can change them, spread over frames
//! by a redraw scheduler. Presenting the meshes (GPU upload, normals, collision) is left to
//! a [`engine_state::rendering::RenderView`] implementation.
//!
//! ## Key Modules
//!
//! * `core` - Core utilities and data structures used throughout the engine
//! * `engine_state` - The engine itself: world, meshing, scheduling and configuration
//!
//! ## Architecture
//!
//! The engine follows a modular architecture with clear separation between:
//! * Voxel data management (blocks, chunks, the world registry)
//! * Terrain generation behind a narrow trait
//! * Meshing, a pure function of a slab, its neighbors and the block catalog
//! * Redraw scheduling, bounded to one remesh per tick
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Headless application initialization
//! fn main() {
//!     voxel_engine::run();
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk-based voxel storage with flat block buffers
//! * Only faces next to air or transparent blocks are emitted
//! * Mesh caching per sub-chunk with minimal invalidation on edits
//! * Chunk loading and remeshing spread over frames

use log::{error, info};

use engine_state::config::WorldSettings;
use engine_state::voxels::coordinates::ChunkPosition;
use engine_state::EngineState;

pub mod core;
pub mod engine_state;

/// Upper bound on ticks the headless run spends settling the initial play area.
pub const MAX_STARTUP_TICKS: usize = 100_000;

/// Runs the engine headless.
///
/// Settings are read from the JSON file named by the first command-line argument, defaults
/// are used otherwise. The play area around the origin is loaded and meshed, then a
/// summary is logged.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = match std::env::args().nth(1) {
        Some(path) => match WorldSettings::from_path(&path) {
            Ok(settings) => settings,
            Err(err) => {
                error!("Failed to load settings from {}: {}", path, err);
                return;
            }
        },
        None => WorldSettings::default(),
    };

    let mut engine = match EngineState::new(&settings) {
        Ok(engine) => engine,
        Err(err) => {
            error!("Failed to start engine: {}", err);
            return;
        }
    };

    if let Err(err) = engine.update_play_area(ChunkPosition::new(0, 0)) {
        error!("Failed to set up the play area: {}", err);
        return;
    }

    let ticks = engine.run_until_idle(MAX_STARTUP_TICKS);
    info!(
        "Play area ready after {} ticks: {} chunks loaded, {} sub-chunk meshes, {} faces",
        ticks,
        engine.world.loaded_chunks().count(),
        engine.view.len(),
        engine.view.total_faces()
    );
}
