//! # Voxel Engine Application Entry Point
//!
//! This is the main entry point for the headless version of the voxel engine.
//! It simply calls into the library's `run()` function to initialize and start the engine.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [settings.json]
//! ```

fn main() {
    voxel_engine::run();
}
