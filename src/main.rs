//! # Voxel World Demo Entry Point
//!
//! Runs the headless demo scene from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! VOXEL_WORLD_CONFIG=world.json RUST_LOG=debug cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        eprintln!("voxel-world: {err}");
        std::process::exit(1);
    }
}
