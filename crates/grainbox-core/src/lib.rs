pub mod world;

// Material data lives in its own crate; re-exported for convenience
pub mod simulation {
    pub use grainbox_simulation::*;
}
