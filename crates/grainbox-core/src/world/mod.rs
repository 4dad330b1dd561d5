//! World management - grid, painting, physics

mod ca_update;
mod grid;
mod neighbor_queries;
mod physics_step;
pub mod rng_trait;
mod spawner;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use ca_update::CellularAutomataUpdater;
pub use grid::{Grid, GridError};
pub use neighbor_queries::{NeighborQueries, ORTHOGONAL_OFFSETS};
pub use physics_step::{ColumnOrder, PhysicsStep};
pub use rng_trait::{SandRng, jitter_color};
pub use spawner::Spawner;
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::World;
