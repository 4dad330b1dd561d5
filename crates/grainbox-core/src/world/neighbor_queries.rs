//! Orthogonal neighbor lookup utilities

use grainbox_simulation::Material;

use super::grid::Grid;

/// Offsets of the 4 orthogonal neighbors, in scan order: W, N, E, S
pub const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Neighbor collection utilities - stateless methods for querying neighboring cells
pub struct NeighborQueries;

impl NeighborQueries {
    /// In-bounds orthogonal neighbors of `(x, y)` in W, N, E, S order
    ///
    /// The coordinates are computed up front, so the grid may be mutated
    /// while iterating.
    pub fn orthogonal(grid: &Grid, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        ORTHOGONAL_OFFSETS
            .map(|(dx, dy)| grid.neighbor(x, y, dx, dy))
            .into_iter()
            .flatten()
    }

    /// Material of the first orthogonal neighbor (W, N, E, S) accepted by
    /// `predicate`
    pub fn find_orthogonal<F>(grid: &Grid, x: usize, y: usize, predicate: F) -> Option<Material>
    where
        F: Fn(Material) -> bool,
    {
        Self::orthogonal(grid, x, y)
            .map(|(nx, ny)| grid.material(nx, ny))
            .find(|material| predicate(*material))
    }
}
