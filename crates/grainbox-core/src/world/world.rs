use grainbox_simulation::{Cell, Material, Rgb};

use super::grid::{Grid, GridError};
use super::physics_step::PhysicsStep;
use super::rng_trait::SandRng;
use super::spawner::Spawner;
use super::stats::TickStats;

/// The sandbox: a grid plus the operations the renderer and input layer use
///
/// All mutation goes through `&mut self`, so painting and ticking on one
/// world are always serialized.
pub struct World {
    grid: Grid,
    tick_count: u64,
}

impl World {
    /// Create an all-Empty world. Fails on zero dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let grid = Grid::new(width, height)?;
        log::info!("Created {}x{} world", width, height);

        Ok(Self {
            grid,
            tick_count: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scene setup
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of ticks run since creation or the last reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Refill every cell with Empty
    pub fn reset(&mut self) {
        self.grid.reset();
        self.tick_count = 0;
        log::info!("World reset");
    }

    /// Paint a disk of `material`, see [`Spawner::spawn`]
    pub fn spawn<R: SandRng>(
        &mut self,
        center_x: i32,
        center_y: i32,
        radius: u32,
        material: Material,
        rng: &mut R,
    ) -> usize {
        let spawned = Spawner::spawn(&mut self.grid, center_x, center_y, radius, material, rng);
        log::debug!(
            "[SPAWN] {} at ({}, {}) radius {}: {} cells written",
            material,
            center_x,
            center_y,
            radius,
            spawned
        );
        spawned
    }

    /// Advance the simulation by one sweep
    pub fn tick<R: SandRng>(&mut self, rng: &mut R) -> TickStats {
        let mut stats = TickStats::default();
        let order = PhysicsStep::run(&mut self.grid, &mut stats, rng);
        stats.column_order = order;
        self.tick_count += 1;

        log::trace!(
            "[TICK] #{} {:?}: {} rules, {} moved, {} erased, {} cloned",
            self.tick_count,
            stats.column_order,
            stats.rules_applied,
            stats.cells_moved,
            stats.cells_erased,
            stats.cells_cloned
        );

        stats
    }

    /// Material and displayed color at `(x, y)`, None outside the grid
    pub fn read_cell(&self, x: usize, y: usize) -> Option<(Material, Rgb)> {
        self.cell(x, y).map(|cell| (cell.material, cell.color))
    }

    /// Full cell at `(x, y)`, None outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.grid
            .neighbor(x, y, 0, 0)
            .map(|(x, y)| self.grid.get(x, y))
    }

    /// Row-major RGB snapshot (`width * height * 3` bytes)
    pub fn export_color_buffer(&self) -> Vec<u8> {
        self.grid.export_color_buffer()
    }

    /// Count cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.grid.count(material)
    }
}
