//! One ordered sweep of the cellular automaton over the whole grid

use grainbox_simulation::Material;

use super::ca_update::CellularAutomataUpdater;
use super::grid::Grid;
use super::rng_trait::SandRng;
use super::stats::SimStats;

/// Rule signature: mutate around `(x, y)`, return true if the cell moved
/// straight down into the next row
type Rule<R> = fn(&mut Grid, usize, usize, &mut dyn SimStats, &mut R) -> bool;

/// Direction columns were visited in during a sweep
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Increasing x
    #[default]
    Forward,
    /// Decreasing x
    Reverse,
}

/// Row cursor for one column, scanning top to bottom. When a rule reports
/// that its cell moved into the next row, that row is skipped for the rest
/// of the sweep.
struct ColumnScan {
    row: usize,
    height: usize,
}

impl ColumnScan {
    fn new(height: usize) -> Self {
        Self { row: 0, height }
    }

    fn current(&self) -> Option<usize> {
        (self.row < self.height).then_some(self.row)
    }

    fn advance(&mut self, moved_down: bool) {
        self.row += if moved_down { 2 } else { 1 };
    }
}

/// Drives a single tick
pub struct PhysicsStep;

impl PhysicsStep {
    /// Rule for a material, or None for materials that never act
    fn rule_for<R: SandRng>(material: Material) -> Option<Rule<R>> {
        match material {
            Material::Empty | Material::Stone => None,
            Material::Sand => Some(CellularAutomataUpdater::update_sand::<R>),
            Material::Water => Some(CellularAutomataUpdater::update_water::<R>),
            Material::Vacuum => Some(CellularAutomataUpdater::update_vacuum::<R>),
            Material::Cloner => Some(CellularAutomataUpdater::update_cloner::<R>),
        }
    }

    /// Run one sweep: every column, every row top to bottom. Half of the
    /// ticks visit the columns right to left so the scan direction doesn't
    /// push material sideways over time.
    pub fn run<R: SandRng>(grid: &mut Grid, stats: &mut dyn SimStats, rng: &mut R) -> ColumnOrder {
        let order = if rng.check_probability(0.5) {
            ColumnOrder::Reverse
        } else {
            ColumnOrder::Forward
        };

        let width = grid.width();
        for i in 0..width {
            let x = match order {
                ColumnOrder::Forward => i,
                ColumnOrder::Reverse => width - 1 - i,
            };
            Self::sweep_column(grid, x, stats, rng);
        }

        order
    }

    fn sweep_column<R: SandRng>(grid: &mut Grid, x: usize, stats: &mut dyn SimStats, rng: &mut R) {
        let mut scan = ColumnScan::new(grid.height());

        while let Some(y) = scan.current() {
            let moved_down = match Self::rule_for::<R>(grid.material(x, y)) {
                Some(rule) => {
                    stats.record_rule_applied();
                    rule(grid, x, y, stats, rng)
                }
                None => false,
            };
            scan.advance(moved_down);
        }
    }
}
