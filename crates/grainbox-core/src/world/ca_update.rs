//! Cellular automata update logic - per-material rules
//!
//! Each rule looks at the cell at `(x, y)`, mutates the grid, and returns
//! true only when the cell moved straight down into the next row.

use grainbox_simulation::{Cell, Material};

use super::grid::Grid;
use super::neighbor_queries::NeighborQueries;
use super::rng_trait::SandRng;
use super::spawner::Spawner;
use super::stats::SimStats;

/// Cellular automata updater - handles material movement and interaction
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Update sand (falls, slides diagonally, sinks into water)
    pub fn update_sand<R: SandRng>(
        grid: &mut Grid,
        x: usize,
        y: usize,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let Some((_, below_y)) = grid.neighbor(x, y, 0, 1) else {
            return false;
        };

        if grid.material(x, below_y).is_empty() {
            grid.swap(x, y, x, below_y);
            stats.record_cell_moved();
            return true;
        }

        // Random diagonal first, then the opposite one. Water is displaced
        // into the cell the sand leaves.
        let side = Self::pick_side(grid, x, rng);
        for dx in [side, -side] {
            if let Some((nx, ny)) = grid.neighbor(x, y, dx, 1) {
                if matches!(grid.material(nx, ny), Material::Empty | Material::Water) {
                    grid.swap(x, y, nx, ny);
                    stats.record_cell_moved();
                    return false;
                }
            }
        }

        false
    }

    /// Update water (falls, slides diagonally into empty space, lets sand
    /// sink through it, spreads sideways over a blocked column)
    pub fn update_water<R: SandRng>(
        grid: &mut Grid,
        x: usize,
        y: usize,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let below = grid.neighbor(x, y, 0, 1);

        if let Some((_, below_y)) = below {
            if grid.material(x, below_y).is_empty() {
                Self::relocate(grid, (x, y), (x, below_y));
                stats.record_cell_moved();
                return true;
            }

            // Only the randomly chosen diagonal, and never into other water
            let side = Self::pick_side(grid, x, rng);
            if let Some((nx, ny)) = grid.neighbor(x, y, side, 1) {
                if grid.material(nx, ny).is_empty() {
                    Self::relocate(grid, (x, y), (nx, ny));
                    stats.record_cell_moved();
                    return false;
                }
            }
        }

        if let Some((_, above_y)) = grid.neighbor(x, y, 0, -1) {
            if grid.material(x, above_y) == Material::Sand {
                grid.swap(x, y, x, above_y);
                stats.record_cell_moved();
                return true;
            }
        }

        if let Some((_, below_y)) = below {
            if let Some(target_x) = Self::find_spread_target(grid, x, y, below_y) {
                Self::relocate(grid, (x, y), (target_x, y));
                stats.record_cell_moved();
            }
        }

        false
    }

    /// Update vacuum (erases every orthogonal neighbor that isn't empty or
    /// another vacuum)
    pub fn update_vacuum<R: SandRng>(
        grid: &mut Grid,
        x: usize,
        y: usize,
        stats: &mut dyn SimStats,
        _rng: &mut R,
    ) -> bool {
        for (nx, ny) in NeighborQueries::orthogonal(grid, x, y) {
            if !matches!(grid.material(nx, ny), Material::Empty | Material::Vacuum) {
                grid.set(nx, ny, Cell::EMPTY);
                stats.record_cell_erased();
            }
        }

        false
    }

    /// Update cloner (learns the first neighboring substance, then stamps it
    /// into every empty neighbor each tick)
    pub fn update_cloner<R: SandRng>(
        grid: &mut Grid,
        x: usize,
        y: usize,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let cell = grid.get(x, y);

        match cell.remembered() {
            None => {
                if let Some(learned) =
                    NeighborQueries::find_orthogonal(grid, x, y, Material::is_substance)
                {
                    grid.set(
                        x,
                        y,
                        Cell {
                            aux: learned,
                            ..cell
                        },
                    );
                }
            }
            Some(remembered) => {
                for (nx, ny) in NeighborQueries::orthogonal(grid, x, y) {
                    if grid.material(nx, ny).is_empty() {
                        grid.set(nx, ny, Spawner::materialize(remembered, rng));
                        stats.record_cell_cloned();
                    }
                }
            }
        }

        false
    }

    /// Random horizontal direction (-1 or 1), flipped when it would leave
    /// the grid
    fn pick_side<R: SandRng>(grid: &Grid, x: usize, rng: &mut R) -> isize {
        let side = if rng.coin_flip() { -1 } else { 1 };
        if grid.neighbor(x, 0, side, 0).is_some() {
            side
        } else {
            -side
        }
    }

    /// Scan along row `y` to the right, then to the left, for a cell that is
    /// empty with an empty cell below it. Each direction stops at the first
    /// non-empty cell and looks at most `width` cells away.
    fn find_spread_target(grid: &Grid, x: usize, y: usize, below_y: usize) -> Option<usize> {
        let width = grid.width();
        let max_steps = width;

        let scan = |columns: &mut dyn Iterator<Item = usize>| {
            for nx in columns {
                if !grid.material(nx, y).is_empty() {
                    break;
                }
                if grid.material(nx, below_y).is_empty() {
                    return Some(nx);
                }
            }
            None
        };

        scan(&mut (x + 1..width).take(max_steps)).or_else(|| scan(&mut (0..x).rev().take(max_steps)))
    }

    /// Move the cell at `from` to `to`, leaving Empty behind
    fn relocate(grid: &mut Grid, from: (usize, usize), to: (usize, usize)) {
        let cell = grid.get(from.0, from.1);
        grid.set(to.0, to.1, cell);
        grid.set(from.0, from.1, Cell::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{NoopStats, TickStats};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    /// Test RNG that returns deterministic values
    struct TestRng {
        bool_value: bool,
    }

    impl TestRng {
        /// `true` makes side picks go left first
        fn new(bool_value: bool) -> Self {
            Self { bool_value }
        }
    }

    impl SandRng for TestRng {
        fn coin_flip(&mut self) -> bool {
            self.bool_value
        }

        fn gen_f32(&mut self) -> f32 {
            0.5
        }

        fn color_offset(&mut self, _magnitude: u8) -> i16 {
            0
        }
    }

    /// Build a grid from rows of material codes:
    /// `.` empty, `s` sand, `w` water, `#` stone, `v` vacuum, `c` cloner
    fn grid_from(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows[0].len(), rows.len()).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, code) in row.chars().enumerate() {
                let material = match code {
                    '.' => Material::Empty,
                    's' => Material::Sand,
                    'w' => Material::Water,
                    '#' => Material::Stone,
                    'v' => Material::Vacuum,
                    'c' => Material::Cloner,
                    other => panic!("unknown material code {other}"),
                };
                grid.set(x, y, Cell::new(material));
            }
        }
        grid
    }

    fn materials(grid: &Grid) -> Vec<String> {
        (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| match grid.material(x, y) {
                        Material::Empty => '.',
                        Material::Sand => 's',
                        Material::Water => 'w',
                        Material::Stone => '#',
                        Material::Vacuum => 'v',
                        Material::Cloner => 'c',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_update_sand_falls_down() {
        let mut grid = grid_from(&[".s.", "...", "..."]);
        let mut stats = TickStats::default();

        let moved_down =
            CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut stats, &mut TestRng::new(true));

        assert!(moved_down);
        assert_eq!(materials(&grid), vec!["...", ".s.", "..."]);
        assert_eq!(stats.cells_moved, 1);
    }

    #[test]
    fn test_update_sand_stops_on_solid() {
        let mut grid = grid_from(&[".s.", "###"]);

        let moved_down =
            CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec![".s.", "###"]);
    }

    #[test]
    fn test_update_sand_slides_diagonally() {
        let mut grid = grid_from(&[".s.", ".#."]);

        // rng returns true: try left first
        let moved_down =
            CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec!["...", "s#."]);
    }

    #[test]
    fn test_update_sand_tries_opposite_diagonal() {
        let mut grid = grid_from(&[".s.", "##."]);

        CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec!["...", "##s"]);
    }

    #[test]
    fn test_update_sand_flips_side_at_edge() {
        let mut grid = grid_from(&["s..", "#.."]);

        // Left is off the grid, so the right diagonal is used
        CellularAutomataUpdater::update_sand(&mut grid, 0, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec!["...", "#s."]);
    }

    #[test]
    fn test_update_sand_treats_tools_as_obstacles() {
        let mut grid = grid_from(&[".s.", "vcv"]);

        CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(false));

        assert_eq!(materials(&grid), vec![".s.", "vcv"]);
    }

    #[test]
    fn test_update_sand_bottom_row_stays() {
        let mut grid = grid_from(&["...", ".s."]);

        let moved_down =
            CellularAutomataUpdater::update_sand(&mut grid, 1, 1, &mut NoopStats, &mut TestRng::new(true));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec!["...", ".s."]);
    }

    #[test]
    fn test_sand_swaps_diagonally_into_water() {
        let mut grid = grid_from(&[".s.", "w##"]);
        let water_color = [30, 160, 230];
        grid.set(0, 1, Cell::with_color(Material::Water, water_color));

        CellularAutomataUpdater::update_sand(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec![".w.", "s##"]);
        // Same water cell, just displaced
        assert_eq!(grid.get(1, 0).color, water_color);
    }

    #[test]
    fn test_water_never_moves_diagonally_into_water() {
        let mut grid = grid_from(&[".w.", "w#w"]);

        for left_first in [true, false] {
            let moved_down = CellularAutomataUpdater::update_water(
                &mut grid,
                1,
                0,
                &mut NoopStats,
                &mut TestRng::new(left_first),
            );

            assert!(!moved_down);
            assert_eq!(materials(&grid), vec![".w.", "w#w"]);
        }
    }

    #[test]
    fn test_update_water_falls_down() {
        let mut grid = grid_from(&[".w.", "...", "..."]);

        let moved_down =
            CellularAutomataUpdater::update_water(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert!(moved_down);
        assert_eq!(materials(&grid), vec!["...", ".w.", "..."]);
        assert_eq!(grid.get(1, 0), Cell::EMPTY);
    }

    #[test]
    fn test_update_water_slides_into_empty_diagonal() {
        let mut grid = grid_from(&[".w.", "##."]);

        // Right diagonal chosen
        let moved_down =
            CellularAutomataUpdater::update_water(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(false));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec!["...", "##w"]);
    }

    #[test]
    fn test_update_water_only_tries_chosen_diagonal() {
        // Left diagonal blocked, right one open, left chosen: water spreads
        // along the surface instead of using the right diagonal
        let mut grid = grid_from(&[".w..", "##.#"]);

        CellularAutomataUpdater::update_water(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec!["..w.", "##.#"]);
    }

    #[test]
    fn test_sand_sinks_through_water() {
        let mut grid = grid_from(&["s", "w", "#"]);
        let mut stats = TickStats::default();

        let moved_down =
            CellularAutomataUpdater::update_water(&mut grid, 0, 1, &mut stats, &mut TestRng::new(true));

        assert!(moved_down);
        assert_eq!(materials(&grid), vec!["w", "s", "#"]);
        assert_eq!(stats.cells_moved, 1);
    }

    #[test]
    fn test_update_water_spreads_horizontally() {
        let mut grid = grid_from(&["..w..", "####."]);

        let moved_down =
            CellularAutomataUpdater::update_water(&mut grid, 2, 0, &mut NoopStats, &mut TestRng::new(true));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec!["....w", "####."]);
    }

    #[test]
    fn test_update_water_spreads_right_before_left() {
        // Drop-offs at x = 1 and x = 5, diagonals blocked
        for left_first in [true, false] {
            let mut grid = grid_from(&["...w...", "#.###.#"]);

            CellularAutomataUpdater::update_water(
                &mut grid,
                3,
                0,
                &mut NoopStats,
                &mut TestRng::new(left_first),
            );

            assert_eq!(materials(&grid), vec![".....w.", "#.###.#"]);
        }
    }

    #[test]
    fn test_update_water_spread_stops_at_obstacle() {
        // Right scan blocked by stone, left scan reaches column 0
        let mut grid = grid_from(&["..w#.", ".####"]);

        CellularAutomataUpdater::update_water(&mut grid, 2, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec!["w..#.", ".####"]);
    }

    #[test]
    fn test_update_water_spread_does_not_jump_over_water() {
        let mut grid = grid_from(&["..ww.", "####."]);

        CellularAutomataUpdater::update_water(&mut grid, 2, 0, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(materials(&grid), vec!["..ww.", "####."]);
    }

    #[test]
    fn test_update_water_bottom_row_stays() {
        let mut grid = grid_from(&[".w."]);

        let moved_down =
            CellularAutomataUpdater::update_water(&mut grid, 1, 0, &mut NoopStats, &mut TestRng::new(true));

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec![".w."]);
    }

    #[test]
    fn test_update_vacuum_erases_neighbors() {
        let mut grid = grid_from(&["s#.", "svv", ".c."]);
        let mut stats = TickStats::default();

        let moved_down =
            CellularAutomataUpdater::update_vacuum(&mut grid, 1, 1, &mut stats, &mut TestRng::new(true));

        assert!(!moved_down);
        // Diagonal sand and the neighboring vacuum survive
        assert_eq!(materials(&grid), vec!["s..", ".vv", "..."]);
        assert_eq!(stats.cells_erased, 3);
        assert_eq!(grid.get(0, 1), Cell::EMPTY);
    }

    #[test]
    fn test_update_cloner_learns_first_substance() {
        let mut grid = grid_from(&[".w.", ".c.", ".s."]);
        let mut stats = TickStats::default();

        CellularAutomataUpdater::update_cloner(&mut grid, 1, 1, &mut stats, &mut TestRng::new(true));

        // North is scanned before south; nothing is stamped while learning
        assert_eq!(grid.get(1, 1).remembered(), Some(Material::Water));
        assert_eq!(materials(&grid), vec![".w.", ".c.", ".s."]);
        assert_eq!(stats.cells_cloned, 0);
    }

    #[test]
    fn test_update_cloner_ignores_tools() {
        let mut grid = grid_from(&[".c.", "vc.", "..."]);

        CellularAutomataUpdater::update_cloner(&mut grid, 1, 1, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(grid.get(1, 1).remembered(), None);
        assert_eq!(materials(&grid), vec![".c.", "vc.", "..."]);
    }

    #[test]
    fn test_update_cloner_stamps_empty_neighbors() {
        let mut grid = grid_from(&[".#.", ".c.", "..."]);
        grid.set(
            1,
            1,
            Cell {
                aux: Material::Sand,
                ..Cell::new(Material::Cloner)
            },
        );
        let mut stats = TickStats::default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);

        let moved_down = CellularAutomataUpdater::update_cloner(&mut grid, 1, 1, &mut stats, &mut rng);

        assert!(!moved_down);
        assert_eq!(materials(&grid), vec![".#.", "scs", ".s."]);
        assert_eq!(stats.cells_cloned, 3);

        let base = Material::Sand.base_color();
        for (x, y) in [(0, 1), (2, 1), (1, 2)] {
            for (channel, base_channel) in grid.get(x, y).color.iter().zip(base) {
                assert!((i16::from(*channel) - i16::from(base_channel)).abs() <= 10);
            }
        }
    }

    #[test]
    fn test_update_cloner_keeps_memory() {
        let mut grid = grid_from(&["...", ".c.", "..."]);
        let cloner = Cell {
            aux: Material::Stone,
            ..Cell::new(Material::Cloner)
        };
        grid.set(1, 1, cloner);

        CellularAutomataUpdater::update_cloner(&mut grid, 1, 1, &mut NoopStats, &mut TestRng::new(true));
        CellularAutomataUpdater::update_cloner(&mut grid, 1, 1, &mut NoopStats, &mut TestRng::new(true));

        assert_eq!(grid.get(1, 1), cloner);
        assert_eq!(materials(&grid), vec![".#.", "#c#", ".#."]);
        // TestRng has no jitter
        assert_eq!(grid.get(0, 1), Cell::new(Material::Stone));
    }
}
