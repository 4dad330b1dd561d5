//! Disk painting - used by user brush strokes and cloner stamping

use grainbox_simulation::{Cell, Material};

use super::grid::Grid;
use super::rng_trait::{SandRng, jitter_color};

/// Stateless painting utilities
pub struct Spawner;

impl Spawner {
    /// Create a fresh cell of `material`. Substances (sand, water, stone)
    /// get a jittered color for visual grain, everything else gets the exact
    /// base color.
    pub fn materialize<R: SandRng>(material: Material, rng: &mut R) -> Cell {
        let def = material.def();
        Cell::with_color(material, jitter_color(def.color, def.color_jitter, rng))
    }

    /// Paint a closed disk of `material` centered on `(center_x, center_y)`.
    ///
    /// Cells that already hold `material` are left alone and parts of the
    /// disk outside the grid are skipped. Returns the number of cells
    /// written.
    pub fn spawn<R: SandRng>(
        grid: &mut Grid,
        center_x: i32,
        center_y: i32,
        radius: u32,
        material: Material,
        rng: &mut R,
    ) -> usize {
        let (width, height) = grid.dimensions();
        let radius = i64::from(radius);
        let radius_sq = i128::from(radius) * i128::from(radius);
        let (cx, cy) = (i64::from(center_x), i64::from(center_y));

        // Bounding square of the disk, clipped to the grid
        let min_x = (cx - radius).max(0);
        let max_x = (cx + radius).min(width as i64 - 1);
        let min_y = (cy - radius).max(0);
        let max_y = (cy + radius).min(height as i64 - 1);

        let mut spawned = 0;
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                let (dx, dy) = (i128::from(x - cx), i128::from(y - cy));
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }

                let (x, y) = (x as usize, y as usize);
                if grid.material(x, y) == material {
                    continue;
                }

                grid.set(x, y, Self::materialize(material, rng));
                spawned += 1;
            }
        }

        spawned
    }
}
