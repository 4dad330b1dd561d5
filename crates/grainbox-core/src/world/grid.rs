//! Fixed-size cell grid - the single source of truth for the sandbox
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing
//! downward (row 0 is the top). Cells are stored row-major.

use grainbox_simulation::{Cell, Material};
use thiserror::Error;

/// Grid construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },

    #[error("grid of {width}x{height} cells does not fit in memory")]
    TooLarge { width: usize, height: usize },
}

/// 2D array of cells, fixed in size after construction
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid filled with Empty
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }

        // The color buffer needs three bytes per cell
        let len = width
            .checked_mul(height)
            .filter(|len| len.checked_mul(3).is_some())
            .ok_or(GridError::TooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::EMPTY; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Coordinate of the cell offset by `(dx, dy)` from `(x, y)`, or None
    /// when that lands outside the grid
    pub fn neighbor(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Cell at `(x, y)`. Panics when out of range.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Material at `(x, y)`. Panics when out of range.
    pub fn material(&self, x: usize, y: usize) -> Material {
        self.get(x, y).material
    }

    /// Overwrite the cell at `(x, y)`. Panics when out of range.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let index = self.index(x, y);
        self.cells[index] = cell;
    }

    /// Exchange two cells. Both old values are read before either slot is
    /// written, so swapping a cell with itself leaves it unchanged.
    pub fn swap(&mut self, x: usize, y: usize, x2: usize, y2: usize) {
        let first = self.index(x, y);
        let second = self.index(x2, y2);
        self.cells.swap(first, second);
    }

    /// Fill every cell with Empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Count cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.material == material)
            .count()
    }

    /// Row-major RGB snapshot: `width * height * 3` bytes, cell `(x, y)`
    /// starting at `(y * width + x) * 3`
    pub fn export_color_buffer(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.cells.len() * 3);
        self.export_color_buffer_into(&mut buffer);
        buffer
    }

    /// Same as [`Grid::export_color_buffer`], reusing `buffer`'s allocation
    pub fn export_color_buffer_into(&self, buffer: &mut Vec<u8>) {
        buffer.clear();
        buffer.extend(self.cells.iter().flat_map(|cell| cell.color));
    }
}
