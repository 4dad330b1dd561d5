//! Cell type
//!
//! Foundational per-position state for the grid.

use crate::{Material, MaterialDef};
use serde::{Deserialize, Serialize};

/// Displayed color of a cell (R, G, B)
pub type Rgb = [u8; 3];

/// A single cell of the sandbox grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Material occupying this cell
    pub material: Material,
    /// Displayed color, may differ from the material's base color (jitter)
    pub color: Rgb,
    /// Scratch slot. Only Cloner cells read it: the material they replicate
    /// (Empty = nothing learned yet).
    pub aux: Material,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        material: Material::Empty,
        color: MaterialDef::builtin(Material::Empty).color,
        aux: Material::Empty,
    };

    /// Cell of `material` with its exact base color
    pub fn new(material: Material) -> Self {
        Self::with_color(material, material.base_color())
    }

    pub fn with_color(material: Material, color: Rgb) -> Self {
        Self {
            material,
            color,
            aux: Material::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.material == Material::Empty
    }

    /// Material remembered in the aux slot, if any
    pub fn remembered(&self) -> Option<Material> {
        match self.aux {
            Material::Empty => None,
            material => Some(material),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
