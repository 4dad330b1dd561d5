//! Material simulation data for Grainbox
//!
//! This crate provides the foundational data types for the sandbox:
//! - Material definitions (Material, MaterialDef, MaterialType, Materials)
//! - Cell type (Cell, Rgb)

mod cell;
mod materials;

pub use cell::{Cell, Rgb};
pub use materials::{Material, MaterialDef, MaterialType, Materials, ParseMaterialError};
