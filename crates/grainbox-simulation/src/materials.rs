//! Material definitions and registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rgb;

/// Built-in materials. The set is closed: behavior is looked up by identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Material {
    #[default]
    Empty = 0,
    Sand = 1,
    Water = 2,
    Stone = 3,
    Vacuum = 4,
    Cloner = 5,
}

impl Material {
    /// Every material, ordered by id
    pub const ALL: [Material; 6] = [
        Material::Empty,
        Material::Sand,
        Material::Water,
        Material::Stone,
        Material::Vacuum,
        Material::Cloner,
    ];

    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a material by numeric id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn def(self) -> &'static MaterialDef {
        Materials::get(self)
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn base_color(self) -> Rgb {
        self.def().color
    }

    pub fn material_type(self) -> MaterialType {
        self.def().material_type
    }

    pub fn is_empty(self) -> bool {
        self == Material::Empty
    }

    /// True for materials that exist as matter (sand, water, stone) rather
    /// than as a tool or as nothing. Only these can be learned by a cloner.
    pub fn is_substance(self) -> bool {
        matches!(
            self.material_type(),
            MaterialType::Powder | MaterialType::Liquid | MaterialType::Solid
        )
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a material name or id can't be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material '{0}' (expected one of: empty, sand, water, stone, vacuum, cloner)")]
pub struct ParseMaterialError(pub String);

impl FromStr for Material {
    type Err = ParseMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Material::from_id(id).ok_or_else(|| ParseMaterialError(s.to_string()));
        }

        Material::ALL
            .into_iter()
            .find(|material| material.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseMaterialError(s.to_string()))
    }
}

/// How a material behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialType {
    /// Nothing there
    Void,
    /// Falls, piles up, sinks through liquid (sand)
    Powder,
    /// Flows, seeks level (water)
    Liquid,
    /// Never moves (stone)
    Solid,
    /// Stays put and acts on its neighbors (vacuum, cloner)
    Tool,
}

/// Definition of a material's properties
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialDef {
    pub material: Material,
    pub name: &'static str,
    pub material_type: MaterialType,
    /// Base color (RGB)
    pub color: Rgb,
    /// Max per-channel color offset applied when a cell of this material is
    /// created (0 = always exact base color)
    pub color_jitter: u8,
}

impl MaterialDef {
    /// Built-in definition for a material
    pub const fn builtin(material: Material) -> MaterialDef {
        let (name, material_type, color, color_jitter) = match material {
            Material::Empty => ("empty", MaterialType::Void, [0, 0, 0], 0),
            Material::Sand => ("sand", MaterialType::Powder, [203, 189, 147], 10),
            Material::Water => ("water", MaterialType::Liquid, [28, 163, 236], 10),
            Material::Stone => ("stone", MaterialType::Solid, [115, 112, 112], 10),
            Material::Vacuum => ("vacuum", MaterialType::Tool, [20, 20, 20], 0),
            Material::Cloner => ("cloner", MaterialType::Tool, [108, 60, 12], 0),
        };

        MaterialDef {
            material,
            name,
            material_type,
            color,
            color_jitter,
        }
    }

    /// Whether freshly created cells get a randomized color
    pub fn is_jittered(&self) -> bool {
        self.color_jitter > 0
    }
}

static MATERIAL_TABLE: [MaterialDef; 6] = [
    MaterialDef::builtin(Material::Empty),
    MaterialDef::builtin(Material::Sand),
    MaterialDef::builtin(Material::Water),
    MaterialDef::builtin(Material::Stone),
    MaterialDef::builtin(Material::Vacuum),
    MaterialDef::builtin(Material::Cloner),
];

/// Registry of all materials
pub struct Materials;

impl Materials {
    pub fn get(material: Material) -> &'static MaterialDef {
        &MATERIAL_TABLE[material as usize]
    }

    pub fn iter() -> impl Iterator<Item = &'static MaterialDef> {
        MATERIAL_TABLE.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for (index, def) in Materials::iter().enumerate() {
            assert_eq!(def.material.id() as usize, index);
            assert_eq!(Material::from_id(index as u8), Some(def.material));
        }
        assert_eq!(Material::from_id(6), None);
    }

    #[test]
    fn test_base_colors() {
        assert_eq!(Material::Empty.base_color(), [0, 0, 0]);
        assert_eq!(Material::Sand.base_color(), [203, 189, 147]);
        assert_eq!(Material::Water.base_color(), [28, 163, 236]);
        assert_eq!(Material::Stone.base_color(), [115, 112, 112]);
        assert_eq!(Material::Vacuum.base_color(), [20, 20, 20]);
        assert_eq!(Material::Cloner.base_color(), [108, 60, 12]);
    }

    #[test]
    fn test_only_substances_are_jittered() {
        for def in Materials::iter() {
            assert_eq!(def.is_jittered(), def.material.is_substance(), "{}", def.name);
        }
        assert_eq!(Material::Sand.def().color_jitter, 10);
    }

    #[test]
    fn test_parse_material_names() {
        assert_eq!("sand".parse::<Material>(), Ok(Material::Sand));
        assert_eq!("Water".parse::<Material>(), Ok(Material::Water));
        assert_eq!(" CLONER ".parse::<Material>(), Ok(Material::Cloner));
        assert_eq!("4".parse::<Material>(), Ok(Material::Vacuum));
        assert!("lava".parse::<Material>().is_err());
        assert!("9".parse::<Material>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for material in Material::ALL {
            assert_eq!(material.to_string().parse::<Material>(), Ok(material));
        }
    }

    #[test]
    fn test_material_ron_names() {
        let ron = ron::to_string(&Material::Stone).unwrap();
        assert_eq!(ron, "Stone");
        let parsed: Material = ron::from_str("Cloner").unwrap();
        assert_eq!(parsed, Material::Cloner);
    }
}
