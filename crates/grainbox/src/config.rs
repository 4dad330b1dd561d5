//! Sandbox configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `grainbox.ron` in the working directory, or the file passed with `--config`
//! 3. Environment variables prefixed with `GRAINBOX_`
//!
//! Example environment variable: `GRAINBOX_BRUSH__DEFAULT_RADIUS=4`
//!
//! Command-line flags are applied on top by the binary.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use grainbox_core::simulation::Material;
use serde::{Deserialize, Serialize};

/// Main sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GrainboxConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub brush: BrushConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
        }
    }
}

/// Brush settings, restored by the Reset command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushConfig {
    /// Radius of the paint disk
    pub default_radius: u32,
    /// Step used by coarse grow/shrink
    pub coarse_step: u32,
    /// Material name or id selected at startup
    pub default_material: String,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            default_radius: 10,
            coarse_step: 10,
            default_material: Material::Sand.name().to_string(),
        }
    }
}

impl BrushConfig {
    /// Parse `default_material`
    pub fn material(&self) -> Result<Material> {
        self.default_material
            .parse()
            .with_context(|| format!("Invalid brush.default_material '{}'", self.default_material))
    }
}

/// Headless run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of frames to simulate
    pub frames: u64,
    /// Spawn random materials every frame and record FPS
    pub stress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            stress: false,
        }
    }
}

/// PNG snapshot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Pixels per cell in the written image
    pub scale: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self { scale: 4 }
    }
}

impl GrainboxConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path` if given (must exist), otherwise `grainbox.ron` if it exists
    /// 3. Environment variables prefixed with `GRAINBOX_` (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("grainbox")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.width", 160_i64)?
            .set_default("world.height", 160_i64)?
            .set_default("brush.default_radius", 10_i64)?
            .set_default("brush.coarse_step", 10_i64)?
            .set_default("brush.default_material", "sand")?
            .set_default("run.frames", 600_i64)?
            .set_default("run.stress", false)?
            .set_default("snapshot.scale", 4_i64)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (GRAINBOX_WORLD__WIDTH, etc.)
            .add_source(
                Environment::with_prefix("GRAINBOX")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build().context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the sandbox can't run with
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.world.width > 0 && self.world.height > 0,
            "World dimensions must be positive, got {}x{}",
            self.world.width,
            self.world.height
        );
        anyhow::ensure!(self.brush.default_radius > 0, "Brush radius must be at least 1");
        anyhow::ensure!(self.snapshot.scale > 0, "Snapshot scale must be at least 1");
        self.brush.material()?;
        Ok(())
    }
}
