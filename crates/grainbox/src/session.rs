//! Interactive sandbox state without a window
//!
//! A `Session` owns the world together with the brush and pause state a
//! user manipulates. Input arrives as [`Command`]s, either from the CLI or
//! from a [`Script`].

use std::str::FromStr;

use anyhow::{Context, Result};
use grainbox_core::simulation::Material;
use grainbox_core::world::{TickStats, World};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::config::BrushConfig;
use crate::script::Script;
use crate::stress::{PerfMonitor, StressMode};

/// User input understood by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Choose the material painted from now on
    Select(Material),
    /// Enlarge the brush by 1 (or the coarse step)
    GrowBrush {
        #[serde(default)]
        coarse: bool,
    },
    /// Shrink the brush by 1 (or the coarse step)
    ShrinkBrush {
        #[serde(default)]
        coarse: bool,
    },
    TogglePause,
    /// Restore brush defaults, drop perf history and empty the world
    Reset,
    /// Paint the selected material centered on a cell
    Paint { x: i32, y: i32 },
}

/// Brush defaults restored by [`Command::Reset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushSettings {
    pub default_material: Material,
    pub default_radius: u32,
    pub coarse_step: u32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            default_material: Material::Sand,
            default_radius: 10,
            coarse_step: 10,
        }
    }
}

impl BrushSettings {
    pub fn from_config(config: &BrushConfig) -> Result<Self> {
        Ok(Self {
            default_material: config.material()?,
            default_radius: config.default_radius,
            coarse_step: config.coarse_step,
        })
    }
}

/// A blob painted at startup, written as `x,y,radius,material`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintSpec {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
    pub material: Material,
}

impl FromStr for PaintSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, radius, material] = parts.as_slice() else {
            anyhow::bail!("expected x,y,radius,material but got '{}'", s);
        };

        Ok(Self {
            x: x.parse().with_context(|| format!("invalid x '{}'", x))?,
            y: y.parse().with_context(|| format!("invalid y '{}'", y))?,
            radius: radius
                .parse()
                .with_context(|| format!("invalid radius '{}'", radius))?,
            material: material.parse()?,
        })
    }
}

/// Totals over a [`Session::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    /// Ticks in which nothing moved, vanished or appeared
    pub idle_ticks: u64,
    pub cells_moved: u64,
    pub cells_erased: u64,
    pub cells_cloned: u64,
}

impl RunSummary {
    fn add_tick(&mut self, stats: &TickStats) {
        self.ticks += 1;
        if stats.is_idle() {
            self.idle_ticks += 1;
        }
        self.cells_moved += stats.cells_moved;
        self.cells_erased += stats.cells_erased;
        self.cells_cloned += stats.cells_cloned;
    }
}

pub struct Session {
    world: World,
    rng: Xoshiro256StarStar,
    brush: BrushSettings,
    selected: Material,
    brush_radius: u32,
    paused: bool,
    stress: Option<StressMode>,
    frame: u64,
}

impl Session {
    pub fn new(world: World, brush: BrushSettings, seed: u64) -> Self {
        log::info!(
            "Session started: {}x{} world, seed {}",
            world.width(),
            world.height(),
            seed
        );

        Self {
            world,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            brush,
            selected: brush.default_material,
            brush_radius: brush.default_radius,
            paused: false,
            stress: None,
            frame: 0,
        }
    }

    /// Spawn random blobs every unpaused frame and record the frame rate
    pub fn with_stress(mut self) -> Self {
        self.stress = Some(StressMode::new());
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn selected(&self) -> Material {
        self.selected
    }

    pub fn brush_radius(&self) -> u32 {
        self.brush_radius
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames run so far, paused ones included
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Frame-rate samples, None outside stress mode
    pub fn perf(&self) -> Option<&PerfMonitor> {
        self.stress.as_ref().map(StressMode::perf)
    }

    pub fn apply(&mut self, command: Command) {
        log::debug!("[COMMAND] frame {}: {:?}", self.frame, command);

        match command {
            Command::Select(material) => self.selected = material,
            Command::GrowBrush { coarse } => {
                let limit = self.world.width().min(self.world.height());
                let limit = u32::try_from(limit).unwrap_or(u32::MAX);
                // One step may pass the limit, the next is refused
                if self.brush_radius < limit {
                    self.brush_radius = self.brush_radius.saturating_add(self.step(coarse));
                }
            }
            Command::ShrinkBrush { coarse } => {
                if self.brush_radius > 1 {
                    self.brush_radius = self.brush_radius.saturating_sub(self.step(coarse));
                }
            }
            Command::TogglePause => self.paused = !self.paused,
            Command::Reset => self.reset(),
            Command::Paint { x, y } => {
                self.paint(x, y);
            }
        }
    }

    /// Paint the selected material with the current brush
    pub fn paint(&mut self, x: i32, y: i32) -> usize {
        self.world
            .spawn(x, y, self.brush_radius, self.selected, &mut self.rng)
    }

    /// Paint an explicit blob regardless of the brush
    pub fn paint_with(&mut self, x: i32, y: i32, radius: u32, material: Material) -> usize {
        self.world.spawn(x, y, radius, material, &mut self.rng)
    }

    pub fn paint_spec(&mut self, spec: &PaintSpec) -> usize {
        self.paint_with(spec.x, spec.y, spec.radius, spec.material)
    }

    pub fn reset(&mut self) {
        self.selected = self.brush.default_material;
        self.brush_radius = self.brush.default_radius;
        if let Some(stress) = self.stress.as_mut() {
            stress.clear();
        }
        self.world.reset();
    }

    /// Advance one frame. Ticks the world unless paused.
    pub fn frame(&mut self) -> Option<TickStats> {
        self.frame += 1;
        if self.paused {
            return None;
        }

        if let Some(stress) = self.stress.as_mut() {
            stress.step(&mut self.world, self.brush_radius, &mut self.rng);
        }

        Some(self.world.tick(&mut self.rng))
    }

    /// Run `frames` frames, firing script steps before their frame
    pub fn run(&mut self, frames: u64, script: &Script) -> RunSummary {
        let mut summary = RunSummary::default();

        for _ in 0..frames {
            let commands: Vec<Command> = script.commands_at(self.frame).collect();
            for command in commands {
                self.apply(command);
            }

            if let Some(stats) = self.frame() {
                summary.add_tick(&stats);
            }
            summary.frames += 1;
        }

        summary
    }

    /// One-line description of brush, pause and perf state
    pub fn status_line(&self) -> String {
        let mut status = format!(
            "Item: {}, Pencil size: {}",
            self.selected, self.brush_radius
        );
        if self.paused {
            status.push_str(", paused");
        }
        if let Some(summary) = self.perf().and_then(PerfMonitor::summary) {
            status.push_str(", ");
            status.push_str(&summary.to_string());
        }
        status
    }

    fn step(&self, coarse: bool) -> u32 {
        if coarse {
            self.brush.coarse_step
        } else {
            1
        }
    }
}
