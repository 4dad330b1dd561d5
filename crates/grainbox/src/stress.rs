//! Stress mode: random spawns every frame plus a frame-rate histogram

use std::collections::BTreeMap;
use std::fmt;

use grainbox_core::simulation::Material;
use grainbox_core::world::World;
use rand::Rng;
use web_time::Instant;

/// Paint a random material at a random center with `radius`
///
/// Centers range over `0..=width` and `0..=height`, so a disk may sit
/// partly off the right or bottom edge.
pub fn random_spawn<R: Rng>(world: &mut World, radius: u32, rng: &mut R) -> usize {
    let material = Material::ALL[rng.gen_range(0..Material::ALL.len())];
    let x = i32::try_from(rng.gen_range(0..=world.width())).unwrap_or(i32::MAX);
    let y = i32::try_from(rng.gen_range(0..=world.height())).unwrap_or(i32::MAX);
    world.spawn(x, y, radius, material, rng)
}

/// Whole frames-per-second samples bucketed by value
#[derive(Debug, Clone, Default)]
pub struct PerfMonitor {
    histogram: BTreeMap<u32, u64>,
}

/// Min/max/average over the recorded samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSummary {
    pub min: u32,
    pub max: u32,
    pub avg: u32,
}

impl fmt::Display for PerfSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MIN: {}, MAX: {}, AVG: {}", self.min, self.max, self.avg)
    }
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, fps: u32) {
        *self.histogram.entry(fps).or_insert(0) += 1;
    }

    /// Total number of samples
    pub fn samples(&self) -> u64 {
        self.histogram.values().sum()
    }

    pub fn clear(&mut self) {
        self.histogram.clear();
    }

    /// None until the first sample. The average is count-weighted and
    /// rounded down.
    pub fn summary(&self) -> Option<PerfSummary> {
        let (&min, _) = self.histogram.first_key_value()?;
        let (&max, _) = self.histogram.last_key_value()?;

        let (sum, count) = self
            .histogram
            .iter()
            .fold((0u128, 0u128), |(sum, count), (&fps, &n)| {
                (sum + u128::from(fps) * u128::from(n), count + u128::from(n))
            });

        Some(PerfSummary {
            min,
            max,
            avg: (sum / count) as u32,
        })
    }
}

/// Measures the frame rate from the time between consecutive laps
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Instantaneous FPS since the previous lap, None on the first lap or
    /// when no measurable time passed
    pub fn lap(&mut self) -> Option<u32> {
        let now = Instant::now();
        let previous = self.last.replace(now)?;
        let secs = now.duration_since(previous).as_secs_f64();
        if secs <= 0.0 {
            return None;
        }
        Some((1.0 / secs) as u32)
    }
}

/// Per-session stress state
#[derive(Debug, Default)]
pub struct StressMode {
    perf: PerfMonitor,
    clock: FrameClock,
}

impl StressMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the frame rate, then drop one random blob into the world
    pub fn step<R: Rng>(&mut self, world: &mut World, radius: u32, rng: &mut R) -> usize {
        if let Some(fps) = self.clock.lap() {
            self.perf.record(fps);
        }
        random_spawn(world, radius, rng)
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    /// Forget recorded samples (Reset command)
    pub fn clear(&mut self) {
        self.perf.clear();
        self.clock = FrameClock::default();
    }
}
