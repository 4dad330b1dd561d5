//! RNG trait abstraction for the sandbox
//!
//! Every random decision (scan direction, horizontal tie-breaks, color
//! jitter) is drawn from one handle passed in by the caller:
//! - Rust's seeded RNGs (native app, reproducible runs)
//! - scripted sequences (tests)

use grainbox_simulation::Rgb;

/// Random number generator trait for the simulation
pub trait SandRng {
    /// Fair coin flip
    fn coin_flip(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Uniform integer in [-magnitude, magnitude]
    fn color_offset(&mut self, magnitude: u8) -> i16;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> SandRng for T {
    fn coin_flip(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn color_offset(&mut self, magnitude: u8) -> i16 {
        let magnitude = i16::from(magnitude);
        rand::Rng::gen_range(self, -magnitude..=magnitude)
    }
}

/// Offset each channel of `base` independently by up to `magnitude`,
/// clamped to the valid channel range
pub fn jitter_color<R: SandRng + ?Sized>(base: Rgb, magnitude: u8, rng: &mut R) -> Rgb {
    if magnitude == 0 {
        return base;
    }
    base.map(|channel| (i16::from(channel) + rng.color_offset(magnitude)).clamp(0, 255) as u8)
}
