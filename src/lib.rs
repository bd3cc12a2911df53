//! Neon Defender - A neon arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, scoring)
//! - `session`: Game lifecycle, fixed-step accumulator, high score recording
//! - `snapshot`: Read-only views handed to the presentation layer
//! - `renderer`: Palette and Canvas 2D drawing (web)
//! - `platform`: Input normalization
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one arcade frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frames per second the per-frame balance numbers are expressed in
    pub const FRAME_RATE: f32 = 60.0;

    /// Population caps
    pub const MAX_BULLETS: usize = 50;
    pub const MAX_PARTICLES: usize = 100;
    pub const MAX_POWERUPS: usize = 5;
    pub const MAX_TRAILS: usize = 30;

    /// Default play-field (resized to the viewport by the front end)
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
}

/// Convert a per-frame rate into a per-tick delta for `dt` seconds
#[inline]
pub fn per_frame(rate: f32, dt: f32) -> f32 {
    rate * dt * consts::FRAME_RATE
}

/// Apply a per-frame multiplicative decay over `dt` seconds
#[inline]
pub fn decay_per_frame(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * consts::FRAME_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_frame_at_sim_rate() {
        assert!((per_frame(7.0, consts::SIM_DT) - 7.0).abs() < 1e-4);
        assert!((per_frame(7.0, consts::SIM_DT * 2.0) - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_decay_per_frame() {
        assert!((decay_per_frame(0.9, consts::SIM_DT) - 0.9).abs() < 1e-5);
        assert!((decay_per_frame(0.9, consts::SIM_DT * 2.0) - 0.81).abs() < 1e-5);
    }
}
