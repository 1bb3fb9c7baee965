//! Spire Flap - a side-scrolling spire-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run state)
//! - `renderer`: Draw-command scene building and the canvas backend
//! - `assets`: Sprite manifest and per-asset readiness tracking
//! - `platform`: Browser/native platform abstraction (storage, input)
//! - `persistence`: Identity, score submission and leaderboard boundary
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::BestScore;
pub use settings::{Difficulty, Settings};
pub use tuning::{CyclePolicy, Tuning, WorldMetrics};

/// Game configuration constants
pub mod consts {
    /// Reference viewport height all tuning pixels are authored against
    pub const BASE_HEIGHT: f32 = 720.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Forward speed used to derive the actor's lean from its vertical velocity
    pub const TILT_REFERENCE_SPEED: f32 = 300.0;
    /// Fraction of the lean angle actually drawn
    pub const TILT_DAMPING: f32 = 0.45;

    /// Viewport used by the headless build and tests
    pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);
}

/// Clamp `value` into `[min, max]`, tolerating an inverted range by
/// collapsing it onto `min`.
#[inline]
pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}
