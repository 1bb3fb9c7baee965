//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;
use crate::tuning::{CyclePolicy, Tuning};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Next preset in menu order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Relaxed => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Relaxed,
        }
    }

    /// Gap height in reference pixels
    pub fn gap(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 190.0,
            Difficulty::Normal => 160.0,
            Difficulty::Hard => 135.0,
        }
    }

    /// How far consecutive gap centers may drift, as a fraction of the gap
    pub fn drift(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.6,
            Difficulty::Normal => 0.75,
            Difficulty::Hard => 0.95,
        }
    }

    /// Balance for this preset on top of the defaults
    pub fn tuning(&self) -> Tuning {
        Tuning {
            gap: self.gap(),
            max_center_delta_frac: self.drift(),
            ..Tuning::default()
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Skins ===
    /// What a regular pickup does on the last skin
    pub cycle_policy: CyclePolicy,
    /// Keep the reward skin for the rest of the run once earned
    pub lock_after_special: bool,

    // === Accessibility ===
    /// Reduced motion (no actor tilt)
    pub reduced_motion: bool,

    // === Debug ===
    /// Draw collision shapes over the art
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            cycle_policy: CyclePolicy::Wrap,
            lock_after_special: true,
            reduced_motion: false,
            show_hitboxes: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "spire_flap_settings";

    /// Full gameplay tuning for these settings
    pub fn to_tuning(&self) -> Tuning {
        Tuning {
            cycle_policy: self.cycle_policy,
            lock_after_special: self.lock_after_special,
            ..self.difficulty.tuning()
        }
    }

    pub fn load() -> Self {
        match storage::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
