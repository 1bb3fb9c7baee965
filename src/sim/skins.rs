//! Cosmetic skins and the progression state machine
//!
//! Purely cosmetic: nothing here feeds back into physics or collision.

use crate::assets::{self, AssetId, AssetRegistry};
use crate::tuning::CyclePolicy;

/// A named pair of actor sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub name: &'static str,
    /// Shown while falling
    pub idle: AssetId,
    /// Shown briefly after a jump
    pub active: AssetId,
    /// Reward skin, only reachable through the special collectible
    pub special: bool,
}

/// Fixed cycling order. Index 0 is the default skin.
pub const SKINS: &[Skin] = &[
    Skin {
        name: "Apple",
        idle: assets::APPLE_IDLE,
        active: assets::APPLE_ACTIVE,
        special: false,
    },
    Skin {
        name: "Comet",
        idle: assets::COMET_IDLE,
        active: assets::COMET_ACTIVE,
        special: false,
    },
    Skin {
        name: "Golden",
        idle: assets::GOLDEN_IDLE,
        active: assets::GOLDEN_ACTIVE,
        special: true,
    },
];

pub const DEFAULT_SKIN: usize = 0;

/// Index of the reward skin
pub fn special_skin() -> Option<usize> {
    SKINS.iter().position(|s| s.special)
}

/// Run-scoped cosmetic state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    active: usize,
    special_unlocked: bool,
    locked: bool,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            active: DEFAULT_SKIN,
            special_unlocked: false,
            locked: false,
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_skin(&self) -> &'static Skin {
        &SKINS[self.active]
    }

    pub fn special_unlocked(&self) -> bool {
        self.special_unlocked
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether skin `index` may be activated right now
    pub fn is_available(&self, index: usize, assets: &AssetRegistry) -> bool {
        let Some(skin) = SKINS.get(index) else {
            return false;
        };
        if skin.special && !self.special_unlocked {
            return false;
        }
        assets.is_ready(skin.idle) && assets.is_ready(skin.active)
    }

    /// Back to the default skin with nothing unlocked.
    ///
    /// Falls back to the first loadable regular skin if the default one is
    /// broken; if none is loadable the default stays selected and simply
    /// isn't drawn.
    pub fn reset(&mut self, assets: &AssetRegistry) {
        self.special_unlocked = false;
        self.locked = false;
        self.active = DEFAULT_SKIN;
        if !self.is_available(DEFAULT_SKIN, assets) {
            if let Some(index) = (0..SKINS.len()).find(|&i| self.is_available(i, assets)) {
                self.active = index;
            }
        }
    }

    /// Activate a specific skin. Leaves the current skin alone and returns
    /// false if that skin can't be shown.
    pub fn activate(&mut self, index: usize, assets: &AssetRegistry) -> bool {
        if !self.is_available(index, assets) {
            return false;
        }
        self.active = index;
        true
    }

    /// Regular pickup: move to the next available skin in the ordering
    pub fn advance(&mut self, policy: CyclePolicy, assets: &AssetRegistry) -> bool {
        if self.locked {
            return false;
        }
        let count = SKINS.len();
        for step in 1..count {
            let raw = self.active + step;
            let index = match policy {
                CyclePolicy::Wrap => raw % count,
                CyclePolicy::Stop if raw >= count => return false,
                CyclePolicy::Stop => raw,
            };
            if self.activate(index, assets) {
                return true;
            }
        }
        false
    }

    /// Special pickup: unlock the reward skin for the rest of the run and
    /// switch to it, optionally freezing further cycling.
    pub fn unlock_special(&mut self, lock: bool, assets: &AssetRegistry) -> bool {
        self.special_unlocked = true;
        let Some(index) = special_skin() else {
            return false;
        };
        let switched = self.activate(index, assets);
        if switched && lock {
            self.locked = true;
        }
        switched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skin_after_reset() {
        let assets = AssetRegistry::all_ready();
        let mut p = Progression::new();
        p.active = 1;
        p.locked = true;
        p.reset(&assets);
        assert_eq!(p.active(), DEFAULT_SKIN);
        assert!(!p.is_locked());
        assert!(!p.special_unlocked());
    }

    #[test]
    fn test_reset_falls_back_when_default_broken() {
        let mut assets = AssetRegistry::from_manifest();
        assets.mark_failed(assets::APPLE_IDLE);
        assets.mark_ready(assets::COMET_IDLE, 100.0, 100.0);
        assets.mark_ready(assets::COMET_ACTIVE, 100.0, 100.0);
        let mut p = Progression::new();
        p.reset(&assets);
        assert_eq!(p.active_skin().name, "Comet");
    }

    #[test]
    fn test_advance_skips_special_until_unlocked() {
        let assets = AssetRegistry::all_ready();
        let mut p = Progression::new();
        assert!(p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Comet");
        // Golden is special and locked away, so wrap back to Apple
        assert!(p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Apple");
    }

    #[test]
    fn test_advance_stop_policy_holds_last() {
        let assets = AssetRegistry::all_ready();
        let mut p = Progression::new();
        assert!(p.advance(CyclePolicy::Stop, &assets));
        assert_eq!(p.active_skin().name, "Comet");
        assert!(!p.advance(CyclePolicy::Stop, &assets));
        assert_eq!(p.active_skin().name, "Comet");
    }

    #[test]
    fn test_advance_skips_unloaded_skins() {
        let mut assets = AssetRegistry::from_manifest();
        for spec in crate::assets::MANIFEST {
            if spec.id != assets::COMET_ACTIVE {
                assets.mark_ready(spec.id, 100.0, 100.0);
            }
        }
        assets.mark_failed(assets::COMET_ACTIVE);
        let mut p = Progression::new();
        assert!(!p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Apple");
    }

    #[test]
    fn test_activate_broken_skin_is_noop() {
        let mut assets = AssetRegistry::from_manifest();
        assets.mark_ready(assets::APPLE_IDLE, 100.0, 100.0);
        assets.mark_ready(assets::APPLE_ACTIVE, 100.0, 100.0);
        assets.mark_failed(assets::COMET_IDLE);
        let mut p = Progression::new();
        assert!(!p.activate(1, &assets));
        assert_eq!(p.active(), DEFAULT_SKIN);
        assert!(!p.activate(99, &assets));
    }

    #[test]
    fn test_special_unlock_locks_cycling() {
        let assets = AssetRegistry::all_ready();
        let mut p = Progression::new();
        assert!(p.unlock_special(true, &assets));
        assert_eq!(p.active_skin().name, "Golden");
        assert!(p.is_locked());
        assert!(!p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Golden");
    }

    #[test]
    fn test_special_unlock_without_lock_keeps_cycling() {
        let assets = AssetRegistry::all_ready();
        let mut p = Progression::new();
        assert!(p.unlock_special(false, &assets));
        assert!(p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Apple");
        // Unlocked special is now part of the cycle
        assert!(p.advance(CyclePolicy::Wrap, &assets));
        assert!(p.advance(CyclePolicy::Wrap, &assets));
        assert_eq!(p.active_skin().name, "Golden");
    }

    #[test]
    fn test_special_unlock_with_missing_art() {
        let mut assets = AssetRegistry::from_manifest();
        assets.mark_ready(assets::APPLE_IDLE, 100.0, 100.0);
        assets.mark_ready(assets::APPLE_ACTIVE, 100.0, 100.0);
        assets.mark_failed(assets::GOLDEN_IDLE);
        let mut p = Progression::new();
        assert!(!p.unlock_special(true, &assets));
        assert!(p.special_unlocked());
        assert!(!p.is_locked());
        assert_eq!(p.active_skin().name, "Apple");
    }
}
