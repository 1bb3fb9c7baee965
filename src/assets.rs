//! Sprite manifest and readiness tracking
//!
//! Every asset moves through a tiny state machine: `Pending` until the
//! platform reports it loaded (`Ready`) or broken (`Failed`). Both end states
//! are final. The simulation and renderer only ever *query* readiness; they
//! never wait on it.

use std::collections::HashMap;

/// Stable identifier for a sprite
pub type AssetId = &'static str;

pub const BACKGROUND: AssetId = "background";
pub const SPIRE: AssetId = "spire";
pub const MEDALLION: AssetId = "medallion";
pub const MEDALLION_SPECIAL: AssetId = "medallion_special";

pub const APPLE_IDLE: AssetId = "apple_idle";
pub const APPLE_ACTIVE: AssetId = "apple_active";
pub const COMET_IDLE: AssetId = "comet_idle";
pub const COMET_ACTIVE: AssetId = "comet_active";
pub const GOLDEN_IDLE: AssetId = "golden_idle";
pub const GOLDEN_ACTIVE: AssetId = "golden_active";

/// Where an asset is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub id: AssetId,
    pub path: &'static str,
}

const fn spec(id: AssetId, path: &'static str) -> AssetSpec {
    AssetSpec { id, path }
}

/// Everything the game tries to load at startup
pub const MANIFEST: &[AssetSpec] = &[
    spec(BACKGROUND, "./assets/background.png"),
    spec(SPIRE, "./assets/rock_spire.png"),
    spec(MEDALLION, "./assets/medallion.png"),
    spec(MEDALLION_SPECIAL, "./assets/medallion_gold.png"),
    spec(APPLE_IDLE, "./assets/Apple_Fly.png"),
    spec(APPLE_ACTIVE, "./assets/Apple_Regular.png"),
    spec(COMET_IDLE, "./assets/Comet_Fly.png"),
    spec(COMET_ACTIVE, "./assets/Comet_Regular.png"),
    spec(GOLDEN_IDLE, "./assets/Golden_Fly.png"),
    spec(GOLDEN_ACTIVE, "./assets/Golden_Regular.png"),
];

/// Load state of a single asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetState {
    Pending,
    /// Loaded, with natural pixel size
    Ready { width: f32, height: f32 },
    Failed,
}

/// Readiness of every known asset
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    states: HashMap<AssetId, AssetState>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every manifest entry pending
    pub fn from_manifest() -> Self {
        let mut registry = Self::new();
        for spec in MANIFEST {
            registry.register(spec.id);
        }
        registry
    }

    /// Track an asset as pending (no-op if already known)
    pub fn register(&mut self, id: AssetId) {
        self.states.entry(id).or_insert(AssetState::Pending);
    }

    pub fn mark_ready(&mut self, id: AssetId, width: f32, height: f32) {
        self.transition(id, AssetState::Ready { width, height });
    }

    pub fn mark_failed(&mut self, id: AssetId) {
        self.transition(id, AssetState::Failed);
    }

    fn transition(&mut self, id: AssetId, next: AssetState) {
        let entry = self.states.entry(id).or_insert(AssetState::Pending);
        if *entry != AssetState::Pending {
            log::debug!("Ignoring late transition for asset {id}: {:?} -> {:?}", entry, next);
            return;
        }
        match next {
            AssetState::Failed => log::warn!("Asset {id} failed to load"),
            _ => log::debug!("Asset {id} ready"),
        }
        *entry = next;
    }

    pub fn state(&self, id: AssetId) -> AssetState {
        // Unknown assets are never going to load
        self.states.get(id).copied().unwrap_or(AssetState::Failed)
    }

    pub fn is_ready(&self, id: AssetId) -> bool {
        matches!(self.state(id), AssetState::Ready { .. })
    }

    /// Natural size of a ready asset
    pub fn size(&self, id: AssetId) -> Option<(f32, f32)> {
        match self.state(id) {
            AssetState::Ready { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Width / height of a ready asset (1.0 when unknown or degenerate)
    pub fn aspect(&self, id: AssetId) -> f32 {
        match self.size(id) {
            Some((w, h)) if h > 0.0 && w > 0.0 => w / h,
            _ => 1.0,
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.states
            .iter()
            .filter(|(_, state)| **state == AssetState::Pending)
            .map(|(id, _)| *id)
    }

    /// True once nothing is pending any more
    pub fn all_settled(&self) -> bool {
        self.pending().next().is_none()
    }

    /// Registry with every manifest asset already loaded at 100x100
    #[cfg(test)]
    pub fn all_ready() -> Self {
        let mut registry = Self::from_manifest();
        for spec in MANIFEST {
            registry.mark_ready(spec.id, 100.0, 100.0);
        }
        registry
    }
}
