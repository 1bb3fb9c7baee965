//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod driver;
pub mod skins;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actor::Actor;
pub use collision::{
    Rect, barrier_hitboxes, barrier_rects, circle_circle_overlap, circle_rect_overlap,
};
pub use driver::FrameDriver;
pub use skins::{Progression, SKINS, Skin};
pub use spawn::{advance_world, choose_gap_top, spawn_obstacle};
pub use state::{Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{TickInput, resolve_collisions, tick};
