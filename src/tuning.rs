//! Data-driven game balance
//!
//! `Tuning` holds every gameplay number in reference pixels (authored for a
//! 720px tall viewport). `WorldMetrics` is the same data scaled to the live
//! viewport and is what the simulation actually reads.

use serde::{Deserialize, Serialize};

use crate::consts::BASE_HEIGHT;

/// What a regular collectible does once the last skin in the ordering is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CyclePolicy {
    /// Wrap around to the first available skin
    #[default]
    Wrap,
    /// Stay on the last skin
    Stop,
}

/// Gameplay balance in reference pixels / seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative = up, px/s)
    pub jump_velocity: f32,
    /// Nominal sprite size of the actor
    pub actor_width: f32,
    pub actor_height: f32,
    /// Collision radius as a fraction of the actor's nominal height
    pub actor_radius_frac: f32,
    /// Actor x as a fraction of viewport width
    pub actor_x_frac: f32,
    /// Start height offset above the viewport middle
    pub start_y_offset: f32,
    /// How long the "active" frame is shown after a jump (ms)
    pub active_frame_ms: f32,

    // === Obstacles ===
    /// Horizontal scroll speed of the world (px/s)
    pub scroll_speed: f32,
    /// Vertical gap between the upper and lower barrier
    pub gap: f32,
    /// Gap never shrinks below this
    pub min_gap: f32,
    pub barrier_width: f32,
    /// Wall-clock interval between obstacle spawns (ms)
    pub spawn_interval_ms: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Distance beyond the viewport edges used for spawning and eviction
    pub offscreen_margin: f32,
    /// Maximum gap-center movement between consecutive obstacles, as a fraction of the gap
    pub max_center_delta_frac: f32,
    /// Horizontal hitbox inset as a fraction of barrier width
    pub hit_inset_x_frac: f32,
    /// Vertical inset applied at the gap-facing end of each barrier
    pub cap_inset_y: f32,

    // === Collectibles ===
    /// Obstacle count at which the first regular collectible appears
    pub first_collectible_at: u32,
    /// Inclusive range of obstacles between regular collectibles
    pub collectible_interval_min: u32,
    pub collectible_interval_max: u32,
    /// Obstacle count that places the special collectible (once per run)
    pub special_milestone: u32,
    /// Distance kept from both gap edges, as a fraction of the gap
    pub safe_margin_frac: f32,
    /// Random vertical offset as a fraction of the safe span (±)
    pub jitter_frac: f32,
    /// Collectible height before scaling, and its unscaled floor
    pub collectible_size: f32,
    pub collectible_min_size: f32,
    /// Collision radius as a fraction of collectible size
    pub collectible_radius_frac: f32,

    // === Progression ===
    pub cycle_policy: CyclePolicy,
    /// Once the special skin is earned, regular pickups stop cycling
    pub lock_after_special: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1400.0,
            jump_velocity: -420.0,
            actor_width: 100.0,
            actor_height: 100.0,
            actor_radius_frac: 0.20,
            actor_x_frac: 0.28,
            start_y_offset: 80.0,
            active_frame_ms: 300.0,

            scroll_speed: 160.0,
            gap: 160.0,
            min_gap: 110.0,
            barrier_width: 70.0,
            spawn_interval_ms: 1500.0,
            margin_top: 40.0,
            margin_bottom: 40.0,
            offscreen_margin: 40.0,
            max_center_delta_frac: 0.75,
            hit_inset_x_frac: 0.14,
            cap_inset_y: 8.0,

            first_collectible_at: 6,
            collectible_interval_min: 13,
            collectible_interval_max: 20,
            special_milestone: 301,
            safe_margin_frac: 0.2,
            jitter_frac: 0.2,
            collectible_size: 28.0,
            collectible_min_size: 68.0,
            collectible_radius_frac: 0.42,

            cycle_policy: CyclePolicy::Wrap,
            lock_after_special: true,
        }
    }
}

/// Tuning scaled to a concrete viewport
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMetrics {
    pub width: f32,
    pub height: f32,
    /// `height / BASE_HEIGHT`
    pub scale: f32,

    pub gravity: f32,
    pub jump_velocity: f32,
    pub actor_x: f32,
    pub start_y: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    pub actor_radius: f32,
    pub active_frame_ms: f32,

    pub scroll_speed: f32,
    pub gap: f32,
    pub barrier_width: f32,
    pub spawn_interval: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub offscreen_margin: f32,
    pub max_center_delta: f32,
    pub hit_inset_x: f32,
    pub cap_inset_y: f32,

    /// Collectible inset from gap edges, as a fraction of the anchoring gap
    pub safe_margin_frac: f32,
    pub jitter_frac: f32,
    pub collectible_size: f32,
    pub collectible_radius: f32,
}

impl WorldMetrics {
    pub fn new(tuning: &Tuning, width: f32, height: f32) -> Self {
        let (default_w, default_h) = crate::consts::DEFAULT_VIEWPORT;
        let width = if width.is_finite() && width > 0.0 { width } else { default_w };
        let height = if height.is_finite() && height > 0.0 { height } else { default_h };

        let mut scale = height / BASE_HEIGHT;
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }

        let gap = (tuning.gap * scale).max(tuning.min_gap * scale);
        let barrier_width = tuning.barrier_width * scale;
        let actor_height = tuning.actor_height * scale;
        let collectible_size = (tuning.collectible_size * scale).max(tuning.collectible_min_size);

        Self {
            width,
            height,
            scale,

            gravity: tuning.gravity * scale,
            jump_velocity: tuning.jump_velocity * scale,
            actor_x: width * tuning.actor_x_frac,
            start_y: height / 2.0 - tuning.start_y_offset * scale,
            actor_width: tuning.actor_width * scale,
            actor_height,
            // Radius follows the nominal height so wide skins aren't penalized
            actor_radius: (actor_height * tuning.actor_radius_frac).max(1.0),
            active_frame_ms: tuning.active_frame_ms,

            scroll_speed: tuning.scroll_speed * scale,
            gap,
            barrier_width,
            spawn_interval: tuning.spawn_interval_ms / 1000.0,
            margin_top: tuning.margin_top * scale,
            margin_bottom: tuning.margin_bottom * scale,
            offscreen_margin: tuning.offscreen_margin * scale,
            max_center_delta: gap * tuning.max_center_delta_frac,
            hit_inset_x: barrier_width * tuning.hit_inset_x_frac,
            cap_inset_y: tuning.cap_inset_y * scale,

            safe_margin_frac: tuning.safe_margin_frac,
            jitter_frac: tuning.jitter_frac,
            collectible_size,
            collectible_radius: collectible_size * tuning.collectible_radius_frac,
        }
    }

    /// Allowed range for the top of a gap: `[margin_top, height - margin_bottom - gap]`
    pub fn gap_top_range(&self) -> (f32, f32) {
        (self.margin_top, self.height - self.margin_bottom - self.gap)
    }

    /// X at which new obstacles appear (just past the right edge)
    pub fn spawn_x(&self) -> f32 {
        self.width + self.offscreen_margin
    }
}
