//! The player-controlled actor
//!
//! Only vertical motion is simulated; x is fixed for the whole run.

use glam::Vec2;

use crate::consts::{MAX_FRAME_DT, TILT_DAMPING, TILT_REFERENCE_SPEED};
use crate::tuning::WorldMetrics;

/// The controllable actor
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Horizontal position (constant during a run)
    pub x: f32,
    /// Vertical position of the center
    pub y: f32,
    /// Vertical velocity (positive = down)
    pub vel_y: f32,
    /// Collision radius
    pub radius: f32,
    /// Remaining time the "active" sprite frame is shown (ms)
    pub active_frame_ms: f32,
}

impl Actor {
    /// Fresh actor at the start position for this viewport
    pub fn new(metrics: &WorldMetrics) -> Self {
        Self {
            x: metrics.actor_x,
            y: metrics.start_y,
            vel_y: 0.0,
            radius: metrics.actor_radius,
            active_frame_ms: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Advance position and velocity under constant gravity.
    ///
    /// `dt` is clamped so a stalled frame can't carry the actor through a
    /// barrier in one step.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.vel_y += gravity * dt;
        self.y += self.vel_y * dt;
        if self.active_frame_ms > 0.0 {
            self.active_frame_ms = (self.active_frame_ms - dt * 1000.0).max(0.0);
        }
    }

    /// Jump: replace vertical velocity with the upward impulse
    pub fn impulse(&mut self, jump_velocity: f32, active_frame_ms: f32) {
        self.vel_y = jump_velocity;
        self.active_frame_ms = active_frame_ms;
    }

    /// Whether the "active" (post-jump) frame should be drawn
    pub fn shows_active_frame(&self) -> bool {
        self.active_frame_ms > 0.0
    }

    /// Cosmetic lean in radians, derived from velocity
    pub fn tilt(&self) -> f32 {
        self.vel_y.atan2(TILT_REFERENCE_SPEED) * TILT_DAMPING
    }
}
