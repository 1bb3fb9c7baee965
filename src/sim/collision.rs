//! Collision geometry
//!
//! The actor and collectibles are circles, barriers are axis-aligned
//! rectangles. Barrier hitboxes are shrunk relative to the drawn art so
//! grazing the visible edge of a spire doesn't end the run.

use glam::Vec2;

use super::state::Obstacle;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Point inside (or on the border of) the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// Circle vs rectangle using closest-point clamping
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    center.distance_squared(rect.closest_point(center)) < radius * radius
}

/// Circle vs circle
#[inline]
pub fn circle_circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let rr = ra + rb;
    a.distance_squared(b) < rr * rr
}

/// The rectangles exactly covered by an obstacle's barrier art:
/// `(upper, lower)`
pub fn barrier_rects(obstacle: &Obstacle, world_height: f32) -> (Rect, Rect) {
    let upper = Rect::new(obstacle.x, 0.0, obstacle.width, obstacle.gap_top);
    let bottom = obstacle.gap_bottom();
    let lower = Rect::new(obstacle.x, bottom, obstacle.width, (world_height - bottom).max(0.0));
    (upper, lower)
}

/// Forgiving hitboxes: barrier rects inset horizontally on both sides and
/// vertically at the gap-facing caps
pub fn barrier_hitboxes(
    obstacle: &Obstacle,
    world_height: f32,
    inset_x: f32,
    inset_y: f32,
) -> (Rect, Rect) {
    let x = obstacle.x + inset_x;
    let w = (obstacle.width - inset_x * 2.0).max(0.0);
    let upper = Rect::new(x, 0.0, w, (obstacle.gap_top - inset_y).max(0.0));
    let lower_y = obstacle.gap_bottom() + inset_y;
    let lower = Rect::new(x, lower_y, w, (world_height - lower_y).max(0.0));
    (upper, lower)
}

/// Whether a circle touches either barrier hitbox of an obstacle
pub fn circle_hits_obstacle(
    center: Vec2,
    radius: f32,
    obstacle: &Obstacle,
    world_height: f32,
    inset_x: f32,
    inset_y: f32,
) -> bool {
    let (upper, lower) = barrier_hitboxes(obstacle, world_height, inset_x, inset_y);
    circle_rect_overlap(center, radius, &upper) || circle_rect_overlap(center, radius, &lower)
}

/// Whether a circle pokes out of the top or bottom of the world
#[inline]
pub fn out_of_vertical_bounds(y: f32, radius: f32, world_height: f32) -> bool {
    y + radius >= world_height || y - radius <= 0.0
}
