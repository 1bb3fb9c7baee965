//! Scene building
//!
//! Turns a `GameState` into a flat list of draw commands in world (CSS
//! pixel) coordinates. Art that hasn't loaded is skipped or replaced by a
//! flat fallback; nothing here waits on assets.

use glam::Vec2;

use crate::assets::{self, AssetId, AssetRegistry};
use crate::settings::Settings;
use crate::sim::collision::{Rect, barrier_hitboxes, barrier_rects};
use crate::sim::{CollectibleKind, GameState};

/// CSS color string
pub type Color = &'static str;

pub const SKY_TOP: Color = "#8fd0ff";
pub const SKY_BOTTOM: Color = "#bfe8ff";
pub const BARRIER_FALLBACK: Color = "#2fbf71";
pub const HITBOX: Color = "rgba(255, 0, 64, 0.9)";
pub const PICKUP_HITBOX: Color = "rgba(255, 215, 0, 0.9)";

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vertical two-stop gradient
    Gradient { rect: Rect, top: Color, bottom: Color },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    /// Sprite stretched over `rect`, rotated about the rect center
    Image {
        asset: AssetId,
        rect: Rect,
        rotation: f32,
        flip_y: bool,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        fill: bool,
    },
}

/// Rect of size `w`x`h` centered on `center`
fn centered(center: Vec2, w: f32, h: f32) -> Rect {
    Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
}

/// Scale an image to cover the whole viewport without distortion
fn cover_rect(image_w: f32, image_h: f32, width: f32, height: f32) -> Rect {
    if image_w <= 0.0 || image_h <= 0.0 {
        return Rect::new(0.0, 0.0, width, height);
    }
    let scale = (width / image_w).max(height / image_h);
    let (dw, dh) = (image_w * scale, image_h * scale);
    Rect::new((width - dw) / 2.0, (height - dh) / 2.0, dw, dh)
}

pub fn build_scene(
    state: &GameState,
    assets: &AssetRegistry,
    settings: &Settings,
) -> Vec<DrawCommand> {
    let capacity = 8 + state.obstacles.len() * 4 + state.collectibles.len() * 2;
    let mut commands = Vec::with_capacity(capacity);
    let (width, height) = (state.metrics.width, state.metrics.height);

    // Background
    match assets.size(assets::BACKGROUND) {
        Some((w, h)) => commands.push(DrawCommand::Image {
            asset: assets::BACKGROUND,
            rect: cover_rect(w, h, width, height),
            rotation: 0.0,
            flip_y: false,
        }),
        None => commands.push(DrawCommand::Gradient {
            rect: Rect::new(0.0, 0.0, width, height),
            top: SKY_TOP,
            bottom: SKY_BOTTOM,
        }),
    }

    // Barriers: the art covers exactly the barrier rectangles
    let spire_ready = assets.is_ready(assets::SPIRE);
    for obstacle in &state.obstacles {
        let (upper, lower) = barrier_rects(obstacle, height);
        for (rect, flip_y) in [(upper, true), (lower, false)] {
            if rect.is_empty() {
                continue;
            }
            if spire_ready {
                commands.push(DrawCommand::Image {
                    asset: assets::SPIRE,
                    rect,
                    rotation: 0.0,
                    flip_y,
                });
            } else {
                commands.push(DrawCommand::FillRect {
                    rect,
                    color: BARRIER_FALLBACK,
                });
            }
        }
    }

    // Collectibles
    for collectible in state.collectibles.iter().filter(|c| !c.collected) {
        let asset = match collectible.kind {
            CollectibleKind::Regular => assets::MEDALLION,
            CollectibleKind::Special => assets::MEDALLION_SPECIAL,
        };
        if !assets.is_ready(asset) {
            continue;
        }
        let h = collectible.size;
        let w = h * assets.aspect(asset);
        commands.push(DrawCommand::Image {
            asset,
            rect: centered(collectible.pos, w, h),
            rotation: 0.0,
            flip_y: false,
        });
    }

    // Actor
    let actor = &state.actor;
    let skin = state.progression.active_skin();
    let sprite = if actor.shows_active_frame() {
        skin.active
    } else {
        skin.idle
    };
    if assets.is_ready(sprite) {
        let rotation = if settings.reduced_motion {
            0.0
        } else {
            actor.tilt()
        };
        commands.push(DrawCommand::Image {
            asset: sprite,
            rect: centered(actor.center(), state.metrics.actor_width, state.metrics.actor_height),
            rotation,
            flip_y: false,
        });
    }

    if settings.show_hitboxes {
        push_hitboxes(state, &mut commands);
    }

    commands
}

/// Debug overlay: inset barrier boxes and collision circles
fn push_hitboxes(state: &GameState, commands: &mut Vec<DrawCommand>) {
    let m = &state.metrics;
    for obstacle in &state.obstacles {
        let (upper, lower) = barrier_hitboxes(obstacle, m.height, m.hit_inset_x, m.cap_inset_y);
        for rect in [upper, lower] {
            if !rect.is_empty() {
                commands.push(DrawCommand::StrokeRect { rect, color: HITBOX });
            }
        }
    }
    for collectible in state.collectibles.iter().filter(|c| !c.collected) {
        commands.push(DrawCommand::Circle {
            center: collectible.pos,
            radius: collectible.radius,
            color: PICKUP_HITBOX,
            fill: false,
        });
    }
    commands.push(DrawCommand::Circle {
        center: state.actor.center(),
        radius: state.actor.radius,
        color: HITBOX,
        fill: false,
    });
}
