//! Canvas 2D backend (WASM only)

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::DrawCommand;
use crate::assets::{AssetId, AssetRegistry, AssetSpec};
use crate::sim::collision::Rect;

/// Browser image elements for every manifest asset.
///
/// Loading is started once; completion is polled into an `AssetRegistry`
/// rather than reported through load callbacks.
#[derive(Default)]
pub struct ImageBank {
    images: HashMap<AssetId, HtmlImageElement>,
}

impl ImageBank {
    pub fn load(manifest: &[AssetSpec]) -> Self {
        let mut images = HashMap::new();
        for spec in manifest {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(spec.path);
                    images.insert(spec.id, img);
                }
                Err(e) => log::warn!("Could not create image for {}: {e:?}", spec.id),
            }
        }
        log::info!("Loading {} images", images.len());
        Self { images }
    }

    /// Move finished loads into the registry. Returns true while anything is
    /// still pending.
    pub fn poll(&self, registry: &mut AssetRegistry) -> bool {
        let pending: Vec<AssetId> = registry.pending().collect();
        for id in pending {
            let Some(img) = self.images.get(id) else {
                registry.mark_failed(id);
                continue;
            };
            if !img.complete() {
                continue;
            }
            // A broken image is also "complete", just with no pixels
            if img.natural_width() > 0 && img.natural_height() > 0 {
                registry.mark_ready(id, img.natural_width() as f32, img.natural_height() as f32);
            } else {
                registry.mark_failed(id);
            }
        }
        !registry.all_settled()
    }

    pub fn get(&self, id: AssetId) -> Option<&HtmlImageElement> {
        self.images.get(id)
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub images: ImageBank,
    /// Viewport in CSS pixels
    pub size: (f32, f32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, images: ImageBank) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_image_smoothing_enabled(true);
        Ok(Self {
            canvas,
            ctx,
            images,
            size: (0.0, 0.0),
        })
    }

    /// Match the backing store to the CSS size times the device pixel ratio
    pub fn resize(&mut self, css_width: f32, css_height: f32, dpr: f64) {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((css_width as f64 * dpr).round() as u32);
        self.canvas.set_height((css_height as f64 * dpr).round() as u32);
        // Resizing resets the context state
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.ctx.set_image_smoothing_enabled(true);
        self.size = (css_width, css_height);
    }

    pub fn draw(&self, commands: &[DrawCommand]) {
        let (w, h) = self.size;
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        for command in commands {
            if let Err(e) = self.execute(command) {
                log::warn!("Draw failed: {e:?}");
            }
        }
    }

    fn execute(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Gradient { rect, top, bottom } => {
                let Rect { x, y, w, h } = *rect;
                let gradient =
                    ctx.create_linear_gradient(x as f64, y as f64, x as f64, (y + h) as f64);
                gradient.add_color_stop(0.0, top)?;
                gradient.add_color_stop(1.0, bottom)?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
            }
            DrawCommand::FillRect { rect, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::StrokeRect { rect, color } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(2.0);
                ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::Image {
                asset,
                rect,
                rotation,
                flip_y,
            } => {
                let Some(img) = self.images.get(*asset) else {
                    return Ok(());
                };
                ctx.save();
                let result = self.draw_sprite(img, rect, *rotation, *flip_y);
                // Balance the save even when a transform call failed
                ctx.restore();
                result?;
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
                fill,
            } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                if *fill {
                    ctx.set_fill_style_str(color);
                    ctx.fill();
                } else {
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(2.0);
                    ctx.stroke();
                }
            }
        }
        Ok(())
    }

    /// Draw `img` over `rect`, transformed about the rect center. The caller
    /// owns save/restore.
    fn draw_sprite(
        &self,
        img: &HtmlImageElement,
        rect: &Rect,
        rotation: f32,
        flip_y: bool,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (cx, cy) = (rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
        ctx.translate(cx as f64, cy as f64)?;
        if rotation != 0.0 {
            ctx.rotate(rotation as f64)?;
        }
        if flip_y {
            ctx.scale(1.0, -1.0)?;
        }
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            -(rect.w as f64) / 2.0,
            -(rect.h as f64) / 2.0,
            rect.w as f64,
            rect.h as f64,
        )
    }
}
