use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d as Ctx2d, HtmlCanvasElement};

use crate::geometry::{Bounds, Vec2};
use crate::palette::Rgb;
use crate::surface::Surface;

/// [`Surface`] over a 2D canvas context.
pub struct CanvasSurface {
    ctx: Ctx2d,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: Ctx2d = canvas
            .get_context("2d")?
            .ok_or("2D canvas not supported")?
            .dyn_into()?;
        Ok(Self { ctx })
    }

    fn circle(&self, center: Vec2, radius: f64) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius.max(0.0), 0.0, TAU)
            .is_ok()
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, bounds: Bounds) {
        self.ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f64, width: f64, glow: f64) {
        self.ctx.save();
        self.ctx.set_stroke_style_str(&color.rgba(alpha));
        self.ctx.set_line_width(width);
        if glow > 0.0 {
            self.ctx.set_shadow_blur(glow);
            self.ctx.set_shadow_color(&color.hex());
        }
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn disc(&mut self, center: Vec2, radius: f64, color: Rgb, alpha: f64, glow: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        let hex = color.hex();
        self.ctx.set_fill_style_str(&hex);
        self.ctx.set_shadow_blur(glow);
        self.ctx.set_shadow_color(&hex);
        if self.circle(center, radius) {
            self.ctx.fill();
        }
        self.ctx.restore();
    }

    fn ring(&mut self, center: Vec2, radius: f64, color: Rgb, alpha: f64, width: f64, glow: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        let hex = color.hex();
        self.ctx.set_stroke_style_str(&hex);
        self.ctx.set_line_width(width);
        self.ctx.set_shadow_blur(glow);
        self.ctx.set_shadow_color(&hex);
        if self.circle(center, radius) {
            self.ctx.stroke();
        }
        self.ctx.restore();
    }

    fn radial_glow(&mut self, center: Vec2, radius: f64, color: Rgb, inner_alpha: f64) {
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.rgba(inner_alpha));
        let _ = gradient.add_color_stop(1.0, &color.rgba(0.0));
        self.ctx.save();
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        if self.circle(center, radius) {
            self.ctx.fill();
        }
        self.ctx.restore();
    }
}

/// Converts viewport coordinates into canvas coordinates and keeps the
/// backing store sized to the canvas' parent.
#[derive(Clone)]
pub struct CanvasFrame {
    canvas: HtmlCanvasElement,
}

impl CanvasFrame {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn to_canvas(&self, client: Vec2) -> Vec2 {
        let r = self.canvas.get_bounding_client_rect();
        Vec2::new(client.x - r.left(), client.y - r.top())
    }

    /// Resizes the canvas to its parent and returns the new logical size.
    pub fn fit_to_parent(&self) -> Bounds {
        let Some(parent) = self.canvas.parent_element() else {
            return self.bounds();
        };
        let r = parent.get_bounding_client_rect();
        self.canvas.set_width(r.width().max(0.0) as u32);
        self.canvas.set_height(r.height().max(0.0) as u32);
        self.bounds()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }
}
