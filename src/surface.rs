//! Drawing primitives the canvas layers need.
//!
//! The simulation never talks to `CanvasRenderingContext2d` directly; the
//! browser implementation lives in `wasm::canvas`. [`Recorder`] captures draw
//! calls so layers can be checked on the host.

use crate::geometry::{Bounds, Vec2};
use crate::palette::Rgb;

pub trait Surface {
    /// Wipes the whole drawable area.
    fn clear(&mut self, bounds: Bounds);

    /// A straight line with a same-coloured shadow of `glow` px (0 for none).
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f64, width: f64, glow: f64);

    /// A filled circle with a same-coloured shadow of `glow` px.
    fn disc(&mut self, center: Vec2, radius: f64, color: Rgb, alpha: f64, glow: f64);

    /// A circle stroke with a same-coloured shadow of `glow` px.
    fn ring(&mut self, center: Vec2, radius: f64, color: Rgb, alpha: f64, width: f64, glow: f64);

    /// A radial gradient disc fading from `inner_alpha` at the centre to fully
    /// transparent at `radius`.
    fn radial_glow(&mut self, center: Vec2, radius: f64, color: Rgb, inner_alpha: f64);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Bounds),
    Line { from: Vec2, to: Vec2, alpha: f64 },
    Disc { center: Vec2, radius: f64, color: Rgb, alpha: f64 },
    Ring { center: Vec2, radius: f64, alpha: f64 },
    Glow { center: Vec2, radius: f64 },
}

/// In-memory [`Surface`] that keeps every call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn lines(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn discs(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Disc { .. }))
    }

    pub fn rings(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Ring { .. }))
    }
}

impl Surface for Recorder {
    fn clear(&mut self, bounds: Bounds) {
        self.ops.push(DrawOp::Clear(bounds));
    }

    fn line(&mut self, from: Vec2, to: Vec2, _color: Rgb, alpha: f64, _width: f64, _glow: f64) {
        self.ops.push(DrawOp::Line { from, to, alpha });
    }

    fn disc(&mut self, center: Vec2, radius: f64, color: Rgb, alpha: f64, _glow: f64) {
        self.ops.push(DrawOp::Disc {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn ring(&mut self, center: Vec2, radius: f64, _color: Rgb, alpha: f64, _width: f64, _glow: f64) {
        self.ops.push(DrawOp::Ring {
            center,
            radius,
            alpha,
        });
    }

    fn radial_glow(&mut self, center: Vec2, radius: f64, _color: Rgb, _inner_alpha: f64) {
        self.ops.push(DrawOp::Glow { center, radius });
    }
}
