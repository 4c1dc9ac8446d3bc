//! Cursor-following glow and the ripples left by clicks and hovers.

use crate::config::EnergyConfig;
use crate::geometry::Vec2;
use crate::palette::Neon;
use crate::surface::Surface;

const GLOW_ALPHA: f64 = 0.3;
const RING_WIDTH: f64 = 2.0;
const RING_GLOW: f64 = 10.0;

/// An expanding, fading ring.
///
/// Opacity is derived from the ripple's age so each tick lowers it by exactly
/// the configured decay.
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub origin: Vec2,
    pub radius: f64,
    age: u32,
}

impl Ripple {
    fn new(origin: Vec2) -> Self {
        Self {
            origin,
            radius: 0.0,
            age: 0,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn opacity(&self, decay: f64) -> f64 {
        1.0 - f64::from(self.age) * decay
    }
}

pub struct EnergyField {
    pos: Vec2,
    ripples: Vec<Ripple>,
    config: EnergyConfig,
}

impl EnergyField {
    pub fn new(config: EnergyConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            ripples: Vec::new(),
            config,
        }
    }

    /// Smoothed glow centre.
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Live ripples, oldest first.
    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn ripple_opacity(&self, ripple: &Ripple) -> f64 {
        ripple.opacity(self.config.ripple_decay)
    }

    pub fn add_ripple(&mut self, x: f64, y: f64) {
        self.ripples.push(Ripple::new(Vec2::new(x, y)));
    }

    /// One frame: low-pass the glow towards `cursor`, grow and fade ripples,
    /// drop the ones that have faded out.
    pub fn update(&mut self, cursor: Vec2) {
        self.pos = self.pos.approach(cursor, self.config.smoothing);

        let growth = self.config.ripple_growth;
        let decay = self.config.ripple_decay;
        self.ripples.retain_mut(|r| {
            r.radius += growth;
            r.age += 1;
            // 1e-9 absorbs float error so the 50th tick at 0.02 really removes it
            r.opacity(decay) > 1e-9
        });
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let cyan = Neon::Cyan.rgb();
        surface.radial_glow(self.pos, self.config.glow_radius, cyan, GLOW_ALPHA);
        for r in &self.ripples {
            surface.ring(
                r.origin,
                r.radius,
                cyan,
                self.ripple_opacity(r),
                RING_WIDTH,
                RING_GLOW,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;

    fn field() -> EnergyField {
        EnergyField::new(EnergyConfig::default())
    }

    #[test]
    fn glow_lags_behind_cursor() {
        let mut f = field();
        f.update(Vec2::new(100.0, 0.0));
        assert!((f.position().x - 10.0).abs() < 1e-12);
        f.update(Vec2::new(100.0, 0.0));
        assert!((f.position().x - 19.0).abs() < 1e-12);
    }

    #[test]
    fn ripple_lives_fifty_frames() {
        let mut f = field();
        f.add_ripple(5.0, 5.0);
        assert_eq!(f.ripple_opacity(&f.ripples()[0]), 1.0);
        for frame in 1..50 {
            f.update(Vec2::ZERO);
            let r = &f.ripples()[0];
            assert_eq!(r.radius, 2.0 * frame as f64);
            assert!((f.ripple_opacity(r) - (1.0 - 0.02 * frame as f64)).abs() < 1e-12);
        }
        f.update(Vec2::ZERO);
        assert!(f.ripples().is_empty());
    }

    #[test]
    fn expiry_keeps_order() {
        let mut f = field();
        f.add_ripple(0.0, 0.0);
        for _ in 0..10 {
            f.update(Vec2::ZERO);
        }
        f.add_ripple(1.0, 1.0);
        f.update(Vec2::ZERO);
        assert_eq!(f.ripples()[0].origin, Vec2::ZERO);
        assert!(f.ripples()[0].age() > f.ripples()[1].age());
        for _ in 0..39 {
            f.update(Vec2::ZERO);
        }
        assert_eq!(f.ripples().len(), 1);
        assert_eq!(f.ripples()[0].origin, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn render_draws_glow_and_rings() {
        let mut f = field();
        f.add_ripple(1.0, 1.0);
        f.add_ripple(2.0, 2.0);
        let mut rec = Recorder::new();
        f.render(&mut rec);
        assert_eq!(rec.rings(), 2);
        assert_eq!(rec.ops.len(), 3);
    }
}
