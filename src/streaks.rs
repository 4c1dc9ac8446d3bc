//! Background "data streak" lines drifting across the canvas.

use std::f64::consts::TAU;

use rand::Rng;

use crate::geometry::{Bounds, Vec2};
use crate::palette::Neon;
use crate::surface::Surface;

const STREAK_ALPHA: f64 = 0.2;
const STREAK_GLOW: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Streak {
    pub origin: Vec2,
    pub length: f64,
    pub speed: f64,
    pub opacity: f64,
    pub angle: f64,
}

impl Streak {
    fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    pub fn tip(&self) -> Vec2 {
        self.origin + self.direction() * self.length
    }
}

#[derive(Debug, Default)]
pub struct StreakField {
    streaks: Vec<Streak>,
}

impl StreakField {
    pub fn new<R: Rng + ?Sized>(count: usize, bounds: Bounds, rng: &mut R) -> Self {
        let bounds = bounds.or_fallback();
        let streaks = (0..count)
            .map(|_| Streak {
                origin: Vec2::new(
                    rng.gen_range(0.0..bounds.width),
                    rng.gen_range(0.0..bounds.height),
                ),
                length: rng.gen_range(50.0..150.0),
                speed: rng.gen_range(1.0..3.0),
                opacity: rng.gen_range(0.2..0.7),
                angle: rng.gen_range(0.0..TAU),
            })
            .collect();
        Self { streaks }
    }

    pub fn streaks(&self) -> &[Streak] {
        &self.streaks
    }

    /// Moves each streak along its heading; leaving one edge re-enters at the
    /// opposite edge.
    pub fn update(&mut self, bounds: Bounds) {
        let Bounds { width, height } = bounds.or_fallback();
        for s in &mut self.streaks {
            s.origin += s.direction() * s.speed;
            if s.origin.x < 0.0 {
                s.origin.x = width;
            } else if s.origin.x > width {
                s.origin.x = 0.0;
            }
            if s.origin.y < 0.0 {
                s.origin.y = height;
            } else if s.origin.y > height {
                s.origin.y = 0.0;
            }
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let cyan = Neon::Cyan.rgb();
        for s in &self.streaks {
            surface.line(s.origin, s.tip(), cyan, STREAK_ALPHA * s.opacity, 1.0, STREAK_GLOW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn wraps_instead_of_bouncing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut f = StreakField::new(1, Bounds::new(100.0, 100.0), &mut rng);
        f.streaks[0].origin = Vec2::new(99.0, 50.0);
        f.streaks[0].angle = 0.0;
        f.streaks[0].speed = 2.0;
        f.update(Bounds::new(100.0, 100.0));
        assert_eq!(f.streaks()[0].origin.x, 0.0);
        assert!((f.streaks()[0].origin.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn one_line_per_streak() {
        let mut rng = StdRng::seed_from_u64(2);
        let f = StreakField::new(20, Bounds::new(0.0, 0.0), &mut rng);
        assert!(f.streaks().iter().all(|s| Bounds::FALLBACK.contains(s.origin)));
        let mut rec = crate::surface::Recorder::new();
        f.render(&mut rec);
        assert_eq!(rec.lines(), 20);
    }
}
