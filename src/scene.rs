//! Everything drawn on the particles canvas, stepped one frame at a time.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use web_time::Instant;

use crate::config::FxConfig;
use crate::energy::EnergyField;
use crate::geometry::{Bounds, Vec2};
use crate::palette::Neon;
use crate::particles::ParticleField;
use crate::streaks::StreakField;
use crate::surface::Surface;

/// Frames between frame-rate reports.
const REPORT_EVERY: u32 = 300;

pub struct Scene {
    particles: ParticleField,
    energy: EnergyField,
    streaks: StreakField,
    cursor: Option<Vec2>,
    bounds: Bounds,
    fallback: Bounds,
    burst_count: usize,
    validation_burst: usize,
    frames: u64,
}

impl Scene {
    pub fn new(config: &FxConfig, bounds: Bounds) -> Self {
        let particles = ParticleField::new(config.particles.clone());
        Self::build(config, bounds, particles, &mut StdRng::from_entropy())
    }

    pub fn seeded(config: &FxConfig, bounds: Bounds, seed: u64) -> Self {
        let particles = ParticleField::seeded(config.particles.clone(), seed);
        Self::build(config, bounds, particles, &mut StdRng::seed_from_u64(seed ^ 0x5eed))
    }

    fn build(
        config: &FxConfig,
        bounds: Bounds,
        mut particles: ParticleField,
        rng: &mut StdRng,
    ) -> Self {
        let fallback = config.fallback_bounds();
        let bounds = resolve(bounds, fallback);
        particles.initialize(config.particles.count, bounds);
        Self {
            particles,
            energy: EnergyField::new(config.energy.clone()),
            streaks: StreakField::new(config.streaks.count, bounds, rng),
            cursor: None,
            bounds,
            fallback,
            burst_count: config.particles.burst_count,
            validation_burst: config.validation_burst,
            frames: 0,
        }
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn energy(&self) -> &EnergyField {
        &self.energy
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Called when the canvas is resized. Zero sizes use the configured
    /// fallback.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = resolve(bounds, self.fallback);
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.cursor = Some(pos);
    }

    /// Adds a ripple if the click landed on the canvas. Returns whether it did.
    pub fn click(&mut self, pos: Vec2) -> bool {
        if self.bounds.contains(pos) {
            self.energy.add_ripple(pos.x, pos.y);
            true
        } else {
            false
        }
    }

    pub fn ripple(&mut self, pos: Vec2) {
        self.energy.add_ripple(pos.x, pos.y);
    }

    /// Particle explosion from the canvas centre.
    pub fn explode(&mut self) {
        self.particles
            .spawn_burst(self.bounds.center(), self.burst_count);
    }

    /// Green or pink sparks at `origin` after a field is validated.
    pub fn validation_sparks(&mut self, origin: Vec2, valid: bool) {
        self.particles.spawn_tinted_burst(
            origin,
            self.validation_burst,
            Neon::for_validity(valid),
        );
    }

    /// Advances one frame. All updates run before any drawing.
    pub fn update(&mut self) {
        self.particles.update(self.cursor, self.bounds);
        let target = self.cursor.unwrap_or_else(|| self.energy.position());
        self.energy.update(target);
        self.streaks.update(self.bounds);
        self.frames += 1;
    }

    /// The particle layer clears the surface, so it goes first.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.particles.render(surface);
        self.streaks.render(surface);
        self.energy.render(surface);
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.update();
        self.render(surface);
    }
}

fn resolve(bounds: Bounds, fallback: Bounds) -> Bounds {
    if bounds.is_degenerate() {
        fallback
    } else {
        bounds
    }
}

/// Measures wall time between frames.
///
/// Physics stays per-frame; the clock only feeds the periodic frame-rate
/// report.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    window_start: Option<Instant>,
    window_frames: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            window_start: None,
            window_frames: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTick {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTick {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);

        let start = *self.window_start.get_or_insert(now);
        self.window_frames += 1;
        let fps = if self.window_frames >= REPORT_EVERY {
            let elapsed = now.saturating_duration_since(start).as_secs_f64();
            self.window_start = Some(now);
            let frames = self.window_frames;
            self.window_frames = 0;
            (elapsed > 0.0).then(|| f64::from(frames) / elapsed)
        } else {
            None
        };
        FrameTick { dt, fps }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub dt: Duration,
    /// Average frame rate over the last report window, when one just closed.
    pub fps: Option<f64>,
}
