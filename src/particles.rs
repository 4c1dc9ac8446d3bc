//! Ambient particle field with cursor attraction and one-shot bursts.
//!
//! Ambient particles live forever: when their life counter passes the
//! configured cycle they are recycled in place with a new colour. Burst
//! particles (button explosion, validation feedback) fade out and are dropped
//! once they reach their `max_life`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::geometry::{Bounds, Vec2};
use crate::palette::Neon;
use crate::surface::Surface;

const CONNECTION_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Ambient,
    Burst { max_life: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f64,
    pub opacity: f64,
    pub color: Neon,
    pub life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn is_burst(&self) -> bool {
        matches!(self.kind, ParticleKind::Burst { .. })
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    config: ParticleConfig,
    bounds: Bounds,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic field for tests and replays.
    pub fn seeded(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            config,
            bounds: Bounds::FALLBACK,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for scripted scenes; the set itself cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Replaces the field with `count` ambient particles spread over `bounds`.
    pub fn initialize(&mut self, count: usize, bounds: Bounds) {
        self.bounds = bounds.or_fallback();
        let Bounds { width, height } = self.bounds;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| Particle {
                pos: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
                vel: Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)),
                size: rng.gen_range(1.0..4.0),
                opacity: rng.gen_range(0.3..0.8),
                color: Neon::random(rng),
                life: rng.gen_range(0..100),
                kind: ParticleKind::Ambient,
            })
            .collect();
    }

    /// Adds `count` fast, short-lived particles at `origin` in random colours.
    pub fn spawn_burst(&mut self, origin: Vec2, count: usize) {
        self.spawn(origin, count, None);
    }

    /// Like [`spawn_burst`](Self::spawn_burst) but every particle uses `color`.
    pub fn spawn_tinted_burst(&mut self, origin: Vec2, count: usize, color: Neon) {
        self.spawn(origin, count, Some(color));
    }

    fn spawn(&mut self, origin: Vec2, count: usize, color: Option<Neon>) {
        let origin = self.bounds.clamp(origin);
        let speed = self.config.burst_speed;
        let max_life = self.config.burst_max_life;
        let rng = &mut self.rng;
        self.particles.extend((0..count).map(|_| Particle {
            pos: origin,
            vel: Vec2::new(rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed)),
            size: rng.gen_range(2.0..7.0),
            opacity: 1.0,
            color: color.unwrap_or_else(|| Neon::random(rng)),
            life: 0,
            kind: ParticleKind::Burst { max_life },
        }));
    }

    /// Advances every particle by one frame.
    ///
    /// `cursor` is the pointer in canvas coordinates, or `None` before the
    /// pointer has ever entered the page.
    pub fn update(&mut self, cursor: Option<Vec2>, bounds: Bounds) {
        self.bounds = bounds.or_fallback();
        let bounds = self.bounds;
        let radius = self.config.attraction_radius;
        let strength = self.config.attraction_strength;
        let cycle = self.config.life_cycle;
        let rng = &mut self.rng;

        for p in &mut self.particles {
            p.pos += p.vel;

            if let Some(cursor) = cursor {
                let to_cursor = cursor - p.pos;
                let distance = to_cursor.length();
                if distance < radius {
                    let force = (radius - distance) / radius;
                    p.vel += to_cursor * (force * strength);
                }
            }

            if p.pos.x < 0.0 || p.pos.x > bounds.width {
                p.vel.x = -p.vel.x;
            }
            if p.pos.y < 0.0 || p.pos.y > bounds.height {
                p.vel.y = -p.vel.y;
            }
            p.pos = bounds.clamp(p.pos);

            p.life += 1;
            match p.kind {
                ParticleKind::Ambient => {
                    if p.life > cycle {
                        p.life = 0;
                        p.color = Neon::random(rng);
                    }
                }
                ParticleKind::Burst { max_life } => {
                    p.opacity = 1.0 - f64::from(p.life.min(max_life)) / f64::from(max_life);
                }
            }
        }

        self.particles.retain(|p| match p.kind {
            ParticleKind::Ambient => true,
            ParticleKind::Burst { max_life } => p.life < max_life,
        });
    }

    /// Index pairs of particles close enough to be linked.
    ///
    /// Brute force over every pair. Fine for the ~50 particles the page uses;
    /// past a few hundred this should bucket particles into a grid of
    /// `connection_distance` cells and only compare neighbouring buckets.
    pub fn connections(&self) -> Vec<(usize, usize)> {
        let max = self.config.connection_distance;
        let mut pairs = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                if a.pos.distance(b.pos) < max {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Clears the surface, then draws links and particles.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.bounds);

        let link = Neon::Cyan.rgb();
        for (i, j) in self.connections() {
            surface.line(
                self.particles[i].pos,
                self.particles[j].pos,
                link,
                CONNECTION_ALPHA,
                1.0,
                0.0,
            );
        }

        for p in &self.particles {
            surface.disc(p.pos, p.size, p.color.rgb(), p.opacity, self.config.glow);
        }
    }
}
