//! Tunables for every layer.
//!
//! Defaults reproduce the landing page as designed for ~60 FPS. A page may
//! override any subset through a JSON `<script id="fx-config">` block; missing
//! keys keep their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};
use crate::geometry::Bounds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    pub particles: ParticleConfig,
    pub energy: EnergyConfig,
    pub streaks: StreakConfig,
    pub stages: StageTimings,
    /// Input debounce before a field is validated, in ms.
    pub debounce_ms: u32,
    /// Feedback particles spawned per validation.
    pub validation_burst: usize,
    pub fallback_width: f64,
    pub fallback_height: f64,
    pub audio: bool,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    pub count: usize,
    pub burst_count: usize,
    pub burst_max_life: u32,
    pub burst_speed: f64,
    pub connection_distance: f64,
    pub attraction_radius: f64,
    pub attraction_strength: f64,
    pub life_cycle: u32,
    pub glow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnergyConfig {
    pub smoothing: f64,
    pub glow_radius: f64,
    pub ripple_growth: f64,
    pub ripple_decay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreakConfig {
    pub count: usize,
}

/// Hold times for each choreographed stage step, in ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageTimings {
    pub button_exit_ms: u32,
    pub portal_entrance_ms: u32,
    pub field_stagger_ms: u32,
    pub submit_reveal_ms: u32,
    pub success_exit_ms: u32,
    pub success_portal_ms: u32,
    pub ring_stagger_ms: u32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            particles: ParticleConfig::default(),
            energy: EnergyConfig::default(),
            streaks: StreakConfig::default(),
            stages: StageTimings::default(),
            debounce_ms: 300,
            validation_burst: 5,
            fallback_width: Bounds::FALLBACK.width,
            fallback_height: Bounds::FALLBACK.height,
            audio: true,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 50,
            burst_count: 20,
            burst_max_life: 60,
            burst_speed: 5.0,
            connection_distance: 80.0,
            attraction_radius: 100.0,
            attraction_strength: 0.01,
            life_cycle: 200,
            glow: 10.0,
        }
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            glow_radius: 50.0,
            ripple_growth: 2.0,
            ripple_decay: 0.02,
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self { count: 20 }
    }
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            button_exit_ms: 1000,
            portal_entrance_ms: 100,
            field_stagger_ms: 200,
            submit_reveal_ms: 300,
            success_exit_ms: 1000,
            success_portal_ms: 100,
            ring_stagger_ms: 200,
        }
    }
}

impl StageTimings {
    pub fn button_exit(&self) -> Duration {
        ms(self.button_exit_ms)
    }

    pub fn portal_entrance(&self) -> Duration {
        ms(self.portal_entrance_ms)
    }

    /// Time for `fields` inputs to cascade in, followed by the submit button.
    pub fn form_cascade(&self, fields: usize) -> Duration {
        let fields = u32::try_from(fields).unwrap_or(u32::MAX);
        ms(self
            .field_stagger_ms
            .saturating_mul(fields)
            .saturating_add(self.submit_reveal_ms))
    }

    pub fn success_exit(&self) -> Duration {
        ms(self.success_exit_ms)
    }

    pub fn success_portal(&self) -> Duration {
        ms(self.success_portal_ms)
    }
}

fn ms(v: u32) -> Duration {
    Duration::from_millis(u64::from(v))
}

impl FxConfig {
    /// Parses a (possibly partial) JSON override and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn fallback_bounds(&self) -> Bounds {
        Bounds::new(self.fallback_width, self.fallback_height)
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.particles;
        let e = &self.energy;
        positive("particles.connectionDistance", p.connection_distance)?;
        positive("particles.attractionRadius", p.attraction_radius)?;
        positive("particles.burstSpeed", p.burst_speed)?;
        positive("particles.attractionStrength", p.attraction_strength)?;
        if !p.glow.is_finite() || p.glow < 0.0 {
            return Err(invalid("particles.glow", "must be a finite, non-negative blur"));
        }
        if p.life_cycle == 0 {
            return Err(invalid("particles.lifeCycle", "must be at least 1"));
        }
        if p.burst_max_life == 0 {
            return Err(invalid("particles.burstMaxLife", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&e.smoothing) || e.smoothing == 0.0 {
            return Err(invalid("energy.smoothing", "must be in (0, 1]"));
        }
        positive("energy.rippleDecay", e.ripple_decay)?;
        positive("energy.glowRadius", e.glow_radius)?;
        if e.ripple_growth < 0.0 {
            return Err(invalid("energy.rippleGrowth", "must not be negative"));
        }
        if self.fallback_bounds().is_degenerate() {
            return Err(invalid("fallbackWidth/fallbackHeight", "must be positive"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {v}")))
    }
}

fn invalid(field: &'static str, reason: &str) -> FxError {
    FxError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = FxConfig::default();
        c.validate().unwrap();
        assert_eq!(c.particles.count, 50);
        assert_eq!(c.debounce_ms, 300);
        assert_eq!(c.fallback_bounds(), Bounds::FALLBACK);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = FxConfig::from_json(r#"{"particles":{"count":80},"audio":false}"#).unwrap();
        assert_eq!(c.particles.count, 80);
        assert_eq!(c.particles.burst_count, 20);
        assert!(!c.audio);
        assert_eq!(c.stages, StageTimings::default());
    }

    #[test]
    fn rejects_bad_values() {
        let err = FxConfig::from_json(r#"{"energy":{"smoothing":0}}"#).unwrap_err();
        assert!(matches!(
            err,
            FxError::InvalidConfig {
                field: "energy.smoothing",
                ..
            }
        ));
        assert!(matches!(
            FxConfig::from_json("{not json"),
            Err(FxError::ConfigParse(_))
        ));
    }

    #[test]
    fn rejects_non_finite_particle_forces() {
        let mut c = FxConfig::default();
        c.particles.attraction_strength = f64::NAN;
        assert!(matches!(
            c.validate(),
            Err(FxError::InvalidConfig {
                field: "particles.attractionStrength",
                ..
            })
        ));

        let mut c = FxConfig::default();
        c.particles.glow = f64::INFINITY;
        assert!(matches!(
            c.validate(),
            Err(FxError::InvalidConfig {
                field: "particles.glow",
                ..
            })
        ));

        let c = FxConfig::from_json(r#"{"particles":{"attractionStrength":-0.5}}"#);
        assert!(c.is_err());
    }

    #[test]
    fn form_cascade_scales_with_fields() {
        let t = StageTimings::default();
        assert_eq!(t.form_cascade(0), Duration::from_millis(300));
        assert_eq!(t.form_cascade(3), Duration::from_millis(900));
    }

    #[test]
    fn unknown_log_level_means_info() {
        let c = FxConfig {
            log_level: "loud".into(),
            ..FxConfig::default()
        };
        assert_eq!(c.log_filter(), log::LevelFilter::Info);
    }
}
