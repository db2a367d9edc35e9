//! Stochastic light flicker.
//!
//! Every so often (a random interval) the controller picks a new random
//! target intensity; every frame the current intensity eases towards it.
//! The output color is the base color scaled by the clamped intensity.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::lights::SMOOTHING_RATE;
use crate::error::LayoutError;
use crate::primitives::Color;

/// Per-light flicker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlickerProfile {
    /// Seconds between retargets, sampled uniformly.
    pub interval: (f32, f32),
    /// Target intensity, sampled uniformly.
    pub intensity: (f32, f32),
    /// Chance that a retarget goes fully dark instead of sampling `intensity`.
    pub blackout_chance: f32,
}

impl FlickerProfile {
    /// Barely perceptible wavering around a dim level.
    pub fn steady_dim() -> Self {
        Self {
            interval: (0.4, 1.2),
            intensity: (0.35, 0.5),
            blackout_chance: 0.0,
        }
    }

    /// Failing fluorescent tube.
    pub fn unstable() -> Self {
        Self {
            interval: (0.08, 0.4),
            intensity: (0.3, 1.0),
            blackout_chance: 0.0,
        }
    }

    /// Violent strobing with frequent blackouts.
    pub fn strobe() -> Self {
        Self {
            interval: (0.05, 0.2),
            intensity: (0.1, 1.0),
            blackout_chance: 0.3,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let (lo, hi) = self.interval;
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo > hi {
            return Err(LayoutError::InvalidRange {
                what: "flicker interval",
                min: lo,
                max: hi,
            });
        }
        let (lo, hi) = self.intensity;
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo > hi {
            return Err(LayoutError::InvalidRange {
                what: "flicker intensity",
                min: lo,
                max: hi,
            });
        }
        if !(0.0..=1.0).contains(&self.blackout_chance) {
            return Err(LayoutError::InvalidRange {
                what: "flicker blackout chance",
                min: self.blackout_chance,
                max: self.blackout_chance,
            });
        }
        Ok(())
    }
}

impl Default for FlickerProfile {
    fn default() -> Self {
        Self::unstable()
    }
}

/// Intensity simulator for one flickering light.
#[derive(Debug, Clone, PartialEq)]
pub struct FlickerController {
    base_color: Color,
    profile: FlickerProfile,
    timer: f32,
    current_intensity: f32,
    target_intensity: f32,
}

impl FlickerController {
    /// Starts at full intensity with an expired timer, so the first update
    /// picks a target.
    pub fn new(base_color: Color, profile: FlickerProfile) -> Result<Self, LayoutError> {
        profile.validate()?;
        Ok(Self {
            base_color,
            profile,
            timer: 0.0,
            current_intensity: 1.0,
            target_intensity: 1.0,
        })
    }

    /// Advance by `dt` seconds and return the color to apply to the light.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Color {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.timer -= dt;
        if self.timer <= 0.0 {
            let (lo, hi) = self.profile.interval;
            self.timer = rng.gen_range(lo..=hi);
            self.target_intensity = if rng.gen::<f32>() < self.profile.blackout_chance {
                0.0
            } else {
                let (lo, hi) = self.profile.intensity;
                rng.gen_range(lo..=hi)
            };
        }

        let t = (dt * SMOOTHING_RATE).min(1.0);
        self.current_intensity += (self.target_intensity - self.current_intensity) * t;

        self.color()
    }

    /// Current intensity clamped to `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        self.current_intensity.clamp(0.0, 1.0)
    }

    pub fn target_intensity(&self) -> f32 {
        self.target_intensity
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn profile(&self) -> &FlickerProfile {
        &self.profile
    }

    pub fn color(&self) -> Color {
        self.base_color.scaled(self.intensity())
    }
}
