//! Warped spiral disk
//!
//! A thin disk in the world XZ plane with several logarithmic spiral arms
//! and a warm core. Splats streak along the local spiral direction.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{SplatGenerator, centered, ensure_count, ensure_non_negative, ensure_positive};
use crate::color::brighten;
use crate::error::GenError;
use crate::gaussian::Gaussian;
use crate::math::{clamp01, quat_align_z};

const NAME: &str = "warped_disk";

/// Radius shaping exponent (> 1 concentrates mass near the center)
const RADIUS_EXPONENT: f64 = 1.7;

/// Out-of-plane spread: `(BASE + PER_RADIUS * r) * (u - 0.5)`
const THICKNESS_BASE: f64 = 0.06;
const THICKNESS_PER_RADIUS: f64 = 0.02;
/// In-plane positional noise, full range
const PLANE_NOISE: f64 = 0.06;
/// Warp: `AMPLITUDE * sin(FREQUENCY * angle) * (r / radius)`
const WARP_AMPLITUDE: f64 = 0.08;
const WARP_FREQUENCY: f64 = 0.6;

const ROLL_RANGE: f64 = 0.4;

const BASE_SCALE_MIN: f64 = 0.010;
const BASE_SCALE_SPAN: f64 = 0.018;
const RADIAL_MIN: f64 = 0.7;
const RADIAL_SPAN: f64 = 0.5;
const VERTICAL_FACTOR: f64 = 0.25;
const STREAK_MIN: f64 = 2.0;
const STREAK_SPAN: f64 = 3.5;

/// Sparkle: `u^EXPONENT * STRENGTH` added to every channel
const SPARKLE_EXPONENT: i32 = 10;
const SPARKLE_STRENGTH: f64 = 0.7;

/// Opacity: `(FLOOR + CORE * exp(-r^2 / (2 w^2)) + OUTER * (1 - r/radius)) * jitter`
const OPACITY_FLOOR: f64 = 0.08;
const OPACITY_CORE: f64 = 0.35;
const OPACITY_CORE_WIDTH: f64 = 1.2;
const OPACITY_OUTER: f64 = 0.18;
const OPACITY_JITTER_MIN: f64 = 0.7;
const OPACITY_JITTER_SPAN: f64 = 0.7;
const OPACITY_MIN: f64 = 0.03;
const OPACITY_MAX: f64 = 0.85;

/// Flattened multi-arm spiral disk with a bright core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpedDisk {
    pub count: usize,
    /// Number of spiral arms
    pub arms: u32,
    /// Outer radius
    pub radius: f64,
    /// Spiral curl: angle grows by `curl * ln(1 + r)`
    pub curl: f64,
    /// World-space center
    pub center: DVec3,
    pub core_color: DVec3,
    pub arm_color: DVec3,
}

impl Default for WarpedDisk {
    fn default() -> Self {
        Self {
            count: 9000,
            arms: 3,
            radius: 5.0,
            curl: 1.35,
            center: DVec3::new(9.0, -2.0, 7.0),
            core_color: DVec3::new(1.00, 0.75, 0.45),
            arm_color: DVec3::new(0.55, 0.70, 1.00),
        }
    }
}

impl WarpedDisk {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }
}

impl SplatGenerator for WarpedDisk {
    fn name(&self) -> &'static str {
        NAME
    }

    fn count(&self) -> usize {
        self.count
    }

    fn validate(&self) -> Result<(), GenError> {
        ensure_count(NAME, self.count)?;
        if self.arms == 0 {
            return Err(GenError::param(NAME, "arms", "need at least one arm"));
        }
        ensure_positive(NAME, "radius", self.radius)?;
        ensure_non_negative(NAME, "curl", self.curl)?;
        Ok(())
    }

    fn generate<R: Rng>(&self, rng: &mut R, out: &mut Vec<Gaussian>) {
        out.reserve(self.count);
        let core_width2 = 2.0 * OPACITY_CORE_WIDTH * OPACITY_CORE_WIDTH;

        for _ in 0..self.count {
            let r = rng.random::<f64>().powf(RADIUS_EXPONENT) * self.radius;
            let theta = rng.random::<f64>() * TAU;

            let arm = rng.random_range(0..self.arms);
            let arm_phase = TAU * arm as f64 / self.arms as f64;
            let angle = theta + arm_phase + self.curl * r.ln_1p();
            let (sin_a, cos_a) = angle.sin_cos();

            let mut x = r * cos_a;
            let mut z = r * sin_a;
            let mut y = centered(rng) * (THICKNESS_BASE + THICKNESS_PER_RADIUS * r);
            x += centered(rng) * PLANE_NOISE;
            z += centered(rng) * PLANE_NOISE;
            y += WARP_AMPLITUDE * (WARP_FREQUENCY * angle).sin() * (r / self.radius);
            let mean = self.center + DVec3::new(x, y, z);

            // Tangent of the circle through this angle, in the disk plane
            let tangent = DVec3::new(-sin_a, 0.0, cos_a);
            let rotation = quat_align_z(tangent, centered(rng) * ROLL_RANGE);

            let base = BASE_SCALE_MIN + BASE_SCALE_SPAN * rng.random::<f64>();
            let scale = DVec3::new(
                base * (RADIAL_MIN + RADIAL_SPAN * rng.random::<f64>()),
                base * VERTICAL_FACTOR,
                base * (STREAK_MIN + STREAK_SPAN * rng.random::<f64>()),
            );

            let t = clamp01(r / self.radius);
            let sparkle = rng.random::<f64>().powi(SPARKLE_EXPONENT) * SPARKLE_STRENGTH;
            let color = brighten(self.core_color.lerp(self.arm_color, t), sparkle);

            let core_boost = (-(r * r) / core_width2).exp();
            let opacity = (OPACITY_FLOOR + OPACITY_CORE * core_boost + OPACITY_OUTER * (1.0 - t))
                * (OPACITY_JITTER_MIN + OPACITY_JITTER_SPAN * rng.random::<f64>());
            let opacity = opacity.clamp(OPACITY_MIN, OPACITY_MAX);

            out.push(Gaussian::new(mean, scale, rotation, opacity, color));
        }
    }
}
