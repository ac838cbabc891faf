//! Curve tube: splats streaking along a torus knot
//!
//! Samples walk the knot at evenly spaced parameters. Each splat is pushed
//! off the centerline inside the plane perpendicular to the tangent, with
//! a square-root radial profile that keeps mass near the core. The long
//! local axis follows the tangent so splats read as streaks along the curve.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{SplatGenerator, centered, ensure_count, ensure_positive};
use crate::color::{clamp_color, hsv_to_rgb};
use crate::curve::{Curve, TorusKnot};
use crate::error::GenError;
use crate::gaussian::Gaussian;
use crate::math::{perpendicular_frame, quat_align_z};

const NAME: &str = "curve_tube";

/// Full range of the random roll around the tangent, in radians
const ROLL_RANGE: f64 = 0.8;

/// Base scale: `MIN + SPAN * u`
const BASE_SCALE_MIN: f64 = 0.015;
const BASE_SCALE_SPAN: f64 = 0.020;
/// Transverse multiplier: `MIN + SPAN * u`
const TRANSVERSE_MIN: f64 = 0.6;
const TRANSVERSE_SPAN: f64 = 0.8;
/// Along-tangent multiplier: `MIN + SPAN * u`
const STREAK_MIN: f64 = 3.0;
const STREAK_SPAN: f64 = 5.0;

/// Full range of the additive per-channel color noise
const COLOR_NOISE: f64 = 0.08;

/// Opacity: `(FLOOR + PEAK * exp(-rad^2 / (2 w^2))) * (JITTER_MIN + JITTER_SPAN * u)`
const OPACITY_FLOOR: f64 = 0.18;
const OPACITY_PEAK: f64 = 0.55;
const OPACITY_FALLOFF_WIDTH: f64 = 0.12;
const OPACITY_JITTER_MIN: f64 = 0.7;
const OPACITY_JITTER_SPAN: f64 = 0.6;
const OPACITY_MIN: f64 = 0.05;
const OPACITY_MAX: f64 = 0.95;

/// Splats streaking around a torus knot tube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveTube {
    /// Number of splats
    pub count: usize,
    /// Centerline curve
    pub knot: TorusKnot,
    /// How many full knot periods the samples cover
    pub periods: f64,
    /// Maximum distance from the centerline
    pub tube_radius: f64,
    /// Hue at `t = 0`
    pub base_hue: f64,
    /// Hue added per knot period
    pub hue_per_period: f64,
    pub saturation: f64,
}

impl Default for CurveTube {
    fn default() -> Self {
        Self {
            count: 7000,
            knot: TorusKnot {
                p: 2,
                q: 3,
                major_radius: 2.7,
                minor_radius: 1.1,
                center: DVec3::new(-8.0, 3.0, -5.0),
            },
            periods: 6.0,
            tube_radius: 0.35,
            base_hue: 0.55,
            hue_per_period: 0.08,
            saturation: 0.65,
        }
    }
}

impl CurveTube {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }
}

impl SplatGenerator for CurveTube {
    fn name(&self) -> &'static str {
        NAME
    }

    fn count(&self) -> usize {
        self.count
    }

    fn validate(&self) -> Result<(), GenError> {
        ensure_count(NAME, self.count)?;
        let (p, q) = (self.knot.p, self.knot.q);
        if p == 0 || q == 0 {
            return Err(GenError::param(
                NAME,
                "knot",
                format!("winding numbers must be positive (got p={p}, q={q})"),
            ));
        }
        if gcd(p, q) != 1 {
            return Err(GenError::param(
                NAME,
                "knot",
                format!("winding numbers must be coprime (got p={p}, q={q})"),
            ));
        }
        ensure_positive(NAME, "knot.major_radius", self.knot.major_radius)?;
        ensure_positive(NAME, "knot.minor_radius", self.knot.minor_radius)?;
        ensure_positive(NAME, "periods", self.periods)?;
        ensure_positive(NAME, "tube_radius", self.tube_radius)?;
        Ok(())
    }

    fn generate<R: Rng>(&self, rng: &mut R, out: &mut Vec<Gaussian>) {
        out.reserve(self.count);
        let width2 = 2.0 * OPACITY_FALLOFF_WIDTH * OPACITY_FALLOFF_WIDTH;

        for i in 0..self.count {
            let t = (i as f64 / self.count as f64) * TAU * self.periods;
            let center = self.knot.position(t);
            let tangent = self.knot.tangent(t);

            // Displace inside the plane perpendicular to the tangent
            let (n1, n2) = perpendicular_frame(tangent);
            let angle = rng.random::<f64>() * TAU;
            let rad = rng.random::<f64>().sqrt() * self.tube_radius;
            let (sin_a, cos_a) = angle.sin_cos();
            let mean = center + n1 * (cos_a * rad) + n2 * (sin_a * rad);

            let rotation = quat_align_z(tangent, centered(rng) * ROLL_RANGE);

            let base = BASE_SCALE_MIN + BASE_SCALE_SPAN * rng.random::<f64>();
            let scale = DVec3::new(
                base * (TRANSVERSE_MIN + TRANSVERSE_SPAN * rng.random::<f64>()),
                base * (TRANSVERSE_MIN + TRANSVERSE_SPAN * rng.random::<f64>()),
                base * (STREAK_MIN + STREAK_SPAN * rng.random::<f64>()),
            );

            let hue = (t / TAU) * self.hue_per_period + self.base_hue;
            let noise = DVec3::new(
                centered(rng) * COLOR_NOISE,
                centered(rng) * COLOR_NOISE,
                centered(rng) * COLOR_NOISE,
            );
            let color = clamp_color(hsv_to_rgb(hue, self.saturation, 1.0) + noise);

            let core = (-(rad * rad) / width2).exp();
            let opacity = (OPACITY_FLOOR + OPACITY_PEAK * core)
                * (OPACITY_JITTER_MIN + OPACITY_JITTER_SPAN * rng.random::<f64>());
            let opacity = opacity.clamp(OPACITY_MIN, OPACITY_MAX);

            out.push(Gaussian::new(mean, scale, rotation, opacity, color));
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
