//! Galaxy point cloud (position + color fixture)
//!
//! Three populations: a squashed spherical core, logarithmic spiral arms
//! and a diffuse haze. The combined list is shuffled so the populations
//! interleave in the output.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::{ensure_count, ensure_non_negative, ensure_positive};
use crate::error::GenError;
use crate::gaussian::{PointGaussian, PointScene};
use crate::math::clamp01;

const NAME: &str = "galaxy_cloud";

/// Core radius is `radius * u^EXPONENT * FRACTION`
const CORE_RADIUS_EXPONENT: f64 = 2.8;
const CORE_RADIUS_FRACTION: f64 = 0.25;
const CORE_FLATTEN: f64 = 0.6;

const ARM_RADIUS_EXPONENT: f64 = 0.65;
/// Arms start winding at this fraction of the radius
const ARM_INNER_FRACTION: f64 = 0.02;
/// Arm thickness is `thickness * (BASE + GROWTH * r/radius)`
const ARM_THICKNESS_BASE: f64 = 0.4;
const ARM_THICKNESS_GROWTH: f64 = 0.6;
/// Arm color fade is `BASE + GROWTH * (1 - r/radius)`
const ARM_FADE_BASE: f64 = 0.4;
const ARM_FADE_GROWTH: f64 = 0.6;

const HAZE_RADIUS_EXPONENT: f64 = 0.9;
const HAZE_RADIUS_FRACTION: f64 = 1.2;
const HAZE_JITTER_FRACTION: f64 = 0.02;
const HAZE_THICKNESS: f64 = 2.5;
const HAZE_FADE_FRACTION: f64 = 1.3;
const HAZE_FADE_EXPONENT: f64 = 1.7;

/// Smallest radius fed to the arm logarithm
const MIN_ARM_RADIUS: f64 = 1e-9;

/// Spiral galaxy made of position + color points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyCloud {
    /// Total number of points
    pub points: usize,
    pub radius: f64,
    pub arms: u32,
    /// Standard deviation of the angular offset from an arm's centerline
    pub arm_spread: f64,
    /// Disk thickness (standard deviation scale)
    pub thickness: f64,
    /// Fraction of points in the core
    pub core_fraction: f64,
    /// Fraction of points in the haze
    pub haze_fraction: f64,
    /// Spiral tightness: angle grows by `tightness * ln(r / r_inner)`
    pub tightness: f64,
    pub core_color: DVec3,
    pub arm_color: DVec3,
    pub haze_color: DVec3,
}

impl Default for GalaxyCloud {
    fn default() -> Self {
        Self {
            points: 60_000,
            radius: 5.0,
            arms: 5,
            arm_spread: 0.25,
            thickness: 0.18,
            core_fraction: 0.18,
            haze_fraction: 0.20,
            tightness: 4.5,
            core_color: DVec3::new(1.0, 0.95, 0.85),
            arm_color: DVec3::new(0.25, 0.6, 1.0),
            haze_color: DVec3::new(0.8, 0.3, 1.0),
        }
    }
}

impl GalaxyCloud {
    pub fn with_points(points: usize) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// Point counts of the (core, arms, haze) populations
    pub fn population_sizes(&self) -> (usize, usize, usize) {
        let core = (self.points as f64 * self.core_fraction) as usize;
        let haze = (self.points as f64 * self.haze_fraction) as usize;
        (core, self.points - core - haze, haze)
    }

    pub fn validate(&self) -> Result<(), GenError> {
        ensure_count(NAME, self.points)?;
        ensure_positive(NAME, "radius", self.radius)?;
        if self.arms == 0 {
            return Err(GenError::param(NAME, "arms", "need at least one arm"));
        }
        ensure_non_negative(NAME, "arm_spread", self.arm_spread)?;
        ensure_non_negative(NAME, "thickness", self.thickness)?;
        ensure_non_negative(NAME, "core_fraction", self.core_fraction)?;
        ensure_non_negative(NAME, "haze_fraction", self.haze_fraction)?;
        if self.core_fraction + self.haze_fraction > 1.0 {
            return Err(GenError::param(
                NAME,
                "core_fraction",
                format!(
                    "core and haze fractions sum to {} (> 1)",
                    self.core_fraction + self.haze_fraction
                ),
            ));
        }
        Ok(())
    }

    /// Validate, then generate the shuffled point cloud
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<PointScene, GenError> {
        self.validate()?;
        let scene = self.generate(rng);
        tracing::debug!("{}: generated {} points", NAME, scene.len());
        Ok(scene)
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> PointScene {
        let (n_core, n_arms, n_haze) = self.population_sizes();
        let mut points = Vec::with_capacity(self.points);

        let core_radius = self.radius * CORE_RADIUS_FRACTION;
        for _ in 0..n_core {
            let r = core_radius * rng.random::<f64>().powf(CORE_RADIUS_EXPONENT);
            let theta = rng.random::<f64>() * TAU;
            let phi = (2.0 * rng.random::<f64>() - 1.0).acos();

            let position = DVec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos() * CORE_FLATTEN,
            );
            let t = clamp01(1.0 - r / core_radius);
            points.push(PointGaussian::new(
                position,
                self.arm_color.lerp(self.core_color, t),
            ));
        }

        let inner_radius = self.radius * ARM_INNER_FRACTION;
        for _ in 0..n_arms {
            let arm = rng.random_range(0..self.arms);
            let arm_offset = TAU * arm as f64 / self.arms as f64;

            let r = self.radius * rng.random::<f64>().powf(ARM_RADIUS_EXPONENT);
            let mut angle = self.tightness * (r.max(MIN_ARM_RADIUS) / inner_radius).ln() + arm_offset;
            angle += self.arm_spread * normal(rng);

            let rel = r / self.radius;
            let z = self.thickness * (ARM_THICKNESS_BASE + ARM_THICKNESS_GROWTH * rel) * normal(rng);
            let position = DVec3::new(r * angle.cos(), r * angle.sin(), z);

            let fade = ARM_FADE_BASE + ARM_FADE_GROWTH * (1.0 - rel);
            points.push(PointGaussian::new(position, self.arm_color * fade));
        }

        let haze_radius = self.radius * HAZE_RADIUS_FRACTION;
        let jitter = self.radius * HAZE_JITTER_FRACTION;
        for _ in 0..n_haze {
            let r = haze_radius * rng.random::<f64>().powf(HAZE_RADIUS_EXPONENT);
            let angle = rng.random::<f64>() * TAU;

            let position = DVec3::new(
                r * angle.cos() + jitter * normal(rng),
                r * angle.sin() + jitter * normal(rng),
                self.thickness * HAZE_THICKNESS * normal(rng),
            );
            let t = clamp01(1.0 - position.length() / (self.radius * HAZE_FADE_FRACTION));
            points.push(PointGaussian::new(
                position,
                self.haze_color * t.powf(HAZE_FADE_EXPONENT),
            ));
        }

        points.shuffle(rng);
        PointScene::new(points)
    }
}

#[inline]
fn normal<R: Rng>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}
