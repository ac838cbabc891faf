//! Glow clusters
//!
//! Puffy blobs scattered through a bounding volume. Offsets inside a blob
//! use the Irwin-Hall sum of three uniforms, a cheap bell shape with hard
//! bounds, squashed vertically.

use std::f64::consts::PI;

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{SplatGenerator, centered, ensure_count, ensure_non_negative};
use crate::color::hsv_to_rgb;
use crate::error::GenError;
use crate::gaussian::Gaussian;
use crate::math::{normalize_or_zero, quat_align_z};

const NAME: &str = "blob_clusters";

/// Mean of the sum of three uniforms
const IRWIN_HALL_CENTER: f64 = 1.5;

const CLUSTER_SATURATION: f64 = 0.55;

/// Roll spans a full half turn either way
const ROLL_RANGE: f64 = PI;

const BASE_SCALE_MIN: f64 = 0.018;
const BASE_SCALE_SPAN: f64 = 0.030;
const AXIS_JITTER_MIN: f64 = 0.7;
const AXIS_JITTER_SPAN: f64 = 0.6;

/// Opacity: `(FLOOR + PEAK * exp(-d^2 / (2 w^2))) * jitter`
const OPACITY_FLOOR: f64 = 0.08;
const OPACITY_PEAK: f64 = 0.65;
const OPACITY_FALLOFF_WIDTH: f64 = 0.35;
const OPACITY_JITTER_MIN: f64 = 0.6;
const OPACITY_JITTER_SPAN: f64 = 0.8;
const OPACITY_MIN: f64 = 0.02;
const OPACITY_MAX: f64 = 0.95;

/// Core whitening: blend toward white by `STRENGTH * exp(-d^2 / (2 w^2))`
const WHITEN_STRENGTH: f64 = 0.35;
const WHITEN_WIDTH: f64 = 0.18;

/// Gaussian blobs around random centers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobClusters {
    /// Number of clusters
    pub clusters: usize,
    /// Splats per cluster
    pub per_cluster: usize,
    /// Size of the box (centered on the origin) cluster centers are drawn from
    pub extent: DVec3,
    /// Per-axis scale of the in-cluster offset
    pub spread: DVec3,
}

impl Default for BlobClusters {
    fn default() -> Self {
        Self {
            clusters: 6,
            per_cluster: 1200,
            extent: DVec3::new(18.0, 12.0, 18.0),
            spread: DVec3::new(0.75, 0.50, 0.75),
        }
    }
}

impl BlobClusters {
    pub fn new(clusters: usize, per_cluster: usize) -> Self {
        Self {
            clusters,
            per_cluster,
            ..Default::default()
        }
    }

    /// Largest possible distance between a splat and its cluster center
    pub fn max_offset(&self) -> f64 {
        (self.spread * IRWIN_HALL_CENTER).length()
    }

    fn irwin_hall<R: Rng>(rng: &mut R) -> f64 {
        rng.random::<f64>() + rng.random::<f64>() + rng.random::<f64>() - IRWIN_HALL_CENTER
    }
}

impl SplatGenerator for BlobClusters {
    fn name(&self) -> &'static str {
        NAME
    }

    fn count(&self) -> usize {
        self.clusters.saturating_mul(self.per_cluster)
    }

    fn validate(&self) -> Result<(), GenError> {
        if self.clusters == 0 {
            return Err(GenError::param(NAME, "clusters", "need at least one cluster"));
        }
        ensure_count(NAME, self.per_cluster)?;
        if self.clusters.checked_mul(self.per_cluster).is_none() {
            return Err(GenError::param(
                NAME,
                "per_cluster",
                format!(
                    "{} clusters of {} splats overflows the splat count",
                    self.clusters, self.per_cluster
                ),
            ));
        }
        for (name, v) in [("extent", self.extent), ("spread", self.spread)] {
            for c in v.to_array() {
                ensure_non_negative(NAME, name, c)?;
            }
        }
        Ok(())
    }

    fn generate<R: Rng>(&self, rng: &mut R, out: &mut Vec<Gaussian>) {
        out.reserve(self.count());
        let opacity_width2 = 2.0 * OPACITY_FALLOFF_WIDTH * OPACITY_FALLOFF_WIDTH;
        let whiten_width2 = 2.0 * WHITEN_WIDTH * WHITEN_WIDTH;

        for _ in 0..self.clusters {
            let center = DVec3::new(
                centered(rng) * self.extent.x,
                centered(rng) * self.extent.y,
                centered(rng) * self.extent.z,
            );
            let base_color = hsv_to_rgb(rng.random::<f64>(), CLUSTER_SATURATION, 1.0);

            for _ in 0..self.per_cluster {
                let offset = DVec3::new(
                    Self::irwin_hall(rng) * self.spread.x,
                    Self::irwin_hall(rng) * self.spread.y,
                    Self::irwin_hall(rng) * self.spread.z,
                );
                let mean = center + offset;

                let direction =
                    normalize_or_zero(DVec3::new(centered(rng), centered(rng), centered(rng)));
                let rotation = quat_align_z(direction, centered(rng) * ROLL_RANGE);

                let base = BASE_SCALE_MIN + BASE_SCALE_SPAN * rng.random::<f64>();
                let scale = DVec3::new(
                    base * (AXIS_JITTER_MIN + AXIS_JITTER_SPAN * rng.random::<f64>()),
                    base * (AXIS_JITTER_MIN + AXIS_JITTER_SPAN * rng.random::<f64>()),
                    base * (AXIS_JITTER_MIN + AXIS_JITTER_SPAN * rng.random::<f64>()),
                );

                let d2 = offset.length_squared();
                let opacity = (OPACITY_FLOOR + OPACITY_PEAK * (-d2 / opacity_width2).exp())
                    * (OPACITY_JITTER_MIN + OPACITY_JITTER_SPAN * rng.random::<f64>());
                let opacity = opacity.clamp(OPACITY_MIN, OPACITY_MAX);

                let core = (-d2 / whiten_width2).exp();
                let color = base_color.lerp(DVec3::ONE, WHITEN_STRENGTH * core);

                out.push(Gaussian::new(mean, scale, rotation, opacity, color));
            }
        }
    }
}
