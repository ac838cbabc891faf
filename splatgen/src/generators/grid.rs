//! Regular debug grid (position + color fixture)

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::ensure_positive;
use crate::error::GenError;
use crate::gaussian::{PointGaussian, PointScene};

/// `n x n x n` grid whose colors encode the normalized axis indices
///
/// Points are emitted z-major, then y, then x. A single-point grid gets a
/// neutral 0.5 gray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugGrid {
    /// Points per axis
    pub n: usize,
    /// Distance between neighbouring points
    pub spacing: f64,
    /// Grid center
    pub center: DVec3,
}

impl Default for DebugGrid {
    fn default() -> Self {
        Self {
            n: 10,
            spacing: 0.5,
            center: DVec3::ZERO,
        }
    }
}

impl DebugGrid {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.n == 0 {
            return Err(GenError::InvalidGridSize(self.n));
        }
        ensure_positive("debug_grid", "spacing", self.spacing)
    }

    pub fn point_count(&self) -> usize {
        self.n * self.n * self.n
    }

    pub fn build(&self) -> Result<PointScene, GenError> {
        self.validate()?;

        let n = self.n;
        let half = (n - 1) as f64 / 2.0;
        let channel = |i: usize| {
            if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                0.5
            }
        };

        let mut points = Vec::with_capacity(self.point_count());
        for iz in 0..n {
            for iy in 0..n {
                for ix in 0..n {
                    let index = DVec3::new(ix as f64, iy as f64, iz as f64);
                    let position = (index - half) * self.spacing + self.center;
                    let color = DVec3::new(channel(ix), channel(iy), channel(iz));
                    points.push(PointGaussian::new(position, color));
                }
            }
        }

        tracing::debug!("debug_grid: generated {} points", points.len());
        Ok(PointScene::new(points))
    }
}
