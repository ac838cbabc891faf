//! Splat data types
//!
//! [`Gaussian`] is the full anisotropic primitive handed to serialization.
//! [`PointGaussian`] is its position + color projection, used by the
//! simpler point fixture format.
//!
//! Generators compute in f64; the stored values are f32, matching the
//! renderer's upload layout.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::math::normalize_quat;

/// One anisotropic 3D Gaussian
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    /// Center position
    pub mean: [f32; 3],
    /// Standard deviation along the local X/Y/Z axes, before rotation
    pub scale: [f32; 3],
    /// Unit quaternion `[x, y, z, w]` mapping local axes into world space
    pub rotation: [f32; 4],
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Linear RGB, each channel in `[0, 1]`
    pub color: [f32; 3],
}

impl Gaussian {
    /// Build a splat, enforcing the output invariants
    ///
    /// The rotation is re-normalized, opacity and color are clamped to
    /// `[0, 1]`. Scale is stored as given; generators only produce strictly
    /// positive scales.
    pub fn new(mean: DVec3, scale: DVec3, rotation: DQuat, opacity: f64, color: DVec3) -> Self {
        debug_assert!(scale.min_element() > 0.0, "non-positive scale {scale:?}");
        let rotation = normalize_quat(rotation);
        let color = color.clamp(DVec3::ZERO, DVec3::ONE);
        Self {
            mean: mean.as_vec3().to_array(),
            scale: scale.as_vec3().to_array(),
            rotation: [
                rotation.x as f32,
                rotation.y as f32,
                rotation.z as f32,
                rotation.w as f32,
            ],
            opacity: opacity.clamp(0.0, 1.0) as f32,
            color: color.as_vec3().to_array(),
        }
    }

    /// Drop shape data, keeping only position and color
    pub fn to_point(&self) -> PointGaussian {
        PointGaussian {
            position: self.mean,
            color: self.color,
        }
    }

    /// Euclidean norm of the stored rotation quaternion
    pub fn rotation_norm(&self) -> f32 {
        self.rotation.iter().map(|c| c * c).sum::<f32>().sqrt()
    }
}

/// Position + color only splat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGaussian {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointGaussian {
    pub fn new(position: DVec3, color: DVec3) -> Self {
        Self {
            position: position.as_vec3().to_array(),
            color: color.clamp(DVec3::ZERO, DVec3::ONE).as_vec3().to_array(),
        }
    }
}

/// Axis-aligned bounding box of splat positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn from_positions<'a>(mut positions: impl Iterator<Item = &'a [f32; 3]>) -> Option<Self> {
        let first = *positions.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in positions {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(p[axis]);
                bounds.max[axis] = bounds.max[axis].max(p[axis]);
            }
        }
        Some(bounds)
    }

    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Ordered collection of full splats
///
/// Order is generation order; there is no identity beyond the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub gaussians: Vec<Gaussian>,
}

impl Scene {
    pub fn new(gaussians: Vec<Gaussian>) -> Self {
        Self { gaussians }
    }

    pub fn len(&self) -> usize {
        self.gaussians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaussians.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gaussian> {
        self.gaussians.iter()
    }

    /// Bounding box of all means, `None` for an empty scene
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(self.gaussians.iter().map(|g| &g.mean))
    }

    /// Project every splat to position + color
    pub fn to_points(&self) -> PointScene {
        PointScene {
            gaussians: self.gaussians.iter().map(Gaussian::to_point).collect(),
        }
    }
}

/// Ordered collection of position + color splats
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointScene {
    pub gaussians: Vec<PointGaussian>,
}

impl PointScene {
    pub fn new(gaussians: Vec<PointGaussian>) -> Self {
        Self { gaussians }
    }

    pub fn len(&self) -> usize {
        self.gaussians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaussians.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(self.gaussians.iter().map(|g| &g.position))
    }
}
