//! Scene file statistics
//!
//! Used by the `inspect` command to sanity-check a fixture before it is
//! handed to a renderer.

use splatgen::{Bounds, Scene};

/// Rotation norms further than this from 1 count as denormalized
pub const ROTATION_NORM_TOLERANCE: f32 = 1e-4;

/// Summary of a loaded scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStats {
    pub count: usize,
    pub bounds: Option<Bounds>,
    /// Smallest and largest opacity
    pub opacity_range: Option<(f32, f32)>,
    /// Largest `|‖rotation‖ - 1|`
    pub max_rotation_error: f32,
    /// Splats with any scale component `<= 0`
    pub non_positive_scales: usize,
    /// Splats with any color channel outside `[0, 1]`
    pub out_of_range_colors: usize,
}

impl SceneStats {
    pub fn collect(scene: &Scene) -> Self {
        let mut opacity_range: Option<(f32, f32)> = None;
        let mut max_rotation_error = 0.0f32;
        let mut non_positive_scales = 0;
        let mut out_of_range_colors = 0;

        for g in scene.iter() {
            opacity_range = Some(match opacity_range {
                Some((lo, hi)) => (lo.min(g.opacity), hi.max(g.opacity)),
                None => (g.opacity, g.opacity),
            });
            max_rotation_error = max_rotation_error.max((g.rotation_norm() - 1.0).abs());
            if g.scale.iter().any(|&s| s <= 0.0) {
                non_positive_scales += 1;
            }
            if g.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                out_of_range_colors += 1;
            }
        }

        Self {
            count: scene.len(),
            bounds: scene.bounds(),
            opacity_range,
            max_rotation_error,
            non_positive_scales,
            out_of_range_colors,
        }
    }

    /// True when every splat satisfies the renderer's input invariants
    pub fn is_clean(&self) -> bool {
        self.max_rotation_error <= ROTATION_NORM_TOLERANCE
            && self.non_positive_scales == 0
            && self.out_of_range_colors == 0
            && self
                .opacity_range
                .is_none_or(|(lo, hi)| lo >= 0.0 && hi <= 1.0)
    }

    pub fn log(&self) {
        tracing::info!("Gaussians: {}", self.count);
        if let Some(bounds) = self.bounds {
            tracing::info!(
                "Bounds: min {:?} max {:?} (extent {:?})",
                bounds.min,
                bounds.max,
                bounds.extent()
            );
        }
        if let Some((lo, hi)) = self.opacity_range {
            tracing::info!("Opacity: {:.3} .. {:.3}", lo, hi);
        }
        tracing::info!("Max rotation norm error: {:.2e}", self.max_rotation_error);
        if self.non_positive_scales > 0 {
            tracing::warn!("{} splats have non-positive scale", self.non_positive_scales);
        }
        if self.out_of_range_colors > 0 {
            tracing::warn!("{} splats have colors outside [0, 1]", self.out_of_range_colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splatgen::{Gaussian, SceneComposer};

    #[test]
    fn test_generated_scene_is_clean() {
        let scene = SceneComposer::new(11)
            .push(10, splatgen::CurveTube::with_count(200))
            .push(30, splatgen::BlobClusters::new(2, 40))
            .compose()
            .unwrap();
        let stats = SceneStats::collect(&scene);
        assert_eq!(stats.count, 280);
        assert!(stats.bounds.is_some());
        assert!(stats.is_clean());
    }

    #[test]
    fn test_flags_broken_splats() {
        let broken = Gaussian {
            mean: [0.0; 3],
            scale: [0.1, 0.0, 0.1],
            rotation: [0.0, 0.0, 0.0, 2.0],
            opacity: 0.5,
            color: [1.2, 0.0, 0.0],
        };
        let stats = SceneStats::collect(&Scene::new(vec![broken]));
        assert_eq!(stats.non_positive_scales, 1);
        assert_eq!(stats.out_of_range_colors, 1);
        assert!((stats.max_rotation_error - 1.0).abs() < 1e-6);
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_empty_scene() {
        let stats = SceneStats::collect(&Scene::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.bounds, None);
        assert_eq!(stats.opacity_range, None);
        assert!(stats.is_clean());
    }
}
