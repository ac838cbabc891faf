//! Parametric curves
//!
//! A [`Curve`] maps a scalar parameter to a world-space position. Tangents
//! are estimated by central differencing unless an implementation knows
//! better.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::math::normalize_or_zero;

/// Finite-difference half-step used for tangent estimation
///
/// Small next to the feature size of the fixture curves (radii around 1),
/// large enough that `f(t + h) - f(t - h)` keeps plenty of significant bits
/// in f64.
pub const TANGENT_STEP: f64 = 1e-3;

/// A closed-form 3D curve
pub trait Curve {
    /// Position at parameter `t`
    fn position(&self, t: f64) -> DVec3;

    /// Unit tangent at parameter `t` (zero where the curve is stationary)
    fn tangent(&self, t: f64) -> DVec3 {
        let a = self.position(t - TANGENT_STEP);
        let b = self.position(t + TANGENT_STEP);
        normalize_or_zero(b - a)
    }
}

/// Adapter turning any `Fn(f64) -> DVec3` into a [`Curve`]
pub struct FnCurve<F>(pub F);

impl<F> Curve for FnCurve<F>
where
    F: Fn(f64) -> DVec3,
{
    fn position(&self, t: f64) -> DVec3 {
        (self.0)(t)
    }
}

/// `(p, q)` torus knot
///
/// Winds `p` times around the torus' axis of symmetry and `q` times through
/// its hole. One full period is `t` in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorusKnot {
    pub p: u32,
    pub q: u32,
    /// Distance from the torus center to the tube center
    pub major_radius: f64,
    /// Radius of the torus tube the knot lies on
    pub minor_radius: f64,
    /// World-space translation
    pub center: DVec3,
}

impl Default for TorusKnot {
    fn default() -> Self {
        Self {
            p: 2,
            q: 3,
            major_radius: 2.5,
            minor_radius: 1.0,
            center: DVec3::ZERO,
        }
    }
}

impl Curve for TorusKnot {
    fn position(&self, t: f64) -> DVec3 {
        let (p, q) = (self.p as f64, self.q as f64);
        let (sqt, cqt) = (q * t).sin_cos();
        let (spt, cpt) = (p * t).sin_cos();
        let ring = self.major_radius + self.minor_radius * cqt;
        self.center + DVec3::new(ring * cpt, ring * spt, self.minor_radius * sqt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_torus_knot_is_closed() {
        let knot = TorusKnot::default();
        let a = knot.position(0.3);
        let b = knot.position(0.3 + TAU);
        assert!((a - b).length() < 1e-9);
    }

    #[test]
    fn test_torus_knot_lies_on_torus() {
        let knot = TorusKnot {
            center: DVec3::new(-8.0, 3.0, -5.0),
            ..Default::default()
        };
        for i in 0..64 {
            let t = i as f64 / 64.0 * TAU;
            let local = knot.position(t) - knot.center;
            let ring = (local.x * local.x + local.y * local.y).sqrt() - knot.major_radius;
            let tube = (ring * ring + local.z * local.z).sqrt();
            assert!((tube - knot.minor_radius).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tangent_of_circle() {
        let circle = FnCurve(|t: f64| DVec3::new(t.cos(), t.sin(), 0.0));
        let tan = circle.tangent(0.0);
        assert!((tan - DVec3::Y).length() < 1e-6);
        assert!((tan.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_matches_analytic_knot_derivative() {
        let knot = TorusKnot::default();
        let (p, q, big_r, r) = (2.0, 3.0, knot.major_radius, knot.minor_radius);
        for i in 0..16 {
            let t = i as f64 * 0.37;
            let ring = big_r + r * (q * t).cos();
            let d_ring = -r * q * (q * t).sin();
            let exact = DVec3::new(
                d_ring * (p * t).cos() - ring * p * (p * t).sin(),
                d_ring * (p * t).sin() + ring * p * (p * t).cos(),
                r * q * (q * t).cos(),
            )
            .normalize();
            assert!((knot.tangent(t) - exact).length() < 1e-5);
        }
    }

    #[test]
    fn test_stationary_curve_has_zero_tangent() {
        let point = FnCurve(|_t: f64| DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(point.tangent(0.5), DVec3::ZERO);
    }
}
