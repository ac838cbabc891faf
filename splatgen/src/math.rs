//! Vector and quaternion helpers for splat orientation
//!
//! Plain vector arithmetic comes straight from glam's `DVec3` operators.
//! This module adds the epsilon-guarded pieces the generators rely on:
//! safe normalization, axis-angle and basis quaternion constructors, and
//! frame alignment of a local +Z axis to an arbitrary direction.
//!
//! Quaternions are `[x, y, z, w]` (glam's layout). Multiplication is the
//! Hamilton product, so `a * b` applies `b` first.

use glam::{DQuat, DVec3};

/// Below this length a vector is treated as zero
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Roll angles smaller than this are skipped entirely
pub const ROLL_EPSILON: f64 = 1e-12;

/// When `|dir.y|` reaches this, world Y is too close to `dir` to serve as "up"
pub const UP_PARALLEL_THRESHOLD: f64 = 0.9;

/// Normalize `v`, returning the zero vector for sub-epsilon input
#[inline]
pub fn normalize_or_zero(v: DVec3) -> DVec3 {
    let len = v.length();
    if len < NORMALIZE_EPSILON {
        DVec3::ZERO
    } else {
        v / len
    }
}

/// Rotation of `angle` radians around `axis`
///
/// The axis does not need to be unit length. A degenerate axis yields the
/// identity rotation.
pub fn quat_from_axis_angle(axis: DVec3, angle: f64) -> DQuat {
    let axis = normalize_or_zero(axis);
    if axis == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let (s, c) = (angle * 0.5).sin_cos();
    DQuat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

/// Quaternion for the rotation whose matrix columns are `x`, `y`, `z`
///
/// The three vectors must form a right-handed orthonormal basis expressed
/// in world space. Branches on the trace first, then on whichever diagonal
/// term dominates, so the square root never sees a near-zero argument
/// (stable through 180 degree rotations).
pub fn quat_from_basis(x: DVec3, y: DVec3, z: DVec3) -> DQuat {
    let (m00, m01, m02) = (x.x, y.x, z.x);
    let (m10, m11, m12) = (x.y, y.y, z.y);
    let (m20, m21, m22) = (x.z, y.z, z.z);

    let trace = m00 + m11 + m22;
    let q = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        DQuat::from_xyzw(
            (m21 - m12) / s,
            (m02 - m20) / s,
            (m10 - m01) / s,
            0.25 * s,
        )
    } else if m00 > m11 && m00 > m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        DQuat::from_xyzw(
            0.25 * s,
            (m01 + m10) / s,
            (m02 + m20) / s,
            (m21 - m12) / s,
        )
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        DQuat::from_xyzw(
            (m01 + m10) / s,
            0.25 * s,
            (m12 + m21) / s,
            (m02 - m20) / s,
        )
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        DQuat::from_xyzw(
            (m02 + m20) / s,
            (m12 + m21) / s,
            0.25 * s,
            (m10 - m01) / s,
        )
    };

    normalize_quat(q)
}

/// Two unit vectors perpendicular to `direction` (and to each other)
///
/// Returns `(x, y)` such that `(x, y, normalize(direction))` is a
/// right-handed orthonormal basis. Uses world Y as the up reference unless
/// the direction is nearly parallel to it, then world X.
pub fn perpendicular_frame(direction: DVec3) -> (DVec3, DVec3) {
    let z = normalize_or_zero(direction);
    let up = if z.y.abs() < UP_PARALLEL_THRESHOLD {
        DVec3::Y
    } else {
        DVec3::X
    };
    let x = normalize_or_zero(up.cross(z));
    let y = z.cross(x);
    (x, y)
}

/// Orientation whose local +Z axis points along `direction`
///
/// `roll` spins the frame around that axis afterwards (post-multiplied, so
/// it acts in the local frame and leaves +Z fixed). A zero direction gives
/// the identity.
pub fn quat_align_z(direction: DVec3, roll: f64) -> DQuat {
    let z = normalize_or_zero(direction);
    if z == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let (x, y) = perpendicular_frame(z);
    let q = quat_from_basis(x, y, z);
    if roll.abs() > ROLL_EPSILON {
        normalize_quat(q * quat_from_axis_angle(DVec3::Z, roll))
    } else {
        q
    }
}

/// Re-normalize a quaternion, falling back to identity when degenerate
#[inline]
pub fn normalize_quat(q: DQuat) -> DQuat {
    let len = q.length();
    if len < NORMALIZE_EPSILON {
        DQuat::IDENTITY
    } else {
        DQuat::from_xyzw(q.x / len, q.y / len, q.z / len, q.w / len)
    }
}

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
