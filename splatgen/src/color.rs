//! Color helpers for splat appearance
//!
//! Colors are linear RGB stored in a `DVec3`, each channel nominally in
//! `[0, 1]`. Generators clamp with [`clamp_color`] before attaching a color
//! to a splat.

use glam::DVec3;

/// HSV to RGB conversion
///
/// `h` wraps into `[0, 1)` (so ramps may run past 1.0), `s` and `v` are in
/// `[0, 1]`.
#[inline]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> DVec3 {
    let h = h.rem_euclid(1.0);
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (sector as u32) % 6 {
        0 => DVec3::new(v, t, p),
        1 => DVec3::new(q, v, p),
        2 => DVec3::new(p, v, t),
        3 => DVec3::new(p, q, v),
        4 => DVec3::new(t, p, v),
        _ => DVec3::new(v, p, q),
    }
}

/// Clamp every channel into `[0, 1]`
#[inline]
pub fn clamp_color(c: DVec3) -> DVec3 {
    c.clamp(DVec3::ZERO, DVec3::ONE)
}

/// Add a uniform offset to every channel, then clamp
#[inline]
pub fn brighten(c: DVec3, amount: f64) -> DVec3 {
    clamp_color(c + DVec3::splat(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).abs().max_element() < 1e-9
    }

    #[test]
    fn test_hsv_primaries() {
        assert!(close(hsv_to_rgb(0.0, 1.0, 1.0), DVec3::new(1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), DVec3::new(0.0, 1.0, 0.0)));
        assert!(close(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), DVec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hsv_wraps_hue() {
        assert!(close(hsv_to_rgb(1.25, 0.5, 0.8), hsv_to_rgb(0.25, 0.5, 0.8)));
        assert!(close(hsv_to_rgb(-0.75, 0.5, 0.8), hsv_to_rgb(0.25, 0.5, 0.8)));
    }

    #[test]
    fn test_hsv_zero_saturation_is_gray() {
        assert!(close(hsv_to_rgb(0.37, 0.0, 0.6), DVec3::splat(0.6)));
    }

    #[test]
    fn test_brighten_clamps() {
        let c = brighten(DVec3::new(0.9, 0.2, -0.1), 0.3);
        assert!(close(c, DVec3::new(1.0, 0.5, 0.2)));
    }
}
