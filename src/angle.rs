use std::f32::consts::{PI, TAU};

/// Slopes steeper than this (or flatter than its inverse) are clamped so the
/// grid walk never sees `inf` or `NaN`.
pub const SLOPE_LIMIT: f32 = 1.0e6;

/// Wraps any angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

#[inline]
pub fn to_degrees(rad: f32) -> f32 {
    rad * 180.0 / PI
}

#[inline]
pub fn to_radians(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// `tan(angle)` clamped to `±SLOPE_LIMIT` in magnitude, and kept at least
/// `1 / SLOPE_LIMIT` away from zero. A zero slope keeps a positive sign.
pub fn guarded_tan(angle: f32) -> f32 {
    let t = angle.tan();
    if !t.is_finite() {
        return SLOPE_LIMIT;
    }
    let floor = 1.0 / SLOPE_LIMIT;
    let sign = if t < 0.0 { -1.0 } else { 1.0 };
    sign * t.abs().clamp(floor, SLOPE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_into_range() {
        for i in -720..=720 {
            let a = normalize_angle(i as f32 * 0.5);
            assert!((0.0..TAU).contains(&a), "{a} out of range");
        }
        assert_eq!(normalize_angle(-1.0e-9), 0.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        for i in -100..100 {
            let once = normalize_angle(i as f32 * 0.37);
            assert_eq!(normalize_angle(once), once);
        }
    }

    #[test]
    fn negative_ten_degrees_is_three_fifty() {
        let a = normalize_angle(to_radians(-10.0));
        assert!((to_degrees(a) - 350.0).abs() < 1e-3);
    }

    #[test]
    fn guarded_tan_is_finite_on_axes() {
        for a in [0.0, PI / 2.0, PI, 3.0 * PI / 2.0, TAU] {
            let t = guarded_tan(a);
            assert!(t.is_finite());
            assert!(t != 0.0);
            assert!(t.abs() <= SLOPE_LIMIT);
        }
    }
}
