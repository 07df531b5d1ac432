/*
 * Vector Math Module
 *
 * Guarded vector helpers on top of the glam Vec3 that nannou re-exports.
 * Every normalisation in the simulation goes through these helpers so a
 * near-zero vector is replaced by a fixed fallback instead of a NaN.
 *
 * Angles are in degrees throughout, matching the heading fields on Boid.
 */

use nannou::prelude::*;
use std::f32::consts::TAU;

// Squared length at or below which a vector has no usable direction
pub const DEGENERATE_SQ: f32 = 0.001;

pub trait VectorExt: Sized {
    /// True when the squared length is at or below `DEGENERATE_SQ`.
    fn is_degenerate(self) -> bool;

    /// Unit vector, or `fallback` when the vector is degenerate.
    fn safe_normalize_or(self, fallback: Self) -> Self;

    /// Unit vector, or zero when the vector is degenerate.
    fn safe_normalize(self) -> Self;
}

impl VectorExt for Vec3 {
    #[inline]
    fn is_degenerate(self) -> bool {
        self.length_squared() <= DEGENERATE_SQ
    }

    #[inline]
    fn safe_normalize_or(self, fallback: Vec3) -> Vec3 {
        if self.is_degenerate() {
            fallback
        } else {
            self.normalize()
        }
    }

    #[inline]
    fn safe_normalize(self) -> Vec3 {
        self.safe_normalize_or(Vec3::ZERO)
    }
}

/// Direction of any vector with a positive, finite length.
///
/// Unlike `safe_normalize_or` this keeps very short vectors; only a length
/// that is zero (or underflows) falls back.
pub fn direction_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length = v.length();
    if length > 0.0 && length.is_finite() {
        let dir = v / length;
        if dir.is_finite() {
            return dir;
        }
    }
    fallback
}

/// Linear interpolation between two points.
#[inline]
pub fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

/// Per-tick blend factor for exponential smoothing at `rate` per second.
///
/// Frame-rate dependent by construction; clamped so a long tick never
/// overshoots the target.
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

// Wrap into [0, period), also catching the rounding case where
// rem_euclid of a tiny negative value lands exactly on `period`
fn wrap_positive(value: f32, period: f32) -> f32 {
    let wrapped = value.rem_euclid(period);
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    wrap_positive(degrees, 360.0)
}

/// Wrap an animation phase into `[0, 2π)`.
pub fn wrap_phase(phase: f32) -> f32 {
    if (0.0..TAU).contains(&phase) {
        phase
    } else {
        wrap_positive(phase, TAU)
    }
}

/// `yaw - prev_yaw` folded once into `(-180, 180]` so a turn across the
/// 0/360 seam reads as a small turn.
pub fn wrap_yaw_delta(yaw: f32, prev_yaw: f32) -> f32 {
    let diff = yaw - prev_yaw;
    if diff > 180.0 {
        diff - 360.0
    } else if diff <= -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Unit forward vector for a heading, `+Z` at yaw 0 / pitch 0.
pub fn forward_from(yaw: f32, pitch: f32) -> Vec3 {
    let yaw_rad = yaw.to_radians();
    let pitch_rad = pitch.to_radians();
    vec3(
        pitch_rad.cos() * yaw_rad.sin(),
        pitch_rad.sin(),
        pitch_rad.cos() * yaw_rad.cos(),
    )
}

/// Yaw and pitch (degrees) of a velocity, `None` when it is degenerate.
pub fn heading_from(velocity: Vec3) -> Option<(f32, f32)> {
    if velocity.is_degenerate() {
        return None;
    }
    let yaw = velocity.x.atan2(velocity.z).to_degrees();
    let pitch = velocity.normalize().y.clamp(-1.0, 1.0).asin().to_degrees();
    Some((yaw, pitch))
}

/// Rotate a model-space vector by roll (about Z), then pitch (about -X),
/// then yaw (about Y). A model facing `+Z` ends up facing `forward_from`.
pub fn rotate_model(v: Vec3, yaw: f32, pitch: f32, roll: f32) -> Vec3 {
    let (sr, cr) = roll.to_radians().sin_cos();
    let rolled = vec3(v.x * cr - v.y * sr, v.x * sr + v.y * cr, v.z);

    let (sp, cp) = (-pitch).to_radians().sin_cos();
    let pitched = vec3(
        rolled.x,
        rolled.y * cp - rolled.z * sp,
        rolled.y * sp + rolled.z * cp,
    );

    let (sy, cy) = yaw.to_radians().sin_cos();
    vec3(
        pitched.x * cy + pitched.z * sy,
        pitched.y,
        -pitched.x * sy + pitched.z * cy,
    )
}

/// Face normal of a triangle, world up when the triangle is degenerate.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).safe_normalize_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(350.0, 10.0, -20.0)]
    #[case(10.0, 350.0, 20.0)]
    #[case(90.0, 80.0, 10.0)]
    #[case(180.0, 0.0, 180.0)]
    #[case(0.0, 180.0, 180.0)]
    #[case(-179.0, 179.0, 2.0)]
    fn yaw_delta_wraps_across_the_seam(#[case] yaw: f32, #[case] prev: f32, #[case] expected: f32) {
        assert_relative_eq!(wrap_yaw_delta(yaw, prev), expected, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_vectors_use_the_fallback() {
        let tiny = vec3(0.01, 0.0, 0.01);
        assert!(tiny.is_degenerate());
        assert_eq!(tiny.safe_normalize(), Vec3::ZERO);
        assert_eq!(Vec3::ZERO.safe_normalize_or(Vec3::Y), Vec3::Y);

        let unit = vec3(3.0, 0.0, 4.0).safe_normalize();
        assert_relative_eq!(unit.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn direction_keeps_short_vectors() {
        let dir = direction_or(vec3(0.001, 0.0, 0.0), Vec3::Z);
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-6);
        assert_eq!(direction_or(Vec3::ZERO, Vec3::Z), Vec3::Z);
    }

    #[test]
    fn forward_and_heading_agree() {
        assert_relative_eq!(forward_from(0.0, 0.0).z, 1.0, epsilon = 1e-6);

        let forward = forward_from(30.0, -15.0);
        let (yaw, pitch) = heading_from(forward * 5.0).unwrap();
        assert_relative_eq!(yaw, 30.0, epsilon = 1e-3);
        assert_relative_eq!(pitch, -15.0, epsilon = 1e-3);

        assert!(heading_from(Vec3::ZERO).is_none());
    }

    #[test]
    fn model_rotation_matches_forward_vector() {
        let rotated = rotate_model(Vec3::Z, 120.0, 25.0, 40.0);
        let forward = forward_from(120.0, 25.0);
        assert_relative_eq!(rotated.x, forward.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, forward.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, forward.z, epsilon = 1e-5);
    }

    #[test]
    fn phase_and_degrees_stay_in_range() {
        assert_relative_eq!(wrap_phase(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_eq!(wrap_phase(TAU), 0.0);
        assert!(wrap_phase(-1e-7) < TAU);
        assert_relative_eq!(wrap_degrees(-30.0), 330.0, epsilon = 1e-4);
        assert_relative_eq!(wrap_degrees(725.0), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn smoothing_factor_is_clamped() {
        assert_relative_eq!(smoothing_factor(3.0, 0.016), 0.048, epsilon = 1e-6);
        assert_eq!(smoothing_factor(5.0, 1.0), 1.0);
        assert_eq!(smoothing_factor(5.0, 0.0), 0.0);
    }

    #[test]
    fn degenerate_triangle_normal_points_up() {
        let p = vec3(1.0, 2.0, 3.0);
        assert_eq!(triangle_normal(p, p, p), Vec3::Y);
        let n = triangle_normal(Vec3::ZERO, Vec3::X, Vec3::Z);
        assert_relative_eq!(n.y, -1.0, epsilon = 1e-6);
    }
}
