//! Scalar interpolation helpers shared by both animators.

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Hermite smoothstep `t²(3 − 2t)`, input clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Fraction of the remaining distance covered in `dt` by an exponential
/// follow with time constant `tau`. Independent of how `dt` is sliced:
/// two steps of `dt` cover the same distance as one step of `2 * dt`.
#[inline]
pub fn approach_factor(dt: f64, tau: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    if tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt / tau).exp()
}
