/// Linear interpolation from `a` toward `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `value / extent` from [0, 1] to [-1, 1]
///
/// Returns `None` for a zero or negative extent so callers can keep their
/// previous value instead of propagating NaN or infinity.
#[inline]
pub fn to_signed_unit(value: f32, extent: f32) -> Option<f32> {
    if extent <= 0.0 || !extent.is_finite() {
        return None;
    }
    Some(((value / extent) * 2.0 - 1.0).clamp(-1.0, 1.0))
}
