// core/geometry.rs
//
// Table-plane helpers. The simulation plane is (x, z); glam's `DVec2`
// carries it with `.y` standing in for z.

use glam::DVec2;

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Zero out each component whose magnitude is below `epsilon`.
#[inline]
pub fn snap_to_rest(v: DVec2, epsilon: f64) -> DVec2 {
    DVec2::new(
        if v.x.abs() < epsilon { 0.0 } else { v.x },
        if v.y.abs() < epsilon { 0.0 } else { v.y },
    )
}

/// Both components below `epsilon`.
#[inline]
pub fn is_at_rest(v: DVec2, epsilon: f64) -> bool {
    v.x.abs() < epsilon && v.y.abs() < epsilon
}

/// Unit direction for an aim angle. Angle 0 points down +z,
/// positive angles turn toward +x.
#[inline]
pub fn aim_direction(angle: f64) -> DVec2 {
    DVec2::new(angle.sin(), angle.cos())
}

/// Unit vector from `b` to `a` and the distance between them, or `None`
/// when the points coincide (or the distance is not finite).
#[inline]
pub fn separation(a: DVec2, b: DVec2) -> Option<(DVec2, f64)> {
    let delta = a - b;
    let dist = delta.length();
    if dist > 0.0 && dist.is_finite() {
        Some((delta / dist, dist))
    } else {
        None
    }
}
