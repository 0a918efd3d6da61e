//! Small geometric primitives shared by the query engines.

use nalgebra::{Point3, Vector3};

/// Unit normal of the triangle `(a, b, c)` under counter-clockwise winding.
///
/// Returns `None` for zero-area triangles.
#[inline]
pub fn triangle_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Option<Vector3<f32>> {
    let n = (b - a).cross(&(c - a));
    let len = n.norm();
    if len > 0.0 && len.is_finite() {
        Some(n / len)
    } else {
        None
    }
}

/// Area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> f32 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

/// Distance from `p` to the infinite line through `l1` and `l2`.
///
/// Falls back to the distance to `l1` when the two points coincide.
pub fn dist_to_line(p: &Point3<f32>, l1: &Point3<f32>, l2: &Point3<f32>) -> f32 {
    let dir = l2 - l1;
    let len_sq = dir.norm_squared();
    let rel = p - l1;
    if len_sq == 0.0 {
        return rel.norm();
    }
    (rel - dir * (rel.dot(&dir) / len_sq)).norm()
}

/// Distance from `p` to the segment `[s1, s2]`.
pub fn dist_to_segment(p: &Point3<f32>, s1: &Point3<f32>, s2: &Point3<f32>) -> f32 {
    let dir = s2 - s1;
    let len_sq = dir.norm_squared();
    let rel = p - s1;
    if len_sq == 0.0 {
        return rel.norm();
    }
    let t = (rel.dot(&dir) / len_sq).clamp(0.0, 1.0);
    (rel - dir * t).norm()
}
