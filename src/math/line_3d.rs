use super::{try_unit, Point3, Vector3, TOLERANCE};

/// Returns `true` if the directions of `a→b` and `c→d` are parallel.
///
/// The test compares the magnitude of the cross product of the two unit
/// directions (the sine of the angle between them) against `tol`.
/// Degenerate (zero-length) inputs are treated as parallel.
#[must_use]
pub fn parallel(a: &Point3, b: &Point3, c: &Point3, d: &Point3, tol: f64) -> bool {
    match (try_unit(&(b - a)), try_unit(&(d - c))) {
        (Some(u), Some(v)) => u.cross(&v).norm() < tol,
        _ => true,
    }
}

/// Returns `true` if `a→b` and `c→d` are parallel and lie on the same line.
#[must_use]
pub fn colinear(
    a: &Point3,
    b: &Point3,
    c: &Point3,
    d: &Point3,
    parallel_tol: f64,
    distance_tol: f64,
) -> bool {
    parallel(a, b, c, d, parallel_tol)
        && distance_to_line(c, a, b) < distance_tol
        && distance_to_line(d, a, b) < distance_tol
}

/// Squared distance from `p` to the infinite line through `a` and `b`.
///
/// Cheap enough for rejection tests; falls back to point distance when the
/// line is degenerate.
#[must_use]
pub fn distance_to_line_sq(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let ap = p - a;
    if len_sq < TOLERANCE * TOLERANCE {
        return ap.norm_squared();
    }
    ap.cross(&ab).norm_squared() / len_sq
}

/// Distance from `p` to the infinite line through `a` and `b`.
#[must_use]
pub fn distance_to_line(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    distance_to_line_sq(p, a, b).sqrt()
}

/// Signed distance of the projection of `p` along `a→b`, measured from `a`.
#[must_use]
pub fn project_length(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    match try_unit(&(b - a)) {
        Some(dir) => (p - a).dot(&dir),
        None => 0.0,
    }
}

/// Closest point to `p` on the segment `a→b`, clamped to the endpoints.
#[must_use]
pub fn closest_point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> Point3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Returns `true` if `p` projects onto segment `a→b` within `margin` of
/// the segment's extent.
///
/// A positive margin tolerates overshoot past either endpoint; a negative
/// margin demands the projection stay that far inside both endpoints.
#[must_use]
pub fn inside_segment(p: &Point3, a: &Point3, b: &Point3, margin: f64) -> bool {
    let len = (b - a).norm();
    let s = project_length(p, a, b);
    s >= -margin && s <= len + margin
}

/// Returns `true` if the four points lie in a common plane.
#[must_use]
pub fn coplanar(a: &Point3, b: &Point3, c: &Point3, d: &Point3, tol: f64) -> bool {
    let n: Vector3 = (b - a).cross(&(d - c));
    match try_unit(&n) {
        Some(n) => (c - a).dot(&n).abs() < tol,
        // Parallel directions always share a plane.
        None => true,
    }
}
