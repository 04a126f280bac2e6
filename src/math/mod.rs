pub mod bezier;
pub mod bounds;
pub mod intersect_3d;
pub mod line_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Manhattan (L1) distance between two points.
#[must_use]
pub fn manhattan(a: &Point3, b: &Point3) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Returns `v` normalized, or `None` if it is zero-length or not finite.
#[must_use]
pub fn try_unit(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if !len.is_finite() || len < TOLERANCE {
        return None;
    }
    Some(v / len)
}
