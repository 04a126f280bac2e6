use super::{try_unit, Point3, Vector3};
use crate::error::GeometryError;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Bounding box of the segment `a→b`.
    #[must_use]
    pub fn from_segment(a: &Point3, b: &Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Returns the box grown by `pad` on every side.
    #[must_use]
    pub fn expanded(&self, pad: f64) -> Self {
        let d = Vector3::new(pad, pad, pad);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Returns `true` if the two boxes touch or overlap.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns `true` if the boxes are no farther apart than `gap` on every axis.
    #[must_use]
    pub fn within(&self, other: &Aabb, gap: f64) -> bool {
        self.expanded(gap).intersects(other)
    }
}

/// The solid volume of a straight tray section, in its own frame.
///
/// Local axes: `x` runs along the segment, `z` along its face, `y` across
/// its width. The box spans `[0, length]` along `x` and is centered on the
/// segment line across `y` and `z`.
#[derive(Debug, Clone, Copy)]
pub struct OrientedBox {
    origin: Point3,
    x: Vector3,
    y: Vector3,
    z: Vector3,
    length: f64,
    half_width: f64,
    half_height: f64,
}

impl OrientedBox {
    /// Builds the box of a segment.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero-length segment and
    /// [`GeometryError::Degenerate`] when the face is parallel to it.
    pub fn from_segment(
        start: &Point3,
        end: &Point3,
        width: f64,
        height: f64,
        face: &Vector3,
    ) -> Result<Self, GeometryError> {
        let x = try_unit(&(end - start)).ok_or(GeometryError::ZeroVector)?;
        // Remove any along-segment component of the face before building the frame.
        let z = try_unit(&(face - x * face.dot(&x)))
            .ok_or_else(|| GeometryError::Degenerate("face parallel to segment".into()))?;
        let y = z.cross(&x);
        Ok(Self {
            origin: *start,
            x,
            y,
            z,
            length: (end - start).norm(),
            half_width: width * 0.5,
            half_height: height * 0.5,
        })
    }

    /// Local coordinates of `p`.
    #[must_use]
    pub fn local(&self, p: &Point3) -> Vector3 {
        let d = p - self.origin;
        Vector3::new(d.dot(&self.x), d.dot(&self.y), d.dot(&self.z))
    }

    /// Returns the distance of `p` along the segment if `p` lies strictly
    /// inside the box and at least `end_clearance` away from both ends.
    #[must_use]
    pub fn contains_strict(&self, p: &Point3, end_clearance: f64) -> Option<f64> {
        let l = self.local(p);
        let inside = l.x > end_clearance
            && l.x < self.length - end_clearance
            && l.y.abs() < self.half_width
            && l.z.abs() < self.half_height;
        inside.then_some(l.x)
    }

    /// The point on the segment line at distance `s` from the start.
    #[must_use]
    pub fn point_at(&self, s: f64) -> Point3 {
        self.origin + self.x * s
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn aabb_within_gap() {
        let a = Aabb::from_segment(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0));
        let b = Aabb::from_segment(&p(1.05, 0.0, 0.0), &p(2.0, 0.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(a.within(&b, 0.1));
        assert!(!a.within(&b, 0.01));
    }

    #[test]
    fn oriented_box_contains_interior_point() {
        let obb = OrientedBox::from_segment(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            0.6,
            0.1,
            &Vector3::z(),
        )
        .unwrap();
        let s = obb.contains_strict(&p(4.0, 0.2, 0.0), 0.05).unwrap();
        assert!((s - 4.0).abs() < 1e-12);
        assert!(obb.contains_strict(&p(4.0, 0.4, 0.0), 0.05).is_none());
        assert!(obb.contains_strict(&p(4.0, 0.0, 0.2), 0.05).is_none());
        assert!(obb.contains_strict(&p(0.01, 0.0, 0.0), 0.05).is_none());
    }

    #[test]
    fn oriented_box_rejects_face_along_segment() {
        assert!(OrientedBox::from_segment(
            &p(0.0, 0.0, 0.0),
            &p(0.0, 0.0, 3.0),
            0.3,
            0.1,
            &Vector3::z(),
        )
        .is_err());
    }
}
