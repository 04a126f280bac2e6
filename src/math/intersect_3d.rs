use super::line_3d::{colinear, inside_segment, project_length};
use super::{try_unit, Point3, TOLERANCE};

/// How two segment supporting lines relate in space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// Parallel and on the same line.
    Colinear,
    /// Non-parallel and in a common plane; the lines cross at one point.
    Coplanar,
    /// Neither parallel nor coplanar; the lines pass each other.
    Skew,
}

/// Tolerances used by [`intersect`].
#[derive(Debug, Clone, Copy)]
pub struct IntersectTolerance {
    /// Sine of the angle below which two directions count as parallel.
    pub parallel: f64,
    /// Line-to-line distance below which non-parallel lines count as coplanar.
    pub coplanar: f64,
    /// Point-to-line distance below which parallel lines count as colinear.
    pub colinear: f64,
    /// Allowed overshoot past segment endpoints when validating a candidate.
    pub end_margin: f64,
}

impl Default for IntersectTolerance {
    fn default() -> Self {
        Self {
            parallel: 1e-4,
            coplanar: 1e-6,
            colinear: 0.01,
            end_margin: 0.0,
        }
    }
}

/// A candidate point pair between two segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentIntersection {
    /// Relationship of the supporting lines.
    pub kind: IntersectionKind,
    /// Candidate point on the first segment's line.
    pub on_first: Point3,
    /// Candidate point on the second segment's line.
    pub on_second: Point3,
    /// Distance of `on_first` from the first segment's start, along it.
    pub s_first: f64,
    /// Distance of `on_second` from the second segment's start, along it.
    pub s_second: f64,
    /// Distance between the two candidate points.
    pub separation: f64,
    /// Length shared by colinear segments (negative means a gap). Zero for
    /// other kinds.
    pub overlap: f64,
    /// Whether both candidate points fall inside their segments, with the
    /// configured end margin.
    pub inside: bool,
}

/// Intersects segment `a0→a1` with segment `b0→b1`.
///
/// Three cases are handled:
/// - colinear: the candidate pair is the middle of the shared span, or the
///   two facing endpoints when there is a gap (`inside` only if the gap does
///   not exceed the end margin);
/// - coplanar, non-parallel: the crossing point, found by similar triangles
///   on the perpendicular projections of `b0` and `b1` onto the first line;
/// - skew: the closest-approach points of the two lines.
///
/// Returns `None` for degenerate segments and for parallel lines that are
/// not colinear.
#[must_use]
pub fn intersect(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
    tol: &IntersectTolerance,
) -> Option<SegmentIntersection> {
    let u = try_unit(&(a1 - a0))?;
    let v = try_unit(&(b1 - b0))?;
    let la = (a1 - a0).norm();
    let lb = (b1 - b0).norm();
    let margin = tol.end_margin;

    let normal = u.cross(&v);
    if normal.norm() < tol.parallel {
        if !colinear(a0, a1, b0, b1, tol.parallel, tol.colinear) {
            return None;
        }
        return Some(colinear_candidate(a0, a1, b0, b1, margin));
    }

    let n = normal.normalize();
    let line_gap = (b0 - a0).dot(&n).abs();

    if line_gap < tol.coplanar {
        // In-plane perpendicular to the first line.
        let m = n.cross(&u);
        let hc = (b0 - a0).dot(&m);
        let hd = (b1 - a0).dot(&m);
        let denom = hc - hd;
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = hc / denom;
        let point = b0 + (b1 - b0) * t;
        let s_first = project_length(&point, a0, a1);
        return Some(SegmentIntersection {
            kind: IntersectionKind::Coplanar,
            on_first: point,
            on_second: point,
            s_first,
            s_second: t * lb,
            separation: 0.0,
            overlap: 0.0,
            inside: inside_segment(&point, a0, a1, margin)
                && inside_segment(&point, b0, b1, margin),
        });
    }

    // Closest approach of two skew lines: solve the 2x2 normal equations.
    let w0 = a0 - b0;
    let b = u.dot(&v);
    let d = u.dot(&w0);
    let e = v.dot(&w0);
    let denom = 1.0 - b * b;
    if denom.abs() < TOLERANCE {
        return None;
    }
    let s_first = (b * e - d) / denom;
    let s_second = (e - b * d) / denom;
    let on_first = a0 + u * s_first;
    let on_second = b0 + v * s_second;

    Some(SegmentIntersection {
        kind: IntersectionKind::Skew,
        on_first,
        on_second,
        s_first,
        s_second,
        separation: (on_first - on_second).norm(),
        overlap: 0.0,
        inside: s_first >= -margin
            && s_first <= la + margin
            && s_second >= -margin
            && s_second <= lb + margin,
    })
}

fn colinear_candidate(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
    margin: f64,
) -> SegmentIntersection {
    let la = (a1 - a0).norm();
    let dir = (a1 - a0) / la;
    let s0 = project_length(b0, a0, a1);
    let s1 = project_length(b1, a0, a1);
    let (b_min, b_max) = (s0.min(s1), s0.max(s1));

    let lo = b_min.max(0.0);
    let hi = b_max.min(la);
    let overlap = hi - lo;

    let (s_first, s_on_b) = if overlap >= 0.0 {
        let mid = (lo + hi) * 0.5;
        (mid, mid)
    } else if b_min > la {
        (la, b_min)
    } else {
        (0.0, b_max)
    };

    let on_first = a0 + dir * s_first;
    let on_second = a0 + dir * s_on_b;
    SegmentIntersection {
        kind: IntersectionKind::Colinear,
        on_first,
        on_second,
        s_first,
        s_second: project_length(&on_second, b0, b1),
        separation: (on_first - on_second).norm(),
        overlap,
        inside: overlap >= -margin,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tol(end_margin: f64) -> IntersectTolerance {
        IntersectTolerance {
            end_margin,
            ..IntersectTolerance::default()
        }
    }

    // ── coplanar ──

    #[test]
    fn coplanar_cross_in_the_middle() {
        let hit = intersect(
            &p(0.0, 0.0, 0.0),
            &p(4.0, 0.0, 0.0),
            &p(1.0, -2.0, 0.0),
            &p(1.0, 2.0, 0.0),
            &tol(0.0),
        )
        .unwrap();
        assert_eq!(hit.kind, IntersectionKind::Coplanar);
        assert!(hit.inside);
        assert_relative_eq!(hit.on_first.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.s_first, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.s_second, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn coplanar_tilted_plane() {
        // Both segments lie in the plane z = y.
        let hit = intersect(
            &p(0.0, 1.0, 1.0),
            &p(4.0, 1.0, 1.0),
            &p(2.0, 0.0, 0.0),
            &p(2.0, 3.0, 3.0),
            &tol(0.0),
        )
        .unwrap();
        assert_eq!(hit.kind, IntersectionKind::Coplanar);
        assert_relative_eq!((hit.on_first - p(2.0, 1.0, 1.0)).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn coplanar_overshoot_respects_margin() {
        // Second segment stops 0.003 short of the first.
        let a0 = p(0.0, 0.0, 0.0);
        let a1 = p(4.0, 0.0, 0.0);
        let b0 = p(2.0, 0.003, 0.0);
        let b1 = p(2.0, 3.0, 0.0);
        assert!(intersect(&a0, &a1, &b0, &b1, &tol(0.004)).unwrap().inside);
        assert!(!intersect(&a0, &a1, &b0, &b1, &tol(0.0)).unwrap().inside);
    }

    // ── skew ──

    #[test]
    fn skew_closest_approach() {
        let hit = intersect(
            &p(0.0, 0.0, 0.0),
            &p(4.0, 0.0, 0.0),
            &p(2.0, -1.0, 0.3),
            &p(2.0, 1.0, 0.3),
            &tol(0.0),
        )
        .unwrap();
        assert_eq!(hit.kind, IntersectionKind::Skew);
        assert!(hit.inside);
        assert_relative_eq!(hit.separation, 0.3, epsilon = 1e-12);
        assert_relative_eq!((hit.on_first - p(2.0, 0.0, 0.0)).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!((hit.on_second - p(2.0, 0.0, 0.3)).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn skew_outside_segments() {
        let hit = intersect(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(3.0, -1.0, 0.3),
            &p(3.0, 1.0, 0.3),
            &tol(0.0),
        )
        .unwrap();
        assert!(!hit.inside);
    }

    // ── colinear ──

    #[test]
    fn colinear_overlap() {
        let hit = intersect(
            &p(0.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
            &p(2.0, 0.0, 0.0),
            &p(5.0, 0.0, 0.0),
            &tol(0.0),
        )
        .unwrap();
        assert_eq!(hit.kind, IntersectionKind::Colinear);
        assert!(hit.inside);
        assert_relative_eq!(hit.overlap, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.on_first.x, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn colinear_gap_uses_facing_endpoints() {
        let hit = intersect(
            &p(0.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
            &p(5.0, 0.0, 0.0),
            &p(3.5, 0.0, 0.0),
            &tol(0.1),
        )
        .unwrap();
        assert!(!hit.inside);
        assert_relative_eq!(hit.overlap, -0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.on_first.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(hit.on_second.x, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn offset_parallel_is_none() {
        assert!(intersect(
            &p(0.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(3.0, 1.0, 0.0),
            &tol(0.0),
        )
        .is_none());
    }

    #[test]
    fn degenerate_segment_is_none() {
        assert!(intersect(
            &p(0.0, 0.0, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(3.0, 1.0, 0.0),
            &tol(0.0),
        )
        .is_none());
    }
}
