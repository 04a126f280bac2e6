use crate::math::bezier::quadratic;
use crate::math::{try_unit, Point3};

use super::types::CableRoute;

/// Interior corners sharper than this (radians of deflection) get rounded.
const STRAIGHT_DEFLECTION: f64 = 1e-3;

impl CableRoute {
    /// Polyline of the route with each corner replaced by a quadratic bend.
    ///
    /// A corner is rounded over at most `radius` along each adjoining leg,
    /// and never past half of the shorter leg, so neighbouring bends do not
    /// overlap. Each bend is sampled with `samples` intervals.
    #[must_use]
    pub fn curve_points(&self, radius: f64, samples: usize) -> Vec<Point3> {
        let points = &self.points;
        if points.len() < 3 || radius <= 0.0 {
            return points.clone();
        }

        let mut out = vec![points[0]];
        for w in points.windows(3) {
            let (prev, corner, next) = (&w[0], &w[1], &w[2]);
            let (Some(inbound), Some(outbound)) = (try_unit(&(corner - prev)), try_unit(&(next - corner))) else {
                continue;
            };
            if inbound.angle(&outbound) < STRAIGHT_DEFLECTION {
                out.push(*corner);
                continue;
            }
            let reach = radius
                .min((corner - prev).norm() / 2.0)
                .min((next - corner).norm() / 2.0);
            let entry = corner - inbound * reach;
            let exit = corner + outbound * reach;
            out.extend(quadratic(&entry, corner, &exit, samples));
        }
        if let Some(last) = points.last() {
            out.push(*last);
        }
        out.dedup_by(|a, b| (*a - *b).norm() < 1e-9);
        out
    }
}
