use std::f64::consts::PI;

use crate::config::BuildConfig;
use crate::math::{try_unit, Vector3};
use crate::network::AccessoryKind;

/// Largest share of a segment one junction may trim away.
const MAX_TRIM_FRACTION: f64 = 0.45;

/// Half-deflection cap; folding a leg back onto another would otherwise
/// ask for an unbounded trim.
const MAX_HALF_DEFLECTION: f64 = 80.0 * PI / 180.0;

/// A segment end seen from the junction it meets.
#[derive(Debug, Clone)]
pub(super) struct Leg {
    /// Unit direction pointing away from the junction along the segment.
    pub dir: Vector3,
    pub width: f64,
    pub height: f64,
    pub face: Vector3,
    pub length: f64,
}

/// Distance from the junction point to each leg's trim point.
///
/// Only the first [`AccessoryKind::MAX_SHAPED_LEGS`] legs are shaped; any
/// others get zero. A shaped leg is trimmed by the largest bend it forms
/// with another shaped leg, capped so that trims from both ends of a
/// segment never meet.
pub(super) fn trim_distances(legs: &[Leg], config: &BuildConfig) -> Vec<f64> {
    let shaped = legs.len().min(AccessoryKind::MAX_SHAPED_LEGS);
    (0..legs.len())
        .map(|i| {
            if i >= shaped {
                return 0.0;
            }
            let trim = (0..shaped)
                .filter(|&j| j != i)
                .map(|j| bend_trim(&legs[i], &legs[j], config))
                .fold(0.0, f64::max);
            trim.min(legs[i].length * MAX_TRIM_FRACTION)
        })
        .collect()
}

/// Tangent length of the bend curve joining two legs.
///
/// The curve is a quadratic Bezier with the junction as control point and
/// the two trim points as ends. Its tangent length grows with the
/// deflection as `(r + d/2) * tan(deflection / 2)`, where `d` is the
/// dimension the bend sweeps through and `r` the inner radius. Straight
/// runs need no curve at all.
fn bend_trim(a: &Leg, b: &Leg, config: &BuildConfig) -> f64 {
    let cos = a.dir.dot(&b.dir).clamp(-1.0, 1.0);
    let deflection = PI - cos.acos();
    if deflection < config.straight_angle_tolerance {
        return 0.0;
    }
    let dim = governing_dimension(a, b);
    let radius = config.bend_radius_ratio * dim;
    (radius + dim * 0.5) * (deflection * 0.5).min(MAX_HALF_DEFLECTION).tan()
}

/// Width for bends in the tray plane, height for bends out of it.
fn governing_dimension(a: &Leg, b: &Leg) -> f64 {
    let in_plane = match try_unit(&a.dir.cross(&b.dir)) {
        Some(n) => n.dot(&a.face).abs() >= 0.5,
        None => true,
    };
    if in_plane {
        a.width.max(b.width)
    } else {
        a.height.max(b.height)
    }
}
