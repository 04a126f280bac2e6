use serde::{Deserialize, Serialize};

use crate::math::intersect_3d::IntersectTolerance;

/// Tolerances and physical margins for [`BuildNetwork`](crate::operations::build::BuildNetwork).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Segments shorter than this are dropped.
    pub min_segment_length: f64,
    /// Bounding boxes farther apart than this are never compared for overlap.
    pub overlap_gap: f64,
    /// Sine of the angle below which two directions count as parallel.
    pub parallel_tolerance: f64,
    /// Point-to-line distance below which parallel segments count as colinear.
    pub colinear_tolerance: f64,
    /// Overshoot allowed past an endpoint when looking for crossings.
    pub joint_overshoot: f64,
    /// A crossing closer than this to a segment's own endpoint does not split it.
    pub joint_end_clearance: f64,
    /// Endpoints closer than this collapse into one junction point.
    pub merge_radius: f64,
    /// Deflection (radians) below which a junction is treated as straight.
    pub straight_angle_tolerance: f64,
    /// Inner bend radius as a multiple of the governing leg dimension.
    pub bend_radius_ratio: f64,
    /// Width held back on each side of a tray.
    pub edge_margin: f64,
    /// Fraction of the usable width reserved as spare.
    pub spare_ratio: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 0.1,
            overlap_gap: 0.01,
            parallel_tolerance: 1e-4,
            colinear_tolerance: 0.01,
            joint_overshoot: 0.004,
            joint_end_clearance: 0.09,
            merge_radius: 0.05,
            straight_angle_tolerance: 1e-3,
            bend_radius_ratio: 1.0,
            edge_margin: 0.025,
            spare_ratio: 0.0,
        }
    }
}

impl BuildConfig {
    /// Width available to cables on a tray of physical `width`.
    ///
    /// Never exceeds `width - 2 * edge_margin` and never drops below zero.
    #[must_use]
    pub fn available_width(&self, width: f64) -> f64 {
        let usable = (width - 2.0 * self.edge_margin).max(0.0);
        usable * (1.0 - self.spare_ratio.clamp(0.0, 1.0))
    }

    /// Intersection tolerances for the given end margin.
    #[must_use]
    pub fn intersect_tolerance(&self, end_margin: f64) -> IntersectTolerance {
        IntersectTolerance {
            parallel: self.parallel_tolerance,
            colinear: self.colinear_tolerance,
            end_margin,
            ..IntersectTolerance::default()
        }
    }
}

/// Settings for [`AugmentJumps`](crate::operations::jump::AugmentJumps).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Segment bounding boxes farther apart than this are never paired.
    pub proximity: f64,
    /// Lower bound (exclusive) of the crossing gap that earns a jump.
    pub min_gap: f64,
    /// Upper bound (exclusive) of the crossing gap that earns a jump.
    pub max_gap: f64,
    /// Jump nodes on the same segment closer than this are reused.
    pub dedupe_radius: f64,
    /// Radius within which dead ends are linked to nearby nodes.
    pub dead_end_radius: f64,
    /// Contained nodes closer than this to a segment end are left to
    /// dead-end reconciliation.
    pub containment_clearance: f64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            proximity: 1.0,
            min_gap: 0.1,
            max_gap: 0.6,
            dedupe_radius: 0.01,
            dead_end_radius: 1.0,
            containment_clearance: 0.05,
        }
    }
}

/// Settings for cable routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Maximum landing candidates considered at each end of a route.
    pub landing_candidates: usize,
    /// Search radius for sleeve landings.
    pub sleeve_radius: f64,
    /// Search radius for landing on a segment.
    pub segment_radius: f64,
    /// Heuristic given to nodes that cannot carry the cable.
    pub infeasible_penalty: f64,
    /// Largest gap bridged when the bidirectional frontiers never meet.
    pub jump_distance: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            landing_candidates: 5,
            sleeve_radius: 5.0,
            segment_radius: 10.0,
            infeasible_penalty: 1e9,
            jump_distance: 1.0,
        }
    }
}
