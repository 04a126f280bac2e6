use crate::math::{bezier, Point3, Vector3};

use super::node::NodeId;
use super::segment::SegmentId;

/// Junction shape derived from the number of converging segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessoryKind {
    Bend,
    Tee,
    Cross,
}

impl AccessoryKind {
    /// Maximum number of legs that receive full shape geometry.
    pub const MAX_SHAPED_LEGS: usize = 4;

    /// Junction shape for `connections` segment ends meeting at one point.
    ///
    /// A single connection is an open end and has no accessory.
    #[must_use]
    pub fn from_connections(connections: usize) -> Option<Self> {
        match connections {
            0 | 1 => None,
            2 => Some(Self::Bend),
            3 => Some(Self::Tee),
            _ => Some(Self::Cross),
        }
    }
}

/// One leg of a junction accessory.
#[derive(Debug, Clone)]
pub struct AccessoryLeg {
    pub segment: SegmentId,
    pub node: NodeId,
    /// Where the accessory meets the segment.
    pub trim_point: Point3,
    pub width: f64,
    pub height: f64,
    pub face: Vector3,
    /// Whether this leg is part of the accessory shape. Legs past the
    /// fourth of a cross still get nodes, but no shape.
    pub shaped: bool,
}

/// A derived Bend/Tee/Cross at a junction point.
#[derive(Debug, Clone)]
pub struct Accessory {
    pub kind: AccessoryKind,
    pub junction: Point3,
    pub legs: Vec<AccessoryLeg>,
}

impl Accessory {
    /// Distinct node ids of the legs, in leg order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            if !ids.contains(&leg.node) {
                ids.push(leg.node);
            }
        }
        ids
    }

    /// Centerline of the first two legs as a quadratic Bezier through the
    /// junction, sampled with `samples` intervals.
    #[must_use]
    pub fn curve(&self, samples: usize) -> Vec<Point3> {
        match (self.legs.first(), self.legs.get(1)) {
            (Some(a), Some(b)) => bezier::quadratic(&a.trim_point, &self.junction, &b.trim_point, samples),
            _ => Vec::new(),
        }
    }
}
