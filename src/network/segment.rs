use crate::error::GeometryError;
use crate::math::bounds::{Aabb, OrientedBox};
use crate::math::{try_unit, Point3, Vector3};

use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a segment in the tray network.
    pub struct SegmentId;
}

/// One of the two ends of a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentEnd {
    Start,
    End,
}

impl SegmentEnd {
    /// The opposite end.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// A finalized straight tray section.
///
/// `start`/`end` are the centerline endpoints (snapped onto junction points);
/// `start_trim`/`end_trim` are where the section meets its junction
/// accessory, and coincide with the endpoints at open ends.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Identity carried over from the input, suffixed for split children.
    pub tag: String,
    /// Tag of the input segment this one was split from.
    pub parent: Option<String>,
    pub start: Point3,
    pub end: Point3,
    pub start_trim: Point3,
    pub end_trim: Point3,
    pub width: f64,
    pub height: f64,
    /// Unit normal of the tray floor.
    pub face: Vector3,
    /// Route criteria this section may carry. Empty means unrestricted.
    pub route_types: Vec<String>,
    /// Width left for cables.
    pub available_width: f64,
    pub start_node: Option<NodeId>,
    pub end_node: Option<NodeId>,
    /// Mid-span attachments created by jump detection.
    pub jump_nodes: Vec<NodeId>,
    /// Set when neither end shares a junction with another segment.
    pub isolated: bool,
    /// Upstream update ordinal; higher is more recent.
    pub revision: u64,
}

impl Segment {
    /// Centerline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, if the segment is not degenerate.
    #[must_use]
    pub fn direction(&self) -> Option<Vector3> {
        try_unit(&(self.end - self.start))
    }

    /// Centerline point at the given end.
    #[must_use]
    pub fn point(&self, end: SegmentEnd) -> Point3 {
        match end {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    /// Node attached at the given end.
    #[must_use]
    pub fn node(&self, end: SegmentEnd) -> Option<NodeId> {
        match end {
            SegmentEnd::Start => self.start_node,
            SegmentEnd::End => self.end_node,
        }
    }

    /// Both end nodes, when both are assigned.
    #[must_use]
    pub fn end_nodes(&self) -> Option<(NodeId, NodeId)> {
        Some((self.start_node?, self.end_node?))
    }

    /// Returns `true` if this section may carry cables of `criteria`.
    #[must_use]
    pub fn accepts(&self, criteria: &str) -> bool {
        self.route_types.is_empty() || self.route_types.iter().any(|t| t == criteria)
    }

    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_segment(&self.start, &self.end)
    }

    /// Solid volume of the section, used for containment tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is zero-length or its face lies along it.
    pub fn oriented_box(&self) -> Result<OrientedBox, GeometryError> {
        OrientedBox::from_segment(&self.start, &self.end, self.width, self.height, &self.face)
    }
}
