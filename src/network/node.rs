use std::collections::BTreeSet;

use crate::math::{Point3, Vector3};

use super::segment::{SegmentEnd, SegmentId};

slotmap::new_key_type! {
    /// Unique identifier for a node in the tray network.
    pub struct NodeId;
}

/// What a node was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Owned by a segment, at an end or mid-span.
    Segment,
    /// A wall/floor penetration where cables enter or leave the network.
    Sleeve,
}

/// Where on its owning segment a node sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMarker {
    Start,
    End,
    MidSpan,
}

impl EndMarker {
    /// Numeric marker used by downstream consumers: 1, 2 or 9.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Start => 1,
            Self::End => 2,
            Self::MidSpan => 9,
        }
    }
}

impl From<SegmentEnd> for EndMarker {
    fn from(end: SegmentEnd) -> Self {
        match end {
            SegmentEnd::Start => Self::Start,
            SegmentEnd::End => Self::End,
        }
    }
}

/// The most recent cable laid through a node.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidCable {
    pub tag: String,
    pub criteria: String,
    pub diameter: f64,
}

/// Data associated with a graph vertex.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable external handle, `N000001` style.
    pub tag: String,
    pub point: Point3,
    pub width: f64,
    pub face: Vector3,
    pub kind: NodeKind,
    pub segment: Option<SegmentId>,
    pub end: Option<EndMarker>,
    /// Width left for cables after margins and laid cables.
    pub available_width: f64,
    /// Route criteria this node may carry. Empty means unrestricted.
    pub route_types: Vec<String>,
    /// Neighbours. Kept symmetric by [`TrayNetwork::connect`](super::TrayNetwork::connect).
    pub connections: BTreeSet<NodeId>,
    pub last_cable: Option<LaidCable>,
    /// Tags of every cable laid through this node, oldest first.
    pub laid_cables: Vec<String>,
}

impl Node {
    /// Creates an unconnected node; the tag is assigned on insertion.
    ///
    /// Available width starts at the full physical `width`, which is only an
    /// upper bound. Nodes standing for real trays should get their
    /// margin-reduced width from
    /// [`BuildConfig::available_width`](crate::config::BuildConfig::available_width)
    /// through [`with_available_width`](Self::with_available_width).
    #[must_use]
    pub fn new(point: Point3, width: f64, face: Vector3, kind: NodeKind) -> Self {
        Self {
            tag: String::new(),
            point,
            width,
            face,
            kind,
            segment: None,
            end: None,
            available_width: width,
            route_types: Vec::new(),
            connections: BTreeSet::new(),
            last_cable: None,
            laid_cables: Vec::new(),
        }
    }

    /// Attaches the node to a segment end.
    #[must_use]
    pub fn on_segment(mut self, segment: SegmentId, end: EndMarker) -> Self {
        self.segment = Some(segment);
        self.end = Some(end);
        self
    }

    /// Sets the width left for cables, clamped to `0..=width`.
    #[must_use]
    pub fn with_available_width(mut self, available_width: f64) -> Self {
        self.available_width = available_width.clamp(0.0, self.width.max(0.0));
        self
    }

    #[must_use]
    pub fn with_route_types(mut self, route_types: Vec<String>) -> Self {
        self.route_types = route_types;
        self
    }

    /// Returns `true` if this node may carry cables of `criteria`.
    #[must_use]
    pub fn accepts(&self, criteria: &str) -> bool {
        self.route_types.is_empty() || self.route_types.iter().any(|t| t == criteria)
    }

    /// Number of neighbours.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if any of `tags` has been laid through this node.
    #[must_use]
    pub fn carries_any(&self, tags: &[String]) -> bool {
        self.laid_cables.iter().any(|laid| tags.contains(laid))
    }
}
