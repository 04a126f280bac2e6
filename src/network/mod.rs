pub mod accessory;
pub mod input;
pub mod node;
pub mod segment;

pub use accessory::{Accessory, AccessoryKind, AccessoryLeg};
pub use input::{Sleeve, TraySegment};
pub use node::{EndMarker, LaidCable, Node, NodeId, NodeKind};
pub use segment::{Segment, SegmentEnd, SegmentId};

use std::collections::HashMap;

use crate::error::NetworkError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns all segments and nodes of a tray network.
///
/// Entities reference each other via typed IDs (generational indices), so
/// lookups are O(1) and a missing entity is an explicit error rather than
/// an empty search result.
#[derive(Debug, Clone, Default)]
pub struct TrayNetwork {
    segments: SlotMap<SegmentId, Segment>,
    nodes: SlotMap<NodeId, Node>,
    tags: HashMap<String, NodeId>,
    next_tag: u64,
}

impl TrayNetwork {
    /// Creates a new, empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Segment operations ---

    /// Inserts a segment and returns its ID.
    pub fn add_segment(&mut self, data: Segment) -> SegmentId {
        self.segments.insert(data)
    }

    /// Returns a reference to the segment, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the network.
    pub fn segment(&self, id: SegmentId) -> Result<&Segment, NetworkError> {
        self.segments
            .get(id)
            .ok_or_else(|| NetworkError::EntityNotFound(format!("segment {id:?}")))
    }

    /// Returns a mutable reference to the segment, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the network.
    pub fn segment_mut(&mut self, id: SegmentId) -> Result<&mut Segment, NetworkError> {
        self.segments
            .get_mut(id)
            .ok_or_else(|| NetworkError::EntityNotFound(format!("segment {id:?}")))
    }

    /// Iterates over all segments, isolated ones included.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments.iter()
    }

    /// Iterates over segments that share at least one junction.
    pub fn connected_segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments.iter().filter(|(_, s)| !s.isolated)
    }

    /// Iterates over isolated segments.
    pub fn isolated_segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments.iter().filter(|(_, s)| s.isolated)
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    // --- Node operations ---

    /// Inserts a node and returns its ID.
    ///
    /// Nodes without a tag, or whose tag is already taken, receive the next
    /// `N000001`-style tag.
    pub fn add_node(&mut self, mut data: Node) -> NodeId {
        if data.tag.is_empty() || self.tags.contains_key(&data.tag) {
            data.tag = self.next_node_tag();
        }
        let tag = data.tag.clone();
        let id = self.nodes.insert(data);
        self.tags.insert(tag, id);
        id
    }

    fn next_node_tag(&mut self) -> String {
        loop {
            self.next_tag += 1;
            let tag = format!("N{:06}", self.next_tag);
            if !self.tags.contains_key(&tag) {
                return tag;
            }
        }
    }

    /// Returns a reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the network.
    pub fn node(&self, id: NodeId) -> Result<&Node, NetworkError> {
        self.nodes
            .get(id)
            .ok_or_else(|| NetworkError::EntityNotFound(format!("node {id:?}")))
    }

    /// Returns a mutable reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the network.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, NetworkError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| NetworkError::EntityNotFound(format!("node {id:?}")))
    }

    /// Looks a node up by its external tag.
    #[must_use]
    pub fn node_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.tags.get(tag).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Connectivity ---

    /// Connects two nodes in both directions. Returns `true` if the edge is new.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not found.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<bool, NetworkError> {
        if a == b {
            return Ok(false);
        }
        self.node(b)?;
        let added = self.node_mut(a)?.connections.insert(b);
        self.node_mut(b)?.connections.insert(a);
        Ok(added)
    }

    /// Returns `true` if `a` and `b` are neighbours.
    #[must_use]
    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes
            .get(a)
            .is_some_and(|n| n.connections.contains(&b))
    }

    /// Returns the node on `segment` within `radius` of `point`, end nodes
    /// first, creating a mid-span node linked to the segment's end nodes if
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or one of its end nodes is not found.
    pub fn jump_node(
        &mut self,
        segment: SegmentId,
        point: Point3,
        radius: f64,
    ) -> Result<NodeId, NetworkError> {
        let seg = self.segment(segment)?;
        for &id in seg.start_node.iter().chain(&seg.end_node).chain(&seg.jump_nodes) {
            if (self.node(id)?.point - point).norm() <= radius {
                return Ok(id);
            }
        }

        let node = Node::new(point, seg.width, seg.face, NodeKind::Segment)
            .on_segment(segment, EndMarker::MidSpan)
            .with_available_width(seg.available_width)
            .with_route_types(seg.route_types.clone());
        let ends = [seg.start_node, seg.end_node];
        let id = self.add_node(node);
        for end in ends.into_iter().flatten() {
            self.connect(id, end)?;
        }
        self.segment_mut(segment)?.jump_nodes.push(id);
        Ok(id)
    }

    /// Turns this network back into builder inputs, for incremental re-runs.
    #[must_use]
    pub fn to_inputs(&self) -> (Vec<TraySegment>, Vec<Sleeve>) {
        let segments = self
            .segments
            .values()
            .map(|s| TraySegment {
                tag: s.tag.clone(),
                start: s.start,
                end: s.end,
                width: s.width,
                height: s.height,
                face: s.face,
                route_types: s.route_types.clone(),
                revision: s.revision,
            })
            .collect();
        let sleeves = self
            .nodes
            .values()
            .filter(|n| n.kind == NodeKind::Sleeve)
            .map(|n| Sleeve {
                tag: n.tag.clone(),
                point: n.point,
                width: n.width,
                face: n.face,
                route_types: n.route_types.clone(),
            })
            .collect();
        (segments, sleeves)
    }
}
