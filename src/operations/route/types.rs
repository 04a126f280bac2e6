use std::cmp::Ordering;
use std::fmt;

use crate::math::Point3;
use crate::network::NodeId;

/// Which end of a cable a landing failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Start,
    Goal,
}

impl fmt::Display for RouteEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// How a routing query ended. Only `Err` results are failures; every status
/// here comes with a usable (possibly empty) route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    /// Goal reached through feasible nodes only.
    Complete,
    /// Goal reached, but some nodes on the path lack capacity.
    Degraded,
    /// Goal unreachable; the route ends at the expanded node closest to it.
    Partial,
    /// No eligible landing near the given end; the route is empty.
    NoLanding(RouteEnd),
}

/// Result of routing one cable.
#[derive(Debug, Clone)]
pub struct CableRoute {
    pub cable: String,
    pub status: RouteStatus,
    /// Network nodes traversed, in order. Landing dummies are not included.
    pub node_ids: Vec<NodeId>,
    pub node_tags: Vec<String>,
    /// Full polyline from the cable start to the last reached point.
    pub points: Vec<Point3>,
    /// Manhattan length of `points`.
    pub cost: f64,
    /// Nodes popped from the open set.
    pub expanded: usize,
    pub diagnostic: Option<String>,
}

impl CableRoute {
    pub(crate) fn empty(cable: &str, status: RouteStatus, diagnostic: String) -> Self {
        Self {
            cable: cable.to_owned(),
            status,
            node_ids: Vec::new(),
            node_tags: Vec::new(),
            points: Vec::new(),
            cost: 0.0,
            expanded: 0,
            diagnostic: Some(diagnostic),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == RouteStatus::Complete
    }
}

/// A plain node path found by [`BidirectionalPath`](super::BidirectionalPath).
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
    /// `true` if the frontiers were joined by a jump rather than a shared node.
    pub jumped: bool,
}

/// Min-heap entry keyed by `priority`.
#[derive(Debug, Clone, Copy)]
pub(super) struct OpenEntry<K> {
    pub key: K,
    pub cost: f64,
    pub priority: f64,
}

impl<K> PartialEq for OpenEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for OpenEntry<K> {}

impl<K> Ord for OpenEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour; ties prefer the deeper entry.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| self.cost.total_cmp(&other.cost))
    }
}

impl<K> PartialOrd for OpenEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
