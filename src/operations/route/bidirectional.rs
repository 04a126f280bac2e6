use std::collections::BinaryHeap;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::config::RouteConfig;
use crate::error::Result;
use crate::math::manhattan;
use crate::network::{NodeId, TrayNetwork};

use super::types::{NodePath, OpenEntry};

/// One half of the bidirectional search.
#[derive(Default)]
struct Frontier {
    open: BinaryHeap<OpenEntry<NodeId>>,
    cost: SecondaryMap<NodeId, f64>,
    parent: SecondaryMap<NodeId, NodeId>,
    closed: SecondaryMap<NodeId, ()>,
}

impl Frontier {
    fn seeded(root: NodeId) -> Self {
        let mut frontier = Self::default();
        frontier.cost.insert(root, 0.0);
        frontier.open.push(OpenEntry {
            key: root,
            cost: 0.0,
            priority: 0.0,
        });
        frontier
    }

    fn peek_cost(&self) -> Option<f64> {
        self.open.peek().map(|e| e.priority)
    }

    /// Chain of nodes from the frontier root to `node`.
    fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(&prev) = self.parent.get(current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Width-constrained bidirectional best-first search between two nodes.
///
/// A lighter alternative to [`RouteCable`](super::RouteCable) for plain
/// queries: no landing, spacing or exclusion handling. A node is passable
/// when its available width is at least `min_width`; the endpoints always
/// are. If the frontiers never meet, the closest pair of closed nodes within
/// `jump_distance` of each other is used as the meeting point.
#[derive(Debug, Clone)]
pub struct BidirectionalPath {
    start: NodeId,
    goal: NodeId,
    min_width: f64,
    jump_distance: f64,
    cancel: CancelFlag,
}

impl BidirectionalPath {
    #[must_use]
    pub fn new(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            min_width: 0.0,
            jump_distance: RouteConfig::default().jump_distance,
            cancel: CancelFlag::default(),
        }
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }

    #[must_use]
    pub fn with_jump_distance(mut self, jump_distance: f64) -> Self {
        self.jump_distance = jump_distance;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Searches `network`. Returns `Ok(None)` if no path and no jump exists.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is missing or the search is cancelled.
    pub fn execute(&self, network: &TrayNetwork) -> Result<Option<NodePath>> {
        network.node(self.start)?;
        network.node(self.goal)?;
        if self.start == self.goal {
            return Ok(Some(NodePath {
                nodes: vec![self.start],
                cost: 0.0,
                jumped: false,
            }));
        }

        let mut forward = Frontier::seeded(self.start);
        let mut backward = Frontier::seeded(self.goal);

        loop {
            self.cancel.check()?;
            let expand_forward = match (forward.peek_cost(), backward.peek_cost()) {
                (None, None) => break,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some(f), Some(b)) => f <= b,
            };
            let (this, other) = if expand_forward {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };
            if let Some(meet) = self.step(network, this, other) {
                let cost = forward.cost[meet] + backward.cost[meet];
                debug!(?meet, cost, "bidirectional frontiers met");
                return Ok(Some(Self::join(&forward, &backward, meet, meet, cost, false)));
            }
        }

        Ok(self.jump(network, &forward, &backward))
    }

    /// Expands the cheapest open node of `this`. Returns it if `other` has
    /// already closed it.
    fn step(&self, network: &TrayNetwork, this: &mut Frontier, other: &Frontier) -> Option<NodeId> {
        let entry = this.open.pop()?;
        let current = entry.key;
        if this.closed.contains_key(current) {
            return None;
        }
        this.closed.insert(current, ());
        if other.closed.contains_key(current) {
            return Some(current);
        }

        let node = network.node(current).ok()?;
        for &next in &node.connections {
            if this.closed.contains_key(next) {
                continue;
            }
            let Ok(neighbour) = network.node(next) else {
                continue;
            };
            let endpoint = next == self.start || next == self.goal;
            if !endpoint && neighbour.available_width < self.min_width {
                continue;
            }
            let tentative = entry.cost + manhattan(&node.point, &neighbour.point);
            if this.cost.get(next).is_none_or(|&c| tentative < c) {
                this.cost.insert(next, tentative);
                this.parent.insert(next, current);
                this.open.push(OpenEntry {
                    key: next,
                    cost: tentative,
                    priority: tentative,
                });
            }
        }
        None
    }

    fn jump(&self, network: &TrayNetwork, forward: &Frontier, backward: &Frontier) -> Option<NodePath> {
        let wide = |id: NodeId| {
            network
                .node(id)
                .ok()
                .filter(|n| n.available_width >= self.min_width)
        };
        let mut best: Option<(NodeId, NodeId, f64)> = None;
        for f in forward.closed.keys() {
            let Some(fnode) = wide(f) else { continue };
            for b in backward.closed.keys() {
                let Some(bnode) = wide(b) else { continue };
                if (fnode.point - bnode.point).norm() > self.jump_distance {
                    continue;
                }
                let total = forward.cost[f] + backward.cost[b] + manhattan(&fnode.point, &bnode.point);
                if best.is_none_or(|(_, _, c)| total < c) {
                    best = Some((f, b, total));
                }
            }
        }
        let (f, b, cost) = best?;
        debug!(from = ?f, to = ?b, cost, "bidirectional frontiers joined by jump");
        Some(Self::join(forward, backward, f, b, cost, true))
    }

    fn join(forward: &Frontier, backward: &Frontier, f: NodeId, b: NodeId, cost: f64, jumped: bool) -> NodePath {
        let mut nodes = forward.path_to(f);
        let mut tail = backward.path_to(b);
        if f == b {
            tail.pop();
        }
        tail.reverse();
        nodes.extend(tail);
        NodePath { nodes, cost, jumped }
    }
}
