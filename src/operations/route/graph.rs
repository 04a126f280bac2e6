use std::collections::HashMap;

use crate::math::{manhattan, Point3};
use crate::network::{NodeId, TrayNetwork};

use super::cable::Cable;
use super::spacing::SpacingTable;

/// One vertex of a per-query search graph.
#[derive(Debug, Clone)]
pub(super) struct SearchNode {
    pub point: Point3,
    /// `None` for landing dummies and the synthetic start/goal.
    pub id: Option<NodeId>,
    pub tag: String,
    /// Available width and spacing allow this cable through.
    pub feasible: bool,
    /// Carries a cable this one excludes; never entered.
    pub excluded: bool,
}

/// Owned, index-addressed snapshot of a network for one cable.
///
/// Landing dummies and the synthetic endpoints are added here, never to the
/// network itself, so concurrent queries against one network do not interfere.
#[derive(Debug, Clone, Default)]
pub(super) struct SearchGraph {
    pub nodes: Vec<SearchNode>,
    pub adjacency: Vec<Vec<usize>>,
    index: HashMap<NodeId, usize>,
}

impl SearchGraph {
    pub fn from_network(network: &TrayNetwork, cable: &Cable, spacing: &SpacingTable) -> Self {
        let mut graph = Self::default();
        for (id, node) in network.nodes() {
            let required = cable.outer_diameter + spacing.gap_to_laid(cable, node.last_cable.as_ref());
            let index = graph.push(SearchNode {
                point: node.point,
                id: Some(id),
                tag: node.tag.clone(),
                feasible: node.accepts(&cable.route_criteria) && node.available_width >= required,
                excluded: cable.avoids(node),
            });
            graph.index.insert(id, index);
        }
        for (id, node) in network.nodes() {
            let Some(&from) = graph.index.get(&id) else {
                continue;
            };
            graph.adjacency[from] = node
                .connections
                .iter()
                .filter_map(|c| graph.index.get(c).copied())
                .collect();
        }
        graph
    }

    fn push(&mut self, node: SearchNode) -> usize {
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        self.nodes.len() - 1
    }

    /// Adds a node that exists only for this query.
    pub fn add_virtual(&mut self, point: Point3, tag: String) -> usize {
        self.push(SearchNode {
            point,
            id: None,
            tag,
            feasible: true,
            excluded: false,
        })
    }

    /// Links two vertices in both directions, ignoring duplicates.
    pub fn link(&mut self, a: usize, b: usize) {
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn cost(&self, a: usize, b: usize) -> f64 {
        manhattan(&self.nodes[a].point, &self.nodes[b].point)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::network::{LaidCable, Node, NodeKind};
    use crate::operations::route::GapSpec;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn network_with(available: f64, last: Option<LaidCable>) -> (TrayNetwork, NodeId, NodeId) {
        let mut net = TrayNetwork::new();
        let mut a = Node::new(p(0.0, 0.0, 0.0), 0.3, Vector3::z(), NodeKind::Segment)
            .with_available_width(available);
        a.last_cable = last;
        let a = net.add_node(a);
        let b = net.add_node(Node::new(p(1.0, 0.0, 0.0), 0.3, Vector3::z(), NodeKind::Segment));
        net.connect(a, b).unwrap();
        (net, a, b)
    }

    fn cable() -> Cable {
        Cable::new("C1", 0.05, "LV", p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0))
    }

    #[test]
    fn snapshot_mirrors_connectivity() {
        let (net, a, b) = network_with(0.25, None);
        let graph = SearchGraph::from_network(&net, &cable(), &SpacingTable::new());
        let (ia, ib) = (graph.index_of(a).unwrap(), graph.index_of(b).unwrap());
        assert_eq!(graph.adjacency[ia], vec![ib]);
        assert_eq!(graph.adjacency[ib], vec![ia]);
        assert!((graph.cost(ia, ib) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn narrow_node_is_infeasible() {
        let (net, a, _) = network_with(0.03, None);
        let graph = SearchGraph::from_network(&net, &cable(), &SpacingTable::new());
        assert!(!graph.nodes[graph.index_of(a).unwrap()].feasible);
    }

    #[test]
    fn exact_fit_is_feasible() {
        let (net, a, _) = network_with(0.05, None);
        let graph = SearchGraph::from_network(&net, &cable(), &SpacingTable::new());
        assert!(graph.nodes[graph.index_of(a).unwrap()].feasible);
    }

    #[test]
    fn spacing_against_last_cable_counts() {
        let laid = LaidCable {
            tag: "C0".into(),
            criteria: "HV".into(),
            diameter: 0.04,
        };
        let (net, a, _) = network_with(0.12, Some(laid));
        let mut spacing = SpacingTable::new();
        spacing.insert("LV", "HV", GapSpec::DiameterMultiple(2.0));

        let graph = SearchGraph::from_network(&net, &cable(), &spacing);
        assert!(!graph.nodes[graph.index_of(a).unwrap()].feasible, "0.05 + 2 x 0.05 > 0.12");

        let associated = cable().with_associated(["C0"]);
        let graph = SearchGraph::from_network(&net, &associated, &spacing);
        assert!(graph.nodes[graph.index_of(a).unwrap()].feasible);
    }

    #[test]
    fn nodes_carrying_excluded_cables_are_marked() {
        let (mut net, a, b) = network_with(0.25, None);
        net.node_mut(a).unwrap().laid_cables.push("C0".into());
        let graph = SearchGraph::from_network(&net, &cable().with_excluded(["C0"]), &SpacingTable::new());
        assert!(graph.nodes[graph.index_of(a).unwrap()].excluded);
        assert!(!graph.nodes[graph.index_of(b).unwrap()].excluded);

        let graph = SearchGraph::from_network(&net, &cable(), &SpacingTable::new());
        assert!(!graph.nodes[graph.index_of(a).unwrap()].excluded);
    }

    #[test]
    fn virtual_links_are_symmetric_and_unique() {
        let (net, a, _) = network_with(0.25, None);
        let mut graph = SearchGraph::from_network(&net, &cable(), &SpacingTable::new());
        let ia = graph.index_of(a).unwrap();
        let v = graph.add_virtual(p(0.0, 1.0, 0.0), "start".into());
        graph.link(v, ia);
        graph.link(ia, v);
        assert_eq!(graph.adjacency[v], vec![ia]);
        assert_eq!(graph.adjacency[ia].iter().filter(|&&i| i == v).count(), 1);
    }
}
