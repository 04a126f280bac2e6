use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{Result, RoutingError};
use crate::network::{LaidCable, SegmentId, TrayNetwork};

use super::cable::Cable;
use super::spacing::SpacingTable;
use super::types::CableRoute;

impl TrayNetwork {
    /// Consumes capacity along a completed route.
    ///
    /// Every traversed node loses the cable diameter plus the gap required
    /// against the cable laid there before, and records this cable as its
    /// most recent one and among the cables it carries. Each traversed segment is reduced once by the largest
    /// amount taken from any of its nodes. Returns the number of nodes updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the route is not [`Complete`](super::RouteStatus::Complete).
    /// Nodes that no longer exist are logged and skipped.
    pub fn commit_route(&mut self, route: &CableRoute, cable: &Cable, spacing: &SpacingTable) -> Result<usize> {
        if !route.is_complete() {
            return Err(RoutingError::IncompleteRoute(route.cable.clone()).into());
        }

        let mut updated = 0;
        let mut taken: Vec<(SegmentId, f64)> = Vec::new();
        let mut seen = BTreeSet::new();
        for &id in &route.node_ids {
            if !seen.insert(id) {
                continue;
            }
            let Ok(node) = self.node_mut(id) else {
                warn!(?id, cable = %cable.tag, "routed node missing; skipped");
                continue;
            };
            let gap = spacing.gap_to_laid(cable, node.last_cable.as_ref());
            let used = cable.outer_diameter + gap;
            node.available_width = (node.available_width - used).max(0.0);
            node.last_cable = Some(LaidCable {
                tag: cable.tag.clone(),
                criteria: cable.route_criteria.clone(),
                diameter: cable.outer_diameter,
            });
            if !node.laid_cables.contains(&cable.tag) {
                node.laid_cables.push(cable.tag.clone());
            }
            if let Some(segment) = node.segment {
                match taken.iter_mut().find(|(s, _)| *s == segment) {
                    Some((_, amount)) => *amount = amount.max(used),
                    None => taken.push((segment, used)),
                }
            }
            updated += 1;
        }

        for (segment, used) in taken {
            match self.segment_mut(segment) {
                Ok(s) => s.available_width = (s.available_width - used).max(0.0),
                Err(err) => warn!(%err, cable = %cable.tag, "routed segment missing; skipped"),
            }
        }
        debug!(cable = %cable.tag, nodes = updated, "route committed");
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::network::{Node, NodeId, NodeKind};
    use crate::operations::route::{GapSpec, RouteStatus};

    fn cable(tag: &str, criteria: &str, diameter: f64) -> Cable {
        Cable::new(tag, diameter, criteria, Point3::origin(), Point3::origin())
    }

    fn route_through(net: &TrayNetwork, ids: &[NodeId], status: RouteStatus) -> CableRoute {
        CableRoute {
            cable: "C1".into(),
            status,
            node_ids: ids.to_vec(),
            node_tags: ids.iter().map(|&id| net.node(id).unwrap().tag.clone()).collect(),
            points: Vec::new(),
            cost: 0.0,
            expanded: 0,
            diagnostic: None,
        }
    }

    fn one_node() -> (TrayNetwork, NodeId) {
        let mut net = TrayNetwork::new();
        let id = net.add_node(
            Node::new(Point3::origin(), 0.3, Vector3::z(), NodeKind::Segment).with_available_width(0.25),
        );
        (net, id)
    }

    #[test]
    fn consumes_diameter_and_records_cable() {
        let (mut net, id) = one_node();
        let route = route_through(&net, &[id], RouteStatus::Complete);
        let c1 = cable("C1", "LV", 0.05);

        assert_eq!(net.commit_route(&route, &c1, &SpacingTable::new()).unwrap(), 1);
        let node = net.node(id).unwrap();
        assert!((node.available_width - 0.2).abs() < 1e-12);
        assert_eq!(node.last_cable.as_ref().unwrap().tag, "C1");
    }

    #[test]
    fn second_cable_pays_spacing_against_first() {
        let (mut net, id) = one_node();
        let mut spacing = SpacingTable::new();
        spacing.insert("LV", "HV", GapSpec::Fixed(0.05));

        let route = route_through(&net, &[id], RouteStatus::Complete);
        net.commit_route(&route, &cable("C1", "HV", 0.05), &spacing).unwrap();
        net.commit_route(&route, &cable("C2", "LV", 0.05), &spacing).unwrap();

        assert!((net.node(id).unwrap().available_width - 0.1).abs() < 1e-12);
    }

    #[test]
    fn segment_loses_width_once_and_stops_accepting_wide_cables() {
        use crate::network::TraySegment;
        use crate::operations::build::BuildNetwork;
        use crate::operations::route::{RouteCable, RouteEnd};

        let mut net = BuildNetwork::new(vec![TraySegment::new(
            "A",
            Point3::origin(),
            Point3::new(10.0, 0.0, 0.0),
            0.3,
            0.1,
        )])
        .execute()
        .unwrap()
        .network;
        let (segment, (start, end)) = net
            .segments()
            .next()
            .map(|(id, s)| (id, s.end_nodes().unwrap()))
            .unwrap();
        assert!((net.segment(segment).unwrap().available_width - 0.25).abs() < 1e-12);
        let wide = Cable::new("C2", 0.22, "LV", Point3::new(3.0, 1.0, 0.0), Point3::new(7.0, 1.0, 0.0));
        let before = RouteCable::new(&wide, &SpacingTable::new()).execute(&net).unwrap();
        assert_eq!(before.status, RouteStatus::Complete);

        let route = route_through(&net, &[start, end], RouteStatus::Complete);
        net.commit_route(&route, &cable("C1", "LV", 0.05), &SpacingTable::new()).unwrap();
        assert!((net.segment(segment).unwrap().available_width - 0.2).abs() < 1e-12);
        assert_eq!(net.node(start).unwrap().laid_cables, ["C1"]);

        let after = RouteCable::new(&wide, &SpacingTable::new()).execute(&net).unwrap();
        assert_eq!(after.status, RouteStatus::NoLanding(RouteEnd::Start));
    }

    #[test]
    fn refuses_degraded_routes() {
        let (mut net, id) = one_node();
        let route = route_through(&net, &[id], RouteStatus::Degraded);
        let result = net.commit_route(&route, &cable("C1", "LV", 0.05), &SpacingTable::new());
        assert!(result.is_err());
        assert!((net.node(id).unwrap().available_width - 0.25).abs() < 1e-12);
    }
}
