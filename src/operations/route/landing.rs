use tracing::debug;

use crate::config::RouteConfig;
use crate::math::line_3d::closest_point_on_segment;
use crate::math::Point3;
use crate::network::{NodeKind, SegmentId, TrayNetwork};

use super::cable::Cable;
use super::graph::SearchGraph;
use super::types::RouteEnd;

/// A vertex the synthetic endpoint may step onto.
#[derive(Debug, Clone, Copy)]
pub(super) struct Landing {
    pub index: usize,
    /// Set for dummies projected onto a segment.
    pub segment: Option<SegmentId>,
}

/// Finds up to `landing_candidates` places where `point` can enter the network.
///
/// Sleeves within `sleeve_radius` win outright. Otherwise the point is
/// projected onto the nearest accepting segments within `segment_radius`,
/// each projection becoming a dummy vertex linked to the segment's end nodes.
pub(super) fn resolve(
    graph: &mut SearchGraph,
    network: &TrayNetwork,
    cable: &Cable,
    config: &RouteConfig,
    point: &Point3,
    end: RouteEnd,
) -> Vec<Landing> {
    let sleeves = sleeve_landings(graph, network, cable, config, point);
    if !sleeves.is_empty() {
        debug!(cable = %cable.tag, %end, count = sleeves.len(), "landing on sleeves");
        return sleeves;
    }

    let mut candidates: Vec<(SegmentId, Point3, f64)> = network
        .segments()
        .filter(|(_, s)| s.accepts(&cable.route_criteria) && s.available_width >= cable.outer_diameter)
        .filter(|(_, s)| s.end_nodes().is_some())
        .map(|(id, s)| {
            let foot = closest_point_on_segment(point, &s.start, &s.end);
            (id, foot, (foot - point).norm())
        })
        .filter(|&(_, _, d)| d <= config.segment_radius)
        .collect();
    candidates.sort_by(|a, b| a.2.total_cmp(&b.2));
    candidates.truncate(config.landing_candidates);

    let mut landings = Vec::with_capacity(candidates.len());
    for (k, (segment, foot, _)) in candidates.into_iter().enumerate() {
        let Some((a, b)) = network.segment(segment).ok().and_then(|s| s.end_nodes()) else {
            continue;
        };
        let (Some(ia), Some(ib)) = (graph.index_of(a), graph.index_of(b)) else {
            continue;
        };
        let index = graph.add_virtual(foot, format!("{}:{end}:{k}", cable.tag));
        graph.link(index, ia);
        graph.link(index, ib);
        landings.push(Landing {
            index,
            segment: Some(segment),
        });
    }
    debug!(cable = %cable.tag, %end, count = landings.len(), "landing on segments");
    landings
}

fn sleeve_landings(
    graph: &SearchGraph,
    network: &TrayNetwork,
    cable: &Cable,
    config: &RouteConfig,
    point: &Point3,
) -> Vec<Landing> {
    let mut found: Vec<(usize, f64)> = network
        .nodes()
        .filter(|(_, n)| n.kind == NodeKind::Sleeve)
        .filter(|(_, n)| n.accepts(&cable.route_criteria) && n.available_width >= cable.outer_diameter)
        .filter(|(_, n)| !cable.avoids(n))
        .filter_map(|(id, n)| {
            let distance = (n.point - point).norm();
            if distance > config.sleeve_radius {
                return None;
            }
            graph.index_of(id).map(|index| (index, distance))
        })
        .collect();
    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found.truncate(config.landing_candidates);
    found
        .into_iter()
        .map(|(index, _)| Landing {
            index,
            segment: None,
        })
        .collect()
}
