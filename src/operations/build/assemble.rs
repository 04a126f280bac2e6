use crate::cancel::CancelFlag;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::math::{try_unit, Point3, Vector3};
use crate::network::{
    Accessory, AccessoryKind, AccessoryLeg, Node, NodeId, NodeKind, SegmentEnd, SegmentId,
    Sleeve, TrayNetwork,
};

use super::cluster::Cluster;
use super::junction::{trim_distances, Leg};
use super::{NetworkBuild, Piece};

/// Legs whose trim points are this close share one node.
const SHARED_NODE_RADIUS: f64 = 1e-6;

/// Turns clustered pieces into the final network: segments, one node per
/// distinct leg end, full connectivity within each junction, and one
/// accessory per junction with two or more legs.
pub(super) fn assemble(
    mut pieces: Vec<Piece>,
    clusters: &[Cluster],
    sleeves: &[Sleeve],
    config: &BuildConfig,
    cancel: &CancelFlag,
) -> Result<NetworkBuild> {
    // Snap every endpoint onto its junction point.
    for cluster in clusters {
        for &(idx, end) in &cluster.members {
            pieces[idx].set_point(end, cluster.point);
        }
    }

    let mut network = TrayNetwork::new();
    let ids: Vec<SegmentId> = pieces
        .iter()
        .map(|p| network.add_segment(p.to_segment(config.available_width(p.width))))
        .collect();

    let mut shared = vec![false; pieces.len()];
    let mut build = NetworkBuild::default();

    for cluster in clusters {
        cancel.check()?;
        let Some(kind) = AccessoryKind::from_connections(cluster.members.len()) else {
            for &(idx, end) in &cluster.members {
                let node = segment_node(&mut network, &pieces[idx], ids[idx], end, cluster.point, config);
                attach(&mut network, ids[idx], end, node, cluster.point)?;
            }
            continue;
        };

        let legs: Vec<Leg> = cluster
            .members
            .iter()
            .map(|&(idx, end)| {
                let piece = &pieces[idx];
                Leg {
                    dir: try_unit(&(piece.point(end.other()) - cluster.point))
                        .unwrap_or_else(Vector3::x),
                    width: piece.width,
                    height: piece.height,
                    face: piece.face,
                    length: piece.length(),
                }
            })
            .collect();
        let trims = trim_distances(&legs, config);

        let mut junction_nodes: Vec<NodeId> = Vec::new();
        let mut accessory_legs = Vec::with_capacity(legs.len());
        for (k, (&(idx, end), leg)) in cluster.members.iter().zip(&legs).enumerate() {
            shared[idx] = true;
            let trim_point = cluster.point + leg.dir * trims[k];
            let existing = junction_nodes.iter().copied().find(|&n| {
                network
                    .node(n)
                    .is_ok_and(|node| (node.point - trim_point).norm() < SHARED_NODE_RADIUS)
            });
            let node = match existing {
                Some(node) => node,
                None => {
                    let node = segment_node(&mut network, &pieces[idx], ids[idx], end, trim_point, config);
                    junction_nodes.push(node);
                    node
                }
            };
            attach(&mut network, ids[idx], end, node, trim_point)?;
            accessory_legs.push(AccessoryLeg {
                segment: ids[idx],
                node,
                trim_point,
                width: leg.width,
                height: leg.height,
                face: leg.face,
                shaped: k < AccessoryKind::MAX_SHAPED_LEGS,
            });
        }

        for (i, &a) in junction_nodes.iter().enumerate() {
            for &b in &junction_nodes[i + 1..] {
                network.connect(a, b)?;
            }
        }

        let accessory = Accessory {
            kind,
            junction: cluster.point,
            legs: accessory_legs,
        };
        match kind {
            AccessoryKind::Bend => build.bends.push(accessory),
            AccessoryKind::Tee => build.tees.push(accessory),
            AccessoryKind::Cross => build.crosses.push(accessory),
        }
    }

    for (idx, &id) in ids.iter().enumerate() {
        let segment = network.segment_mut(id)?;
        segment.isolated = !shared[idx];
        let ends = segment.end_nodes();
        if segment.isolated {
            build.isolated.push(id);
        } else {
            build.segments.push(id);
        }
        if let Some((a, b)) = ends {
            network.connect(a, b)?;
        }
    }

    for sleeve in sleeves {
        let mut node = Node::new(sleeve.point, sleeve.width, sleeve.face, NodeKind::Sleeve)
            .with_available_width(config.available_width(sleeve.width))
            .with_route_types(sleeve.route_types.clone());
        node.tag.clone_from(&sleeve.tag);
        network.add_node(node);
    }

    build.network = network;
    Ok(build)
}

fn segment_node(
    network: &mut TrayNetwork,
    piece: &Piece,
    segment: SegmentId,
    end: SegmentEnd,
    point: Point3,
    config: &BuildConfig,
) -> NodeId {
    let node = Node::new(point, piece.width, piece.face, NodeKind::Segment)
        .on_segment(segment, end.into())
        .with_available_width(config.available_width(piece.width))
        .with_route_types(piece.route_types.clone());
    network.add_node(node)
}

fn attach(
    network: &mut TrayNetwork,
    segment: SegmentId,
    end: SegmentEnd,
    node: NodeId,
    trim_point: Point3,
) -> Result<()> {
    let segment = network.segment_mut(segment)?;
    match end {
        SegmentEnd::Start => {
            segment.start_node = Some(node);
            segment.start_trim = trim_point;
        }
        SegmentEnd::End => {
            segment.end_node = Some(node);
            segment.end_trim = trim_point;
        }
    }
    Ok(())
}
