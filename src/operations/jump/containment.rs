use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::config::JumpConfig;
use crate::error::Result;
use crate::math::bounds::{Aabb, OrientedBox};
use crate::math::Point3;
use crate::network::{NodeId, SegmentId, TrayNetwork};

/// Finds nodes sitting inside another segment's solid volume and joins
/// them to that segment through a mid-span node.
///
/// This recovers tees and crosses whose branch stops on the tray surface
/// rather than at its centerline. Returns the number of new links.
pub(super) fn link_contained(
    network: &mut TrayNetwork,
    config: &JumpConfig,
    cancel: &CancelFlag,
) -> Result<usize> {
    let volumes: Vec<(SegmentId, OrientedBox, Aabb)> = network
        .segments()
        .filter_map(|(id, s)| match s.oriented_box() {
            Ok(volume) => Some((id, volume, s.aabb().expanded(s.width.max(s.height) * 0.5))),
            Err(err) => {
                warn!(segment = %s.tag, %err, "no solid volume; skipped for containment");
                None
            }
        })
        .collect();
    let nodes: Vec<(NodeId, Point3, Option<SegmentId>)> = network
        .nodes()
        .map(|(id, n)| (id, n.point, n.segment))
        .collect();

    let mut linked = 0;
    for (node, point, own) in nodes {
        cancel.check()?;
        let probe = Aabb::from_segment(&point, &point);
        for (segment, volume, bounds) in &volumes {
            if own == Some(*segment) || !bounds.intersects(&probe) {
                continue;
            }
            let Some(s) = volume.contains_strict(&point, config.containment_clearance) else {
                continue;
            };
            let result = network
                .jump_node(*segment, volume.point_at(s), config.dedupe_radius)
                .and_then(|mid| network.connect(mid, node));
            match result {
                Ok(true) => linked += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "skipping containment jump"),
            }
        }
    }
    debug!(linked, "contained nodes linked");
    Ok(linked)
}
