use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::error::Result;
use crate::network::{NodeId, NodeKind, TrayNetwork};

/// Links every dead end to each node within `radius` it is not yet
/// connected to.
///
/// A dead end is a node with exactly one connection, or a sleeve with
/// none. Nodes on the dead end's own segment are skipped. Dead ends are
/// picked before any link is made, so nodes that gain links here are not
/// promoted to dead ends mid-pass. Returns the number of new links.
pub(super) fn link_dead_ends(
    network: &mut TrayNetwork,
    radius: f64,
    cancel: &CancelFlag,
) -> Result<usize> {
    let dead_ends: Vec<NodeId> = network
        .nodes()
        .filter(|(_, n)| n.degree() == 1 || (n.kind == NodeKind::Sleeve && n.degree() == 0))
        .map(|(id, _)| id)
        .collect();

    let mut linked = 0;
    for id in dead_ends {
        cancel.check()?;
        let Ok(node) = network.node(id) else {
            warn!(?id, "dead end vanished from the network");
            continue;
        };
        let (point, segment) = (node.point, node.segment);
        let near: Vec<NodeId> = network
            .nodes()
            .filter(|&(other, n)| {
                other != id
                    && (segment.is_none() || n.segment != segment)
                    && (n.point - point).norm() <= radius
                    && !n.connections.contains(&id)
            })
            .map(|(other, _)| other)
            .collect();
        for other in near {
            match network.connect(id, other) {
                Ok(true) => linked += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "skipping dead-end link"),
            }
        }
    }
    debug!(linked, "dead ends reconciled");
    Ok(linked)
}
