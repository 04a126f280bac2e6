use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::config::JumpConfig;
use crate::error::Result;
use crate::math::bounds::Aabb;
use crate::math::intersect_3d::{intersect, IntersectTolerance, IntersectionKind};
use crate::math::Point3;
use crate::network::{SegmentId, TrayNetwork};

struct Crossing {
    first: SegmentId,
    second: SegmentId,
    on_first: Point3,
    on_second: Point3,
}

/// Links pairs of skew segments that pass within the jump band of each
/// other, through a mid-span node on each at the closest-approach points.
///
/// Jump nodes are reused per segment within `dedupe_radius`, so several
/// crossings over the same gap share them. Approaches at a segment end are
/// left to dead-end reconciliation. Returns the number of new
/// jump links.
pub(super) fn link_crossings(
    network: &mut TrayNetwork,
    config: &JumpConfig,
    tolerance: &IntersectTolerance,
    cancel: &CancelFlag,
) -> Result<usize> {
    let segments: Vec<(SegmentId, Point3, Point3, Aabb)> = network
        .segments()
        .map(|(id, s)| (id, s.start, s.end, s.aabb()))
        .collect();

    cancel.check()?;
    let crossings: Vec<Crossing> = (0..segments.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let segments = &segments;
            (i + 1..segments.len()).filter_map(move |j| {
                if cancel.is_cancelled() {
                    return None;
                }
                let (a, a0, a1, a_box) = &segments[i];
                let (b, b0, b1, b_box) = &segments[j];
                if !a_box.within(b_box, config.proximity) {
                    return None;
                }
                let hit = intersect(a0, a1, b0, b1, tolerance)?;
                let in_band = hit.separation > config.min_gap && hit.separation < config.max_gap;
                let mid_span = within_span(hit.s_first, (a1 - a0).norm(), config.dedupe_radius)
                    && within_span(hit.s_second, (b1 - b0).norm(), config.dedupe_radius);
                (hit.kind == IntersectionKind::Skew && mid_span && in_band).then_some(Crossing {
                    first: *a,
                    second: *b,
                    on_first: hit.on_first,
                    on_second: hit.on_second,
                })
            })
        })
        .collect();
    cancel.check()?;

    let mut linked = 0;
    for crossing in crossings {
        let pair = network
            .jump_node(crossing.first, crossing.on_first, config.dedupe_radius)
            .and_then(|a| {
                let b = network.jump_node(crossing.second, crossing.on_second, config.dedupe_radius)?;
                network.connect(a, b)
            });
        match pair {
            Ok(true) => linked += 1,
            Ok(false) => {}
            Err(e) => warn!(error = %e, "skipping crossing jump"),
        }
    }
    debug!(linked, "crossing jumps linked");
    Ok(linked)
}

/// Closest approach lies strictly between the ends, clear of the end nodes.
fn within_span(s: f64, len: f64, clearance: f64) -> bool {
    s > clearance && s < len - clearance
}
