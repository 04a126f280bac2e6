use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::math::intersect_3d::{intersect, IntersectionKind};
use crate::math::line_3d::project_length;
use crate::math::TOLERANCE;

use super::Piece;

/// Shared length below which colinear pieces count as merely touching.
const MIN_OVERLAP: f64 = 1e-6;

/// Collapses colinear overlapping pieces into one spanning their extremes.
///
/// Pairs are classified in parallel, then merged sequentially against the
/// current geometry; the shorter piece of each merged pair is marked
/// removed and never revived. Passes repeat until nothing merges, since a
/// grown piece can reach pieces it previously missed. Returns the number
/// of pieces removed.
pub(super) fn remove_overlaps(
    pieces: &mut [Piece],
    config: &BuildConfig,
    cancel: &CancelFlag,
) -> Result<usize> {
    let mut removed = 0;
    loop {
        cancel.check()?;
        let candidates = overlapping_pairs(pieces, config, cancel);
        cancel.check()?;

        let mut merged = 0;
        for (i, j) in candidates {
            if pieces[i].removed || pieces[j].removed {
                continue;
            }
            if overlap_length(&pieces[i], &pieces[j], config).is_none() {
                continue;
            }
            let (keep, drop) = if pieces[i].length() >= pieces[j].length() {
                (i, j)
            } else {
                (j, i)
            };
            let other = pieces[drop].clone();
            span_extremes(&mut pieces[keep], &other);
            pieces[drop].removed = true;
            debug!(kept = %pieces[keep].tag, dropped = %other.tag, "merged overlapping segments");
            merged += 1;
        }

        removed += merged;
        if merged == 0 {
            return Ok(removed);
        }
    }
}

fn overlapping_pairs(pieces: &[Piece], config: &BuildConfig, cancel: &CancelFlag) -> Vec<(usize, usize)> {
    let boxes: Vec<_> = pieces.iter().map(Piece::aabb).collect();
    (0..pieces.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let boxes = &boxes;
            (i + 1..pieces.len()).filter_map(move |j| {
                if cancel.is_cancelled() || pieces[i].removed || pieces[j].removed {
                    return None;
                }
                if !boxes[i].within(&boxes[j], config.overlap_gap) {
                    return None;
                }
                overlap_length(&pieces[i], &pieces[j], config).map(|_| (i, j))
            })
        })
        .collect()
}

/// Shared length of two colinear pieces, if they genuinely overlap.
fn overlap_length(a: &Piece, b: &Piece, config: &BuildConfig) -> Option<f64> {
    let hit = intersect(&a.start, &a.end, &b.start, &b.end, &config.intersect_tolerance(0.0))?;
    (hit.kind == IntersectionKind::Colinear && hit.overlap > MIN_OVERLAP).then_some(hit.overlap)
}

/// Stretches `keep` along its own direction to cover `other`'s endpoints too.
fn span_extremes(keep: &mut Piece, other: &Piece) {
    let len = keep.length();
    if len < TOLERANCE {
        return;
    }
    let dir = (keep.end - keep.start) / len;
    let origin = keep.start;
    let params = [
        0.0,
        len,
        project_length(&other.start, &keep.start, &keep.end),
        project_length(&other.end, &keep.start, &keep.end),
    ];
    let lo = params.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = params.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    keep.start = origin + dir * lo;
    keep.end = origin + dir * hi;
}
