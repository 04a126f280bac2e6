use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelFlag;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::math::intersect_3d::{intersect, IntersectionKind};
use crate::math::line_3d::project_length;
use crate::math::{Point3, TOLERANCE};

use super::Piece;
use crate::network::SegmentEnd;

/// A crossing found between two pieces.
struct Joint {
    first: usize,
    second: usize,
    point: Point3,
    s_first: f64,
    s_second: f64,
}

/// Splits pieces where they cross or where another piece ends on them.
///
/// A crossing splits a piece only if it lies at least
/// `joint_end_clearance` inside that piece; otherwise the piece's nearest
/// end is snapped onto the crossing so clustering picks it up, unless that
/// end already meets another piece and moving it would break the junction.
/// Children
/// remember the tag of the input they came from. Returns the new piece
/// list and the number of extra pieces created.
pub(super) fn break_joints(
    mut pieces: Vec<Piece>,
    config: &BuildConfig,
    cancel: &CancelFlag,
) -> Result<(Vec<Piece>, usize)> {
    cancel.check()?;
    let joints = find_joints(&pieces, config, cancel);
    cancel.check()?;

    let clearance = config.joint_end_clearance;
    let mut splits: Vec<Vec<Point3>> = vec![Vec::new(); pieces.len()];
    let mut snaps: Vec<(usize, SegmentEnd, Point3)> = Vec::new();

    for joint in &joints {
        for (idx, s) in [(joint.first, joint.s_first), (joint.second, joint.s_second)] {
            let len = pieces[idx].length();
            if s > clearance && s < len - clearance {
                splits[idx].push(joint.point);
            } else {
                let end = if s <= len * 0.5 {
                    SegmentEnd::Start
                } else {
                    SegmentEnd::End
                };
                let near = (pieces[idx].point(end) - joint.point).norm() <= clearance;
                if near && !shares_endpoint(&pieces, idx, end, config.merge_radius) {
                    snaps.push((idx, end, joint.point));
                }
            }
        }
    }

    for (idx, end, point) in snaps {
        pieces[idx].set_point(end, point);
    }

    let mut result = Vec::with_capacity(pieces.len());
    let mut created = 0;
    for (piece, points) in pieces.into_iter().zip(splits) {
        let children = split_piece(piece, points, clearance);
        created += children.len() - 1;
        result.extend(children);
    }

    debug!(joints = joints.len(), created, "joint breaking done");
    Ok((result, created))
}

/// Returns `true` if another piece has an endpoint within `radius` of the
/// given end.
fn shares_endpoint(pieces: &[Piece], idx: usize, end: SegmentEnd, radius: f64) -> bool {
    let point = pieces[idx].point(end);
    pieces.iter().enumerate().any(|(other, piece)| {
        other != idx
            && [SegmentEnd::Start, SegmentEnd::End]
                .into_iter()
                .any(|e| (piece.point(e) - point).norm() <= radius)
    })
}

fn find_joints(pieces: &[Piece], config: &BuildConfig, cancel: &CancelFlag) -> Vec<Joint> {
    let overshoot = config.joint_overshoot;
    let tol = config.intersect_tolerance(overshoot);
    let boxes: Vec<_> = pieces.iter().map(Piece::aabb).collect();

    (0..pieces.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let boxes = &boxes;
            (i + 1..pieces.len()).filter_map(move |j| {
                if cancel.is_cancelled() || !boxes[i].within(&boxes[j], overshoot) {
                    return None;
                }
                let (a, b) = (&pieces[i], &pieces[j]);
                let hit = intersect(&a.start, &a.end, &b.start, &b.end, &tol)?;
                if hit.kind == IntersectionKind::Colinear || !hit.inside || hit.separation > overshoot {
                    return None;
                }
                Some(Joint {
                    first: i,
                    second: j,
                    point: Point3::from((hit.on_first.coords + hit.on_second.coords) * 0.5),
                    s_first: hit.s_first,
                    s_second: hit.s_second,
                })
            })
        })
        .collect()
}

/// Cuts a piece at the given points. Points closer than `clearance` to an
/// end or to each other are ignored.
fn split_piece(piece: Piece, points: Vec<Point3>, clearance: f64) -> Vec<Piece> {
    let len = piece.length();
    if points.is_empty() || len < TOLERANCE {
        return vec![piece];
    }

    let mut params: Vec<f64> = points
        .iter()
        .map(|p| project_length(p, &piece.start, &piece.end))
        .filter(|&s| s > clearance && s < len - clearance)
        .collect();
    params.sort_by(f64::total_cmp);
    params.dedup_by(|a, b| (*a - *b).abs() < clearance);
    if params.is_empty() {
        return vec![piece];
    }

    let dir = (piece.end - piece.start) / len;
    let parent = piece.parent.clone().unwrap_or_else(|| piece.tag.clone());
    let mut cuts = Vec::with_capacity(params.len() + 2);
    cuts.push(piece.start);
    cuts.extend(params.iter().map(|&s| piece.start + dir * s));
    cuts.push(piece.end);

    cuts.windows(2)
        .enumerate()
        .map(|(k, w)| Piece {
            tag: format!("{}.{}", piece.tag, k + 1),
            parent: Some(parent.clone()),
            start: w[0],
            end: w[1],
            ..piece.clone()
        })
        .collect()
}
