use crate::math::Point3;
use crate::network::SegmentEnd;

use super::Piece;

/// A unique junction point and the piece ends that meet there.
#[derive(Debug, Clone)]
pub(super) struct Cluster {
    pub point: Point3,
    pub members: Vec<(usize, SegmentEnd)>,
}

/// Merges piece endpoints lying within `radius` of each other.
///
/// The first endpoint seen defines the cluster point. Clusters come out in
/// first-seen order, which keeps node numbering stable across runs.
pub(super) fn cluster_endpoints(pieces: &[Piece], radius: f64) -> Vec<Cluster> {
    let radius_sq = radius * radius;
    let mut clusters: Vec<Cluster> = Vec::new();

    for (idx, piece) in pieces.iter().enumerate() {
        for end in [SegmentEnd::Start, SegmentEnd::End] {
            let point = piece.point(end);
            let found = clusters
                .iter()
                .position(|c| (c.point - point).norm_squared() <= radius_sq);
            match found {
                Some(ci) => clusters[ci].members.push((idx, end)),
                None => clusters.push(Cluster {
                    point,
                    members: vec![(idx, end)],
                }),
            }
        }
    }

    clusters
}
