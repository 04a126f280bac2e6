mod assemble;
mod cluster;
mod face;
mod joint;
mod junction;
mod overlap;

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::math::bounds::Aabb;
use crate::math::{Point3, Vector3};
use crate::network::{Accessory, Segment, SegmentEnd, SegmentId, Sleeve, TrayNetwork, TraySegment};

/// Counters describing what a build pass did.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    /// Inputs rejected for non-finite coordinates or non-positive dimensions.
    pub rejected: usize,
    /// Segments dropped for being shorter than the minimum length.
    pub culled: usize,
    /// Segments absorbed into an overlapping colinear neighbour.
    pub merged: usize,
    /// Extra segments created by splitting at crossings.
    pub split: usize,
    /// Degenerate faces replaced by a default.
    pub face_resets: usize,
    /// Unique junction points.
    pub clusters: usize,
}

/// Output of [`BuildNetwork`].
#[derive(Debug, Clone, Default)]
pub struct NetworkBuild {
    /// Segments, nodes and connectivity.
    pub network: TrayNetwork,
    /// Segments sharing at least one junction.
    pub segments: Vec<SegmentId>,
    /// Segments with no shared junction; they still own two end nodes.
    pub isolated: Vec<SegmentId>,
    pub bends: Vec<Accessory>,
    pub tees: Vec<Accessory>,
    pub crosses: Vec<Accessory>,
    pub stats: BuildStats,
}

impl NetworkBuild {
    /// All accessories: bends, then tees, then crosses.
    pub fn accessories(&self) -> impl Iterator<Item = &Accessory> {
        self.bends.iter().chain(&self.tees).chain(&self.crosses)
    }
}

/// Builds a connected tray network from raw straight segments.
///
/// The pass removes overlaps, splits segments at crossings, clusters
/// endpoints into junction points, classifies each junction by its
/// connection count (2 → bend, 3 → tee, 4+ → cross), and emits nodes with
/// full connectivity inside each junction plus an edge along every
/// segment. Every artifact is recomputed from the inputs.
#[derive(Debug, Clone)]
pub struct BuildNetwork {
    segments: Vec<TraySegment>,
    sleeves: Vec<Sleeve>,
    config: BuildConfig,
    cancel: CancelFlag,
}

impl BuildNetwork {
    /// Creates a build over raw segments with default settings.
    #[must_use]
    pub fn new(segments: Vec<TraySegment>) -> Self {
        Self {
            segments,
            sleeves: Vec::new(),
            config: BuildConfig::default(),
            cancel: CancelFlag::new(),
        }
    }

    /// Creates a build that re-runs over a previously built network.
    #[must_use]
    pub fn from_network(network: &TrayNetwork) -> Self {
        let (segments, sleeves) = network.to_inputs();
        Self::new(segments).with_sleeves(sleeves)
    }

    #[must_use]
    pub fn with_sleeves(mut self, sleeves: Vec<Sleeve>) -> Self {
        self.sleeves = sleeves;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns [`TraynetError::Cancelled`](crate::TraynetError::Cancelled) if
    /// the cancel flag is raised, or a network error if the arena turns out
    /// inconsistent while wiring nodes.
    pub fn execute(&self) -> Result<NetworkBuild> {
        let config = &self.config;
        let mut stats = BuildStats::default();

        let mut pieces: Vec<Piece> = Vec::with_capacity(self.segments.len());
        for input in latest_revisions(&self.segments) {
            match input.validate() {
                Ok(()) => pieces.push(Piece::from_input(input)),
                Err(err) => {
                    warn!(%err, "input segment rejected");
                    stats.rejected += 1;
                }
            }
        }
        stats.culled += cull_short(&mut pieces, config.min_segment_length);

        stats.merged = overlap::remove_overlaps(&mut pieces, config, &self.cancel)?;
        pieces.retain(|p| !p.removed);
        stats.culled += cull_short(&mut pieces, config.min_segment_length);

        stats.face_resets = face::repair_faces(&mut pieces);

        let (pieces, split) = joint::break_joints(pieces, config, &self.cancel)?;
        stats.split = split;

        self.cancel.check()?;
        let clusters = cluster::cluster_endpoints(&pieces, config.merge_radius);
        stats.clusters = clusters.len();
        debug!(pieces = pieces.len(), clusters = clusters.len(), "endpoints clustered");

        let mut build = assemble::assemble(pieces, &clusters, &self.sleeves, config, &self.cancel)?;
        build.stats = stats;

        info!(
            segments = build.segments.len(),
            isolated = build.isolated.len(),
            nodes = build.network.node_count(),
            bends = build.bends.len(),
            tees = build.tees.len(),
            crosses = build.crosses.len(),
            rejected = stats.rejected,
            culled = stats.culled,
            merged = stats.merged,
            split = stats.split,
            "tray network built"
        );
        Ok(build)
    }
}

/// Working copy of a segment while the build pass reshapes it.
#[derive(Debug, Clone)]
struct Piece {
    tag: String,
    parent: Option<String>,
    start: Point3,
    end: Point3,
    width: f64,
    height: f64,
    face: Vector3,
    route_types: Vec<String>,
    revision: u64,
    removed: bool,
}

impl Piece {
    fn from_input(input: &TraySegment) -> Self {
        Self {
            tag: input.tag.clone(),
            parent: None,
            start: input.start,
            end: input.end,
            width: input.width,
            height: input.height,
            face: input.face,
            route_types: input.route_types.clone(),
            revision: input.revision,
            removed: false,
        }
    }

    fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn aabb(&self) -> Aabb {
        Aabb::from_segment(&self.start, &self.end)
    }

    fn point(&self, end: SegmentEnd) -> Point3 {
        match end {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    fn set_point(&mut self, end: SegmentEnd, point: Point3) {
        match end {
            SegmentEnd::Start => self.start = point,
            SegmentEnd::End => self.end = point,
        }
    }

    fn to_segment(&self, available_width: f64) -> Segment {
        Segment {
            tag: self.tag.clone(),
            parent: self.parent.clone(),
            start: self.start,
            end: self.end,
            start_trim: self.start,
            end_trim: self.end,
            width: self.width,
            height: self.height,
            face: self.face,
            route_types: self.route_types.clone(),
            available_width,
            start_node: None,
            end_node: None,
            jump_nodes: Vec::new(),
            isolated: false,
            revision: self.revision,
        }
    }

    #[cfg(test)]
    fn test_piece(start: Point3, end: Point3) -> Self {
        Self::from_input(&TraySegment::new("t", start, end, 0.3, 0.1))
    }
}

/// Keeps, per tag, the input with the highest revision (the later one on
/// ties), in first-seen order.
fn latest_revisions(inputs: &[TraySegment]) -> Vec<&TraySegment> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&TraySegment> = Vec::new();
    for input in inputs {
        match slots.get(input.tag.as_str()) {
            Some(&slot) => {
                if input.revision >= latest[slot].revision {
                    latest[slot] = input;
                }
            }
            None => {
                slots.insert(&input.tag, latest.len());
                latest.push(input);
            }
        }
    }
    latest
}

/// Drops pieces shorter than `min_length`; returns how many were dropped.
fn cull_short(pieces: &mut Vec<Piece>, min_length: f64) -> usize {
    let before = pieces.len();
    pieces.retain(|p| p.length().is_finite() && p.length() >= min_length);
    before - pieces.len()
}
