#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use tracing_subscriber::EnvFilter;
use traynet::math::{Point3, Vector3};
use traynet::network::{EndMarker, TrayNetwork, TraySegment};
use traynet::operations::build::BuildNetwork;
use traynet::operations::jump::AugmentJumps;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn seg(tag: &str, a: Point3, b: Point3) -> TraySegment {
    TraySegment::new(tag, a, b, 0.3, 0.1)
}

/// Two horizontal and two vertical runs crossing in a `#`.
fn hash_layout() -> Vec<TraySegment> {
    vec![
        seg("H1", p(0.0, 2.0, 0.0), p(10.0, 2.0, 0.0)),
        seg("H2", p(0.0, 6.0, 0.0), p(10.0, 6.0, 0.0)),
        seg("V1", p(3.0, 0.0, 0.0), p(3.0, 8.0, 0.0)),
        seg("V2", p(7.0, 0.0, 0.0), p(7.0, 8.0, 0.0)),
    ]
}

fn assert_no_coincident_nodes(net: &TrayNetwork) {
    let nodes: Vec<_> = net.nodes().collect();
    for (i, (_, a)) in nodes.iter().enumerate() {
        for (_, b) in &nodes[i + 1..] {
            assert!(
                (a.point - b.point).norm() > 1e-6,
                "nodes {} and {} coincide at {:?}",
                a.tag,
                b.tag,
                a.point
            );
        }
    }
}

#[test]
fn crossing_runs_split_into_crosses() {
    init_tracing();
    let build = BuildNetwork::new(hash_layout()).execute().unwrap();

    assert_eq!(build.stats.split, 8);
    assert_eq!(build.network.segment_count(), 12);
    assert_eq!(build.crosses.len(), 4);
    assert!(build.bends.is_empty());
    assert!(build.tees.is_empty());
    assert!(build.isolated.is_empty());
    for cross in &build.crosses {
        assert_eq!(cross.node_ids().len(), 4);
    }
    assert_no_coincident_nodes(&build.network);
}

#[test]
fn rebuilding_own_output_is_idempotent() {
    init_tracing();
    let first = BuildNetwork::new(hash_layout()).execute().unwrap();
    let second = BuildNetwork::from_network(&first.network).execute().unwrap();

    assert_eq!(second.stats.split, 0);
    assert_eq!(second.stats.merged, 0);
    assert_eq!(second.stats.culled, 0);
    assert_eq!(second.network.segment_count(), first.network.segment_count());
    assert_eq!(second.network.node_count(), first.network.node_count());
    assert_eq!(second.crosses.len(), first.crosses.len());

    let tags = |net: &TrayNetwork| -> BTreeSet<String> { net.segments().map(|(_, s)| s.tag.clone()).collect() };
    assert_eq!(tags(&first.network), tags(&second.network));
}

#[test]
fn near_coincident_ends_share_one_node() {
    init_tracing();
    let build = BuildNetwork::new(vec![
        seg("A", p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0)),
        seg("B", p(5.03, 0.0, 0.0), p(10.0, 0.0, 0.0)),
    ])
    .execute()
    .unwrap();

    let net = &build.network;
    let a = net.segments().find(|(_, s)| s.tag == "A").unwrap().1;
    let b = net.segments().find(|(_, s)| s.tag == "B").unwrap().1;
    assert_eq!(a.end_node, b.start_node);
    assert_eq!(net.node_count(), 3);
    assert_no_coincident_nodes(net);
}

#[test]
fn three_way_junction_is_one_tee() {
    init_tracing();
    let build = BuildNetwork::new(vec![
        seg("E", p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0)),
        seg("W", p(0.0, 0.0, 0.0), p(-5.0, 0.0, 0.0)),
        seg("N", p(0.0, 0.0, 0.0), p(0.0, 5.0, 0.0)),
    ])
    .execute()
    .unwrap();

    assert_eq!(build.tees.len(), 1);
    assert!(build.bends.is_empty());
    assert!(build.crosses.is_empty());

    let net = &build.network;
    let expected: BTreeSet<String> = net
        .segments()
        .map(|(_, s)| net.node(s.start_node.unwrap()).unwrap().tag.clone())
        .collect();
    let tee: BTreeSet<String> = build.tees[0]
        .node_ids()
        .into_iter()
        .map(|id| net.node(id).unwrap().tag.clone())
        .collect();
    assert_eq!(tee.len(), 3);
    assert_eq!(tee, expected);
}

#[test]
fn lone_segment_is_isolated() {
    init_tracing();
    let build = BuildNetwork::new(vec![seg("A", p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0))])
        .execute()
        .unwrap();

    assert_eq!(build.isolated.len(), 1);
    assert!(build.segments.is_empty());
    assert_eq!(build.network.node_count(), 2);
    assert_eq!(build.accessories().count(), 0);
    assert_eq!(build.network.isolated_segments().count(), 1);
    assert_eq!(build.network.connected_segments().count(), 0);
    let (_, segment) = build.network.segments().next().unwrap();
    assert!(segment.isolated);
    assert_ne!(segment.start_node, segment.end_node);
    let markers: BTreeSet<u8> = build.network.nodes().filter_map(|(_, n)| n.end.map(EndMarker::code)).collect();
    assert_eq!(markers, BTreeSet::from([1, 2]));
}

#[test]
fn face_along_the_run_is_replaced() {
    init_tracing();
    let build = BuildNetwork::new(vec![
        seg("RISER", p(0.0, 0.0, 0.0), p(0.0, 0.0, 4.0)),
        seg("FLAT", p(2.0, 0.0, 0.0), p(6.0, 0.0, 0.0)).with_face(Vector3::zeros()),
    ])
    .execute()
    .unwrap();

    assert_eq!(build.stats.face_resets, 2);
    for (_, segment) in build.network.segments() {
        let dir = segment.direction().unwrap();
        assert!(segment.face.dot(&dir).abs() < 1e-9, "{} face {:?}", segment.tag, segment.face);
        assert!((segment.face.norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn jump_pairs_only_inside_the_band() {
    init_tracing();
    for (gap, expected) in [(0.05, 0), (0.2, 1), (0.35, 1), (0.59, 1), (0.61, 0), (0.8, 0)] {
        let mut build = BuildNetwork::new(vec![
            seg("LOW", p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)),
            seg("HIGH", p(5.0, -5.0, gap), p(5.0, 5.0, gap)),
        ])
        .execute()
        .unwrap();
        let report = AugmentJumps::new().execute(&mut build.network).unwrap();
        let mid_spans = build
            .network
            .nodes()
            .filter(|(_, n)| n.end == Some(EndMarker::MidSpan))
            .count();

        assert_eq!(report.crossings, expected, "gap {gap}");
        assert_eq!(mid_spans, expected * 2, "gap {gap}");
    }
}
