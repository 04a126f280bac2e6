#![allow(clippy::unwrap_used)]

use tracing_subscriber::EnvFilter;
use traynet::config::RouteConfig;
use traynet::math::{manhattan, Point3, Vector3};
use traynet::network::{EndMarker, LaidCable, Node, NodeId, NodeKind, TrayNetwork, TraySegment};
use traynet::operations::build::BuildNetwork;
use traynet::operations::jump::AugmentJumps;
use traynet::operations::route::{Cable, GapSpec, RouteCable, RouteStatus, SpacingRule, SpacingTable};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

const COLS: usize = 4;
const ROWS: usize = 3;

/// Irregular 4 x 3 lattice with a few diagonals, entered through sleeve
/// `S` at one corner and left through sleeve `G` at the opposite one.
struct Lattice {
    net: TrayNetwork,
    start: NodeId,
    goal: NodeId,
    grid: Vec<NodeId>,
}

#[allow(clippy::cast_precision_loss)]
fn lattice() -> Lattice {
    let mut net = TrayNetwork::new();
    let point = |i: usize, j: usize| {
        p(
            i as f64 * 3.0 + (j % 2) as f64 * 0.7,
            j as f64 * 2.5 + i as f64 * 0.4,
            ((i + j) % 2) as f64 * 0.5,
        )
    };
    let mut grid = Vec::with_capacity(COLS * ROWS);
    for j in 0..ROWS {
        for i in 0..COLS {
            grid.push(net.add_node(Node::new(point(i, j), 0.3, Vector3::z(), NodeKind::Segment)));
        }
    }
    let at = |i: usize, j: usize| grid[j * COLS + i];
    for j in 0..ROWS {
        for i in 0..COLS {
            if i + 1 < COLS {
                net.connect(at(i, j), at(i + 1, j)).unwrap();
            }
            if j + 1 < ROWS {
                net.connect(at(i, j), at(i, j + 1)).unwrap();
            }
            if i + 1 < COLS && j + 1 < ROWS && (i + j) % 3 == 0 {
                net.connect(at(i, j), at(i + 1, j + 1)).unwrap();
            }
        }
    }
    let start = net.add_node(Node::new(p(-3.0, 0.0, 0.0), 0.3, Vector3::z(), NodeKind::Sleeve));
    let far = point(COLS - 1, ROWS - 1);
    let goal = net.add_node(Node::new(far + Vector3::new(3.0, 0.0, 0.0), 0.3, Vector3::z(), NodeKind::Sleeve));
    net.connect(start, at(0, 0)).unwrap();
    net.connect(goal, at(COLS - 1, ROWS - 1)).unwrap();
    Lattice { net, start, goal, grid }
}

/// Cheapest simple path by brute force.
fn exhaustive_cost(net: &TrayNetwork, from: NodeId, to: NodeId) -> f64 {
    fn walk(net: &TrayNetwork, at: NodeId, to: NodeId, visited: &mut Vec<NodeId>, cost: f64, best: &mut f64) {
        if at == to {
            *best = best.min(cost);
            return;
        }
        let here = net.node(at).unwrap();
        for &next in &here.connections {
            if visited.contains(&next) {
                continue;
            }
            let step = manhattan(&here.point, &net.node(next).unwrap().point);
            visited.push(next);
            walk(net, next, to, visited, cost + step, best);
            visited.pop();
        }
    }
    let mut best = f64::INFINITY;
    walk(net, from, to, &mut vec![from], 0.0, &mut best);
    best
}

fn cable_between(net: &TrayNetwork, tag: &str, diameter: f64, from: NodeId, to: NodeId) -> Cable {
    Cable::new(
        tag,
        diameter,
        "LV",
        net.node(from).unwrap().point,
        net.node(to).unwrap().point,
    )
}

#[test]
fn astar_cost_matches_exhaustive_search() {
    init_tracing();
    let Lattice { net, start, goal, .. } = lattice();
    let cable = cable_between(&net, "C1", 0.02, start, goal);
    let route = RouteCable::new(&cable, &SpacingTable::new()).execute(&net).unwrap();

    assert_eq!(route.status, RouteStatus::Complete);
    assert_eq!(route.node_ids.first(), Some(&start));
    assert_eq!(route.node_ids.last(), Some(&goal));
    let optimal = exhaustive_cost(&net, start, goal);
    assert!(
        (route.cost - optimal).abs() < 1e-9,
        "astar {} vs exhaustive {}",
        route.cost,
        optimal
    );
}

#[test]
fn complete_routes_never_cross_short_nodes() {
    init_tracing();
    let base = lattice();
    let diameter = 0.05;
    let mut spacing = SpacingTable::new();
    spacing.insert("LV", "HV", GapSpec::DiameterMultiple(2.0));

    for (k, &blocked) in base.grid.iter().enumerate() {
        let mut net = base.net.clone();
        net.node_mut(blocked).unwrap().available_width = 0.03;
        // A neighbouring node is wide enough for the cable alone but not for
        // the spacing it owes the HV cable already laid there.
        let crowded = base.grid[(k + 1) % base.grid.len()];
        let node = net.node_mut(crowded).unwrap();
        node.available_width = 0.12;
        node.last_cable = Some(LaidCable {
            tag: "HV-0".into(),
            criteria: "HV".into(),
            diameter: 0.04,
        });

        let cable = cable_between(&net, "C1", diameter, base.start, base.goal);
        let route = RouteCable::new(&cable, &spacing).execute(&net).unwrap();
        if route.status != RouteStatus::Complete {
            assert_eq!(route.status, RouteStatus::Degraded, "blocked #{k}");
            continue;
        }
        for &id in &route.node_ids {
            let node = net.node(id).unwrap();
            let required = diameter + spacing.gap_to_laid(&cable, node.last_cable.as_ref());
            assert!(
                node.available_width >= required,
                "blocked #{k}: {} has {} < {}",
                node.tag,
                node.available_width,
                required
            );
        }
    }
}

#[test]
fn narrow_node_is_avoided_or_reported() {
    init_tracing();
    let mut net = TrayNetwork::new();
    let sleeve = |net: &mut TrayNetwork, x: f64| net.add_node(Node::new(p(x, 0.0, 0.0), 0.3, Vector3::z(), NodeKind::Sleeve));
    let plain = |net: &mut TrayNetwork, x: f64, y: f64| {
        net.add_node(Node::new(p(x, y, 0.0), 0.3, Vector3::z(), NodeKind::Segment))
    };
    let s = sleeve(&mut net, 0.0);
    let g = sleeve(&mut net, 12.0);
    let narrow = plain(&mut net, 6.0, 0.0);
    net.node_mut(narrow).unwrap().available_width = 0.03;
    net.connect(s, narrow).unwrap();
    net.connect(narrow, g).unwrap();

    let cable = cable_between(&net, "C1", 0.05, s, g);
    let only_path = RouteCable::new(&cable, &SpacingTable::new()).execute(&net).unwrap();
    assert_eq!(only_path.status, RouteStatus::Degraded);
    assert!(only_path.node_ids.contains(&narrow));

    let detour = plain(&mut net, 6.0, 4.0);
    net.connect(s, detour).unwrap();
    net.connect(detour, g).unwrap();
    let with_detour = RouteCable::new(&cable, &SpacingTable::new()).execute(&net).unwrap();
    assert_eq!(with_detour.status, RouteStatus::Complete);
    assert_eq!(with_detour.node_ids, vec![s, detour, g]);
}

#[test]
fn cable_jumps_between_crossing_trays() {
    init_tracing();
    let layout = vec![
        TraySegment::new("LOW", p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), 0.3, 0.1),
        TraySegment::new("HIGH", p(5.0, -5.0, 0.3), p(5.0, 5.0, 0.3), 0.3, 0.1),
    ];
    let config = RouteConfig {
        landing_candidates: 1,
        ..RouteConfig::default()
    };
    let cable = Cable::new("C1", 0.02, "LV", p(0.5, 0.5, 0.0), p(5.5, 4.5, 0.3));
    let spacing = SpacingTable::new();

    let mut net = BuildNetwork::new(layout).execute().unwrap().network;
    let stranded = RouteCable::new(&cable, &spacing)
        .with_config(config.clone())
        .execute(&net)
        .unwrap();
    assert_eq!(stranded.status, RouteStatus::Partial);

    AugmentJumps::new().execute(&mut net).unwrap();
    let route = RouteCable::new(&cable, &spacing).with_config(config).execute(&net).unwrap();
    assert_eq!(route.status, RouteStatus::Complete);
    let mid_spans = route
        .node_ids
        .iter()
        .filter(|&&id| net.node(id).unwrap().end == Some(EndMarker::MidSpan))
        .count();
    assert_eq!(mid_spans, 2);
}

#[test]
fn spacing_rules_load_from_json() {
    let rules = vec![
        SpacingRule {
            first: "HV".into(),
            second: "LV".into(),
            gap: "2d".into(),
        },
        SpacingRule {
            first: "HV".into(),
            second: "CTRL".into(),
            gap: "0.1".into(),
        },
    ];
    let json = serde_json::to_string(&rules).unwrap();
    let parsed: Vec<SpacingRule> = serde_json::from_str(&json).unwrap();
    let table = SpacingTable::from_rules(&parsed).unwrap();

    assert!((table.required_gap("LV", 0.02, "HV", 0.03) - 0.06).abs() < 1e-12);
    assert!((table.required_gap("CTRL", 0.02, "HV", 0.03) - 0.1).abs() < 1e-12);
    assert!(table.required_gap("LV", 0.02, "CTRL", 0.03).abs() < 1e-12);

    let bad = vec![SpacingRule {
        first: "HV".into(),
        second: "LV".into(),
        gap: "wide".into(),
    }];
    assert!(SpacingTable::from_rules(&bad).is_err());
}

#[test]
fn route_config_accepts_partial_documents() {
    let config: RouteConfig = serde_json::from_str(r#"{ "landing_candidates": 2 }"#).unwrap();
    assert_eq!(config.landing_candidates, 2);
    assert!((config.sleeve_radius - RouteConfig::default().sleeve_radius).abs() < 1e-12);
}
