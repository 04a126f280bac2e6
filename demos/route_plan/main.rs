//! Route plan: builds a small tray layout, adds jump links and routes a
//! few cables through it, printing each route.
//!
//! Usage:
//! ```text
//! cargo run --example route_plan
//! RUST_LOG=traynet=debug cargo run --example route_plan
//! ```

use traynet::math::Point3;
use traynet::network::{Sleeve, TraySegment};
use traynet::operations::build::BuildNetwork;
use traynet::operations::jump::AugmentJumps;
use traynet::operations::route::{Cable, RouteCables, SpacingRule, SpacingTable};

const SPACING: &str = r#"[
    { "first": "HV", "second": "LV", "gap": "2d" },
    { "first": "HV", "second": "HV", "gap": "0.02" }
]"#;

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// A main run with a tee branch, a return leg on a higher level that
/// crosses the run without touching it, and a wall sleeve.
fn layout() -> (Vec<TraySegment>, Vec<Sleeve>) {
    let segments = vec![
        TraySegment::new("RUN-1", p(0.0, 0.0, 3.0), p(12.0, 0.0, 3.0), 0.6, 0.1),
        TraySegment::new("BR-1", p(6.0, 0.0, 3.0), p(6.0, 8.0, 3.0), 0.3, 0.1),
        TraySegment::new("BR-2", p(6.0, 8.0, 3.0), p(14.0, 8.0, 3.0), 0.3, 0.1),
        TraySegment::new("UP-1", p(10.0, -4.0, 3.4), p(10.0, 10.0, 3.4), 0.3, 0.1).with_route_types(["LV"]),
    ];
    let sleeves = vec![Sleeve::new("WALL-1", p(-0.5, 0.0, 3.0), 0.4)];
    (segments, sleeves)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("traynet=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let (segments, sleeves) = layout();
    let mut build = BuildNetwork::new(segments).with_sleeves(sleeves).execute()?;
    println!(
        "built {} segments ({} isolated), {} bends, {} tees, {} crosses, {} nodes",
        build.segments.len(),
        build.isolated.len(),
        build.bends.len(),
        build.tees.len(),
        build.crosses.len(),
        build.network.node_count(),
    );

    let jumps = AugmentJumps::new().execute(&mut build.network)?;
    println!("jump links: {jumps:?}");

    let rules: Vec<SpacingRule> = serde_json::from_str(SPACING)?;
    let spacing = SpacingTable::from_rules(&rules)?;
    let cables = vec![
        Cable::new("HV-001", 0.045, "HV", p(-1.0, 0.5, 3.0), p(13.5, 8.5, 3.0)),
        Cable::new("LV-001", 0.02, "LV", p(-1.0, 0.5, 3.0), p(10.5, 9.5, 3.4)),
        Cable::new("LV-002", 0.02, "LV", p(40.0, 40.0, 0.0), p(0.0, 0.0, 3.0)),
    ];

    let routes = RouteCables::new(&cables, &spacing).execute(&mut build.network)?;
    for route in &routes {
        println!(
            "{}: {:?} cost {:.2} via [{}]",
            route.cable,
            route.status,
            route.cost,
            route.node_tags.join(" → ")
        );
        if let Some(diagnostic) = &route.diagnostic {
            println!("    {diagnostic}");
        }
        println!("    {} curve points", route.curve_points(0.3, 6).len());
    }
    Ok(())
}
