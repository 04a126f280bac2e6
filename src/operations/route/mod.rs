//! Cable routing over a built tray network.
//!
//! [`RouteCable`] answers one capacity-aware query, [`RouteCables`] routes a
//! list in order and commits capacity as it goes, and [`BidirectionalPath`]
//! is a plain width-constrained node-to-node search.

mod astar;
mod batch;
mod bidirectional;
mod cable;
mod commit;
mod curve;
mod graph;
mod landing;
mod spacing;
mod types;

pub use astar::RouteCable;
pub use batch::RouteCables;
pub use bidirectional::BidirectionalPath;
pub use cable::Cable;
pub use spacing::{GapSpec, SpacingRule, SpacingTable};
pub use types::{CableRoute, NodePath, RouteEnd, RouteStatus};
