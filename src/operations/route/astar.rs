use std::collections::BinaryHeap;

use tracing::{debug, info};

use crate::cancel::CancelFlag;
use crate::config::RouteConfig;
use crate::error::Result;
use crate::network::TrayNetwork;

use super::cable::Cable;
use super::graph::SearchGraph;
use super::landing;
use super::spacing::SpacingTable;
use super::types::{CableRoute, OpenEntry, RouteEnd, RouteStatus};

/// Routes one cable through a network with capacity-aware A*.
///
/// The network is only read. Capacity is consumed separately by
/// [`TrayNetwork::commit_route`], so several queries may run against the same
/// network snapshot.
#[derive(Debug, Clone)]
pub struct RouteCable<'a> {
    cable: &'a Cable,
    spacing: &'a SpacingTable,
    config: RouteConfig,
    cancel: CancelFlag,
}

impl<'a> RouteCable<'a> {
    #[must_use]
    pub fn new(cable: &'a Cable, spacing: &'a SpacingTable) -> Self {
        Self {
            cable,
            spacing,
            config: RouteConfig::default(),
            cancel: CancelFlag::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RouteConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Routes the cable from its start point to its goal point.
    ///
    /// Missing landings, capacity shortfalls and unreachable goals are
    /// reported through [`CableRoute::status`], not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the cable is invalid or the search is cancelled.
    pub fn execute(&self, network: &TrayNetwork) -> Result<CableRoute> {
        let cable = self.cable;
        cable.validate()?;

        let mut graph = SearchGraph::from_network(network, cable, self.spacing);
        let starts = landing::resolve(&mut graph, network, cable, &self.config, &cable.start, RouteEnd::Start);
        if starts.is_empty() {
            return Ok(self.no_landing(RouteEnd::Start));
        }
        let goals = landing::resolve(&mut graph, network, cable, &self.config, &cable.goal, RouteEnd::Goal);
        if goals.is_empty() {
            return Ok(self.no_landing(RouteEnd::Goal));
        }

        let start = graph.add_virtual(cable.start, format!("{}:start", cable.tag));
        let goal = graph.add_virtual(cable.goal, format!("{}:goal", cable.tag));
        for landing in &starts {
            graph.link(start, landing.index);
        }
        for landing in &goals {
            graph.link(landing.index, goal);
        }
        // Both ends on one segment: the cable can run straight along it.
        for s in &starts {
            for g in goals.iter().filter(|g| s.segment.is_some() && g.segment == s.segment) {
                graph.link(s.index, g.index);
            }
        }

        let route = self.search(&graph, start, goal)?;
        info!(
            cable = %cable.tag,
            status = ?route.status,
            hops = route.node_ids.len(),
            cost = route.cost,
            "cable routed"
        );
        Ok(route)
    }

    fn search(&self, graph: &SearchGraph, start: usize, goal: usize) -> Result<CableRoute> {
        let n = graph.nodes.len();
        let mut g = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut closed = vec![false; n];
        let mut open = BinaryHeap::new();

        g[start] = 0.0;
        open.push(OpenEntry {
            key: start,
            cost: 0.0,
            priority: graph.cost(start, goal),
        });

        let mut expanded = 0;
        let mut closest = (start, graph.cost(start, goal));

        while let Some(current) = open.pop() {
            self.cancel.check()?;
            let current = current.key;
            if closed[current] {
                continue;
            }
            closed[current] = true;
            expanded += 1;

            if current == goal {
                return Ok(self.reconstruct(graph, &parent, goal, goal, expanded));
            }

            let remaining = graph.cost(current, goal);
            if remaining < closest.1 {
                closest = (current, remaining);
            }

            for &next in &graph.adjacency[current] {
                let node = &graph.nodes[next];
                if closed[next] || node.excluded {
                    continue;
                }
                let penalty = if node.feasible {
                    0.0
                } else {
                    self.config.infeasible_penalty
                };
                let tentative = g[current] + graph.cost(current, next) + penalty;
                if tentative < g[next] {
                    g[next] = tentative;
                    parent[next] = Some(current);
                    open.push(OpenEntry {
                        key: next,
                        cost: tentative,
                        priority: tentative + graph.cost(next, goal),
                    });
                }
            }
        }

        debug!(
            cable = %self.cable.tag,
            expanded,
            closest = %graph.nodes[closest.0].tag,
            "open set exhausted before reaching the goal"
        );
        Ok(self.reconstruct(graph, &parent, closest.0, goal, expanded))
    }

    fn reconstruct(
        &self,
        graph: &SearchGraph,
        parent: &[Option<usize>],
        terminal: usize,
        goal: usize,
        expanded: usize,
    ) -> CableRoute {
        let mut path = vec![terminal];
        let mut current = terminal;
        while let Some(prev) = parent[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();

        let points: Vec<_> = path.iter().map(|&i| graph.nodes[i].point).collect();
        let cost: f64 = path.windows(2).map(|w| graph.cost(w[0], w[1])).sum();
        let mut node_ids = Vec::new();
        let mut node_tags = Vec::new();
        for node in path.iter().map(|&i| &graph.nodes[i]) {
            if let Some(id) = node.id {
                node_ids.push(id);
                node_tags.push(node.tag.clone());
            }
        }
        let short: Vec<&str> = path
            .iter()
            .map(|&i| &graph.nodes[i])
            .filter(|n| !n.feasible)
            .map(|n| n.tag.as_str())
            .collect();

        let (status, diagnostic) = if terminal != goal {
            let last = &graph.nodes[terminal];
            let remaining = graph.cost(terminal, goal);
            (
                RouteStatus::Partial,
                Some(format!(
                    "goal unreachable for cable {}; stopped at {} ({:.3} from goal) after {} hops",
                    self.cable.tag,
                    last.tag,
                    remaining,
                    node_ids.len()
                )),
            )
        } else if short.is_empty() {
            (RouteStatus::Complete, None)
        } else {
            (
                RouteStatus::Degraded,
                Some(format!(
                    "cable {} passes {} node(s) without capacity: {}",
                    self.cable.tag,
                    short.len(),
                    short.join(", ")
                )),
            )
        };

        CableRoute {
            cable: self.cable.tag.clone(),
            status,
            node_ids,
            node_tags,
            points,
            cost,
            expanded,
            diagnostic,
        }
    }

    fn no_landing(&self, end: RouteEnd) -> CableRoute {
        let point = match end {
            RouteEnd::Start => self.cable.start,
            RouteEnd::Goal => self.cable.goal,
        };
        let diagnostic = format!(
            "no eligible landing for cable {} near its {end} ({:.3}, {:.3}, {:.3}): \
             no sleeve within {} and no accepting segment within {}",
            self.cable.tag, point.x, point.y, point.z, self.config.sleeve_radius, self.config.segment_radius
        );
        info!(cable = %self.cable.tag, %end, "no landing");
        CableRoute::empty(&self.cable.tag, RouteStatus::NoLanding(end), diagnostic)
    }
}
