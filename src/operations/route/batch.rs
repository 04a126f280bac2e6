use tracing::info;

use crate::cancel::CancelFlag;
use crate::config::RouteConfig;
use crate::error::Result;
use crate::network::TrayNetwork;

use super::astar::RouteCable;
use super::cable::Cable;
use super::spacing::SpacingTable;
use super::types::CableRoute;

/// Routes cables one after another, committing each complete route before
/// the next cable is searched, so allocation follows the input order.
#[derive(Debug, Clone)]
pub struct RouteCables<'a> {
    cables: &'a [Cable],
    spacing: &'a SpacingTable,
    config: RouteConfig,
    cancel: CancelFlag,
}

impl<'a> RouteCables<'a> {
    #[must_use]
    pub fn new(cables: &'a [Cable], spacing: &'a SpacingTable) -> Self {
        Self {
            cables,
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

    /// Returns one route per cable, in input order. Degraded, partial and
    /// unlanded routes are returned but consume no capacity.
    ///
    /// # Errors
    ///
    /// Returns an error on the first invalid cable or on cancellation.
    pub fn execute(&self, network: &mut TrayNetwork) -> Result<Vec<CableRoute>> {
        let mut routes = Vec::with_capacity(self.cables.len());
        for cable in self.cables {
            self.cancel.check()?;
            let route = RouteCable::new(cable, self.spacing)
                .with_config(self.config.clone())
                .with_cancel(self.cancel.clone())
                .execute(network)?;
            if route.is_complete() {
                network.commit_route(&route, cable, self.spacing)?;
            }
            routes.push(route);
        }
        let complete = routes.iter().filter(|r| r.is_complete()).count();
        info!(cables = routes.len(), complete, "cable batch routed");
        Ok(routes)
    }
}
