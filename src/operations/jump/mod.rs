mod containment;
mod crossing;
mod dead_end;

use tracing::info;

use crate::cancel::CancelFlag;
use crate::config::JumpConfig;
use crate::error::Result;
use crate::math::intersect_3d::IntersectTolerance;
use crate::network::TrayNetwork;

/// Links added by one [`AugmentJumps`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpReport {
    pub crossings: usize,
    pub dead_ends: usize,
    pub contained: usize,
}

/// Adds virtual connectivity for near misses the builder cannot see:
/// skew crossings within the jump band, dead ends close to other nodes,
/// and nodes sitting inside another segment's volume.
#[derive(Debug, Clone, Default)]
pub struct AugmentJumps {
    config: JumpConfig,
    tolerance: IntersectTolerance,
    cancel: CancelFlag,
}

impl AugmentJumps {
    /// Creates the pass with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: JumpConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the parallel/coplanar tolerances used to classify pairs.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: IntersectTolerance) -> Self {
        self.tolerance = IntersectTolerance {
            end_margin: 0.0,
            ..tolerance
        };
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Executes all three passes on `network` in place.
    ///
    /// # Errors
    ///
    /// Returns [`TraynetError::Cancelled`](crate::TraynetError::Cancelled) if
    /// the cancel flag is raised. Inconsistent lookups are logged and skipped.
    pub fn execute(&self, network: &mut TrayNetwork) -> Result<JumpReport> {
        let crossings = crossing::link_crossings(network, &self.config, &self.tolerance, &self.cancel)?;
        let dead_ends = dead_end::link_dead_ends(network, self.config.dead_end_radius, &self.cancel)?;
        let contained = containment::link_contained(network, &self.config, &self.cancel)?;

        let report = JumpReport {
            crossings,
            dead_ends,
            contained,
        };
        info!(?report, nodes = network.node_count(), "jump connectivity added");
        Ok(report)
    }
}
