use crate::error::{Result, RoutingError};
use crate::math::Point3;
use crate::network::Node;

/// A cable to be routed through the tray network.
#[derive(Debug, Clone)]
pub struct Cable {
    pub tag: String,
    pub outer_diameter: f64,
    /// Route criteria class; nodes and segments must accept it.
    pub route_criteria: String,
    /// Tags of cables this one must never share a node with.
    pub excluded: Vec<String>,
    /// Tags of cables this one may be laid against without spacing.
    pub associated: Vec<String>,
    pub start: Point3,
    pub goal: Point3,
}

impl Cable {
    #[must_use]
    pub fn new(
        tag: impl Into<String>,
        outer_diameter: f64,
        route_criteria: impl Into<String>,
        start: Point3,
        goal: Point3,
    ) -> Self {
        Self {
            tag: tag.into(),
            outer_diameter,
            route_criteria: route_criteria.into(),
            excluded: Vec::new(),
            associated: Vec::new(),
            start,
            goal,
        }
    }

    #[must_use]
    pub fn with_excluded<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_associated<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associated = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that the cable can be routed at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the diameter is not a positive finite number or
    /// an endpoint is not finite.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| RoutingError::InvalidCable {
            tag: self.tag.clone(),
            reason: reason.to_owned(),
        };
        if !self.outer_diameter.is_finite() || self.outer_diameter <= 0.0 {
            return Err(invalid("outer diameter must be positive").into());
        }
        let finite = |p: &Point3| p.iter().all(|c| c.is_finite());
        if !finite(&self.start) || !finite(&self.goal) {
            return Err(invalid("start and goal must be finite").into());
        }
        Ok(())
    }

    /// Returns `true` if this cable may sit against `other` without spacing.
    #[must_use]
    pub fn is_associated(&self, other: &str) -> bool {
        self.tag == other || self.associated.iter().any(|t| t == other)
    }

    /// Returns `true` if `node` already carries a cable this one excludes.
    #[must_use]
    pub fn avoids(&self, node: &Node) -> bool {
        node.carries_any(&self.excluded)
    }
}
