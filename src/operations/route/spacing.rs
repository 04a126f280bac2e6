use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError, TraynetError};
use crate::network::LaidCable;

use super::cable::Cable;

/// Required clearance between two cables of given criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GapSpec {
    /// A fixed distance.
    Fixed(f64),
    /// A multiple of the larger of the two cable diameters (`"2d"`).
    DiameterMultiple(f64),
}

impl GapSpec {
    /// Gap between cables of diameters `a` and `b`.
    #[must_use]
    pub fn gap(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Fixed(gap) => gap,
            Self::DiameterMultiple(n) => n * a.max(b),
        }
    }
}

impl FromStr for GapSpec {
    type Err = TraynetError;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        let invalid = |reason: &str| -> TraynetError {
            RoutingError::InvalidSpacing {
                spec: s.to_owned(),
                reason: reason.to_owned(),
            }
            .into()
        };
        let (number, multiple) = match spec.strip_suffix(['d', 'D']) {
            Some(n) => (n.trim(), true),
            None => (spec, false),
        };
        let value: f64 = number.parse().map_err(|_| invalid("not a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid("must be a non-negative finite number"));
        }
        Ok(if multiple {
            Self::DiameterMultiple(value)
        } else {
            Self::Fixed(value)
        })
    }
}

/// One entry of the externally supplied spacing table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingRule {
    pub first: String,
    pub second: String,
    /// `"0.05"` for a fixed gap, `"2d"` for twice the larger diameter.
    pub gap: String,
}

/// Symmetric lookup of the gap required between two route criteria.
#[derive(Debug, Clone, Default)]
pub struct SpacingTable {
    rules: HashMap<(String, String), GapSpec>,
}

impl SpacingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from external rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any gap spec fails to parse.
    pub fn from_rules(rules: &[SpacingRule]) -> Result<Self> {
        let mut table = Self::new();
        for rule in rules {
            table.insert(&rule.first, &rule.second, rule.gap.parse()?);
        }
        Ok(table)
    }

    /// Sets the gap for a criteria pair, in either order.
    pub fn insert(&mut self, first: &str, second: &str, spec: GapSpec) {
        self.rules.insert(Self::key(first, second), spec);
    }

    /// The rule for a criteria pair, if any.
    #[must_use]
    pub fn spec(&self, first: &str, second: &str) -> Option<GapSpec> {
        self.rules.get(&Self::key(first, second)).copied()
    }

    /// Gap required between a cable of (`criteria_a`, `diameter_a`) and one
    /// of (`criteria_b`, `diameter_b`). Pairs without a rule need none.
    #[must_use]
    pub fn required_gap(&self, criteria_a: &str, diameter_a: f64, criteria_b: &str, diameter_b: f64) -> f64 {
        self.spec(criteria_a, criteria_b)
            .map_or(0.0, |spec| spec.gap(diameter_a, diameter_b))
    }

    /// Gap `cable` must keep from the cable last laid in a node. Associated
    /// cables sit together without spacing.
    #[must_use]
    pub fn gap_to_laid(&self, cable: &Cable, laid: Option<&LaidCable>) -> f64 {
        match laid {
            Some(laid) if !cable.is_associated(&laid.tag) => self.required_gap(
                &cable.route_criteria,
                cable.outer_diameter,
                &laid.criteria,
                laid.diameter,
            ),
            _ => 0.0,
        }
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_owned(), b.to_owned())
        } else {
            (b.to_owned(), a.to_owned())
        }
    }
}
