use crate::error::NetworkError;
use crate::math::{Point3, Vector3};

/// Raw straight tray section supplied by the geometry source.
#[derive(Debug, Clone)]
pub struct TraySegment {
    pub tag: String,
    pub start: Point3,
    pub end: Point3,
    pub width: f64,
    pub height: f64,
    /// Normal of the tray floor. Degenerate faces are repaired during build.
    pub face: Vector3,
    /// Route criteria this section may carry. Empty means unrestricted.
    pub route_types: Vec<String>,
    /// Update ordinal; among inputs sharing a tag the highest wins.
    pub revision: u64,
}

impl TraySegment {
    /// Creates a section with an upward face, no route restriction and
    /// revision zero.
    #[must_use]
    pub fn new(tag: impl Into<String>, start: Point3, end: Point3, width: f64, height: f64) -> Self {
        Self {
            tag: tag.into(),
            start,
            end,
            width,
            height,
            face: Vector3::z(),
            route_types: Vec::new(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn with_face(mut self, face: Vector3) -> Self {
        self.face = face;
        self
    }

    #[must_use]
    pub fn with_route_types<I, S>(mut self, route_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_types = route_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Checks that the section has finite endpoints and positive dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let finite = |p: &Point3| p.iter().all(|c| c.is_finite());
        if !finite(&self.start) || !finite(&self.end) {
            return Err(NetworkError::InvalidInput(format!("segment {}: non-finite endpoint", self.tag)));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(NetworkError::InvalidInput(format!(
                    "segment {}: {name} must be positive, got {value}",
                    self.tag
                )));
            }
        }
        Ok(())
    }

    /// Centerline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A penetration through a wall or floor where cables enter the network.
#[derive(Debug, Clone)]
pub struct Sleeve {
    pub tag: String,
    pub point: Point3,
    pub width: f64,
    pub face: Vector3,
    pub route_types: Vec<String>,
}

impl Sleeve {
    #[must_use]
    pub fn new(tag: impl Into<String>, point: Point3, width: f64) -> Self {
        Self {
            tag: tag.into(),
            point,
            width,
            face: Vector3::z(),
            route_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_route_types<I, S>(mut self, route_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_types = route_types.into_iter().map(Into::into).collect();
        self
    }
}
