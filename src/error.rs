use thiserror::Error;

/// Top-level error type for tray network construction and routing.
#[derive(Debug, Error)]
pub enum TraynetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("operation cancelled")]
    Cancelled,
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the segment/node arena.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to cable routing.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid cable {tag}: {reason}")]
    InvalidCable { tag: String, reason: String },

    #[error("invalid spacing spec {spec:?}: {reason}")]
    InvalidSpacing { spec: String, reason: String },

    #[error("route for cable {0} is not complete and cannot be committed")]
    IncompleteRoute(String),
}

/// Convenience type alias for results using [`TraynetError`].
pub type Result<T> = std::result::Result<T, TraynetError>;
