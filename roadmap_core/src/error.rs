//! Error types for roadmap planning.

use thiserror::Error;

/// Main error type for roadmap planning.
///
/// All fallible planning operations return `Result<T> = std::result::Result<T, PlanningError>`.
/// Dependency cycles, dangling edges and capacity overflow are not errors; they are
/// reported through the plan's recommendations and resource allocation.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// No gap items were supplied.
    #[error("No gap items to plan")]
    EmptyGapItems,

    /// A gap item has an empty identifier.
    #[error("Gap item at position {0} has no identifier")]
    MissingIdentifier(usize),

    /// Two gap items share an identifier.
    #[error("Duplicate gap item: {0}")]
    DuplicateItem(String),

    /// A numeric request parameter is outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Request field name
        field: &'static str,
        /// Supplied value
        value: u32,
        /// Inclusive lower bound
        min: u32,
        /// Inclusive upper bound
        max: u32,
    },

    /// Too many gap items for a single planning run.
    #[error("Too many gap items: {count} exceeds limit of {limit}")]
    TooManyItems {
        /// Supplied item count
        count: usize,
        /// Configured cap
        limit: usize,
    },

    /// Too many dependency edges for a single planning run.
    #[error("Too many dependency edges: {count} exceeds limit of {limit}")]
    TooManyEdges {
        /// Supplied edge count
        count: usize,
        /// Configured cap
        limit: usize,
    },

    /// The gap-item source has no analysis with this id.
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    /// Planner configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Type alias for Result with PlanningError.
pub type Result<T> = std::result::Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::DuplicateItem("GV.OC-01".to_string());
        assert_eq!(err.to_string(), "Duplicate gap item: GV.OC-01");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = PlanningError::OutOfRange {
            field: "timeline_months",
            value: 40,
            min: 1,
            max: 36,
        };
        assert_eq!(err.to_string(), "timeline_months must be between 1 and 36, got 40");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: PlanningError = io.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }
}
