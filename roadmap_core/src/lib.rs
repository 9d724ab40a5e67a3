//! Roadmap Planning Engine
//!
//! Turns a set of capability gaps into a phased remediation roadmap:
//! - Effort estimation per gap item
//! - Dependency ordering with cycle-tolerant topological sort
//! - Strategy-driven prioritization
//! - Greedy, capacity-bounded phase scheduling
//! - Resource utilization, milestones and recommendations
//!
//! # Quick Start
//!
//! ```rust
//! use roadmap_core::{DependencySnapshot, GapItem, ImplementationStatus, PlanRequest, Planner};
//!
//! let items = vec![
//!     GapItem::new("GV.OC-01", "Organizational context")
//!         .with_status(ImplementationStatus::NotImplemented),
//! ];
//! let plan = Planner::default()
//!     .create_plan(&PlanRequest::new("analysis-1", 3, 2), &items, &DependencySnapshot::default())
//!     .unwrap();
//! assert_eq!(plan.phases.len(), 1);
//! ```

pub mod allocation;
pub mod config;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod milestones;
pub mod planner;
pub mod priority;
pub mod recommend;
pub mod scheduler;
pub mod source;
pub mod types;

// Re-export main types
pub use allocation::{Bottleneck, ResourceAllocation};
pub use config::PlannerConfig;
pub use error::{PlanningError, Result};
pub use estimate::estimate_effort;
pub use graph::{DependencyGraph, DependencyGraphSummary};
pub use milestones::Milestone;
pub use planner::Planner;
pub use priority::{balanced_score, sort_items};
pub use recommend::Recommendations;
pub use scheduler::{schedule, PhaseLayout};
pub use source::{AnalysisDocument, DependencySource, GapItemSource, PlanningService};
pub use types::{
    normalize_function_code, CsfFunction, DependencyEdge, DependencySnapshot, GapItem,
    ImplementationStatus, Phase, PhaseItem, PlanRequest, PlanResponse, PlanResult,
    PrioritizationStrategy, WorkStatus,
};

/// Version of the planning engine crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the planning engine
pub fn init() {
    tracing::info!("Roadmap Planning Engine v{}", VERSION);
}
