//! Effort estimation for gap items.
//!
//! Base hours come from the implementation state; the owning function scales
//! them by its configured multiplier.

use crate::config::PlannerConfig;
use crate::types::{GapItem, ImplementationStatus};

/// Hours used when the implementation state is missing or unrecognised.
pub const FALLBACK_HOURS: f64 = 40.0;

/// Base effort in hours for an implementation state.
pub fn base_hours(status: Option<ImplementationStatus>) -> f64 {
    match status {
        Some(ImplementationStatus::NotImplemented) => 80.0,
        Some(ImplementationStatus::PartiallyImplemented) => 40.0,
        Some(ImplementationStatus::LargelyImplemented) => 20.0,
        Some(ImplementationStatus::FullyImplemented) => 5.0,
        Some(ImplementationStatus::Unknown) | None => FALLBACK_HOURS,
    }
}

/// Estimated effort in whole hours for one gap item.
pub fn estimate_effort(item: &GapItem, config: &PlannerConfig) -> u32 {
    let code = item.function_code();
    let multiplier = config.multiplier_for(code.as_deref());
    let hours = base_hours(item.current_implementation) * multiplier;
    hours.round().max(0.0) as u32
}
