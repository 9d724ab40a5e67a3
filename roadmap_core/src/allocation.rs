//! Per-phase resource utilization and bottleneck detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::types::Phase;

/// Why a phase is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bottleneck {
    /// Workload above the over-capacity threshold
    InsufficientResources,
    /// Workload above the high-utilization threshold
    HighUtilization,
}

impl Bottleneck {
    /// Human-readable advice for the flag.
    pub fn message(&self) -> &'static str {
        match self {
            Bottleneck::InsufficientResources => {
                "Insufficient resources — consider extending timeline"
            }
            Bottleneck::HighUtilization => "High resource utilization — limited flexibility",
        }
    }
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Resource picture of one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Phase number
    pub phase_number: u32,
    /// Phase name
    pub phase_name: String,
    /// Effort scheduled into the phase
    pub effort_hours: u32,
    /// Effort per month of the phase
    pub monthly_hours: f64,
    /// Headcount needed to carry the monthly effort
    pub resources_needed: u32,
    /// Headcount available
    pub available_resources: u32,
    /// `resources_needed / available_resources`, as a rounded percentage
    pub workload_percentage: u32,
    /// At most one flag under the current rules
    pub bottlenecks: Vec<Bottleneck>,
}

impl ResourceAllocation {
    /// Whether the phase sits above the high-utilization threshold.
    pub fn is_high_utilization(&self, config: &PlannerConfig) -> bool {
        self.workload_percentage > config.high_utilization_percent
    }
}

/// Classifies a workload percentage.
pub fn classify(workload_percentage: u32, config: &PlannerConfig) -> Option<Bottleneck> {
    if workload_percentage > config.over_capacity_percent {
        Some(Bottleneck::InsufficientResources)
    } else if workload_percentage > config.high_utilization_percent {
        Some(Bottleneck::HighUtilization)
    } else {
        None
    }
}

/// Analyzes a single phase.
pub fn analyze_phase(
    phase: &Phase,
    available_resources: u32,
    config: &PlannerConfig,
) -> ResourceAllocation {
    let months = f64::from(phase.duration_months());
    let monthly_hours = f64::from(phase.effort_hours) / months;
    let resources_needed =
        (monthly_hours / f64::from(config.monthly_hours_per_resource)).ceil() as u32;
    let workload_percentage = if available_resources == 0 {
        0
    } else {
        (f64::from(resources_needed) / f64::from(available_resources) * 100.0).round() as u32
    };

    ResourceAllocation {
        phase_number: phase.number,
        phase_name: phase.name.clone(),
        effort_hours: phase.effort_hours,
        monthly_hours,
        resources_needed,
        available_resources,
        workload_percentage,
        bottlenecks: classify(workload_percentage, config).into_iter().collect(),
    }
}

/// Analyzes every phase of a schedule.
pub fn analyze(
    phases: &[Phase],
    available_resources: u32,
    config: &PlannerConfig,
) -> Vec<ResourceAllocation> {
    let allocation: Vec<ResourceAllocation> = phases
        .iter()
        .map(|phase| analyze_phase(phase, available_resources, config))
        .collect();

    let flagged = allocation.iter().filter(|a| !a.bottlenecks.is_empty()).count();
    if flagged > 0 {
        tracing::info!("{} of {} phases have resource bottlenecks", flagged, allocation.len());
    }
    allocation
}
