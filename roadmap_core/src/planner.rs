//! Planning engine - phased roadmap generation from gap items.
//!
//! Wires the dependency graph, prioritization, scheduling, allocation,
//! milestone and recommendation steps into a single stateless call. The
//! same request and inputs always produce the same plan.

use std::collections::HashSet;

use crate::allocation::analyze;
use crate::config::PlannerConfig;
use crate::error::{PlanningError, Result};
use crate::estimate::estimate_effort;
use crate::graph::{DependencyGraph, DependencyGraphSummary};
use crate::milestones::generate_milestones;
use crate::priority::sort_items;
use crate::recommend::{generate_recommendations, RecommendationInput};
use crate::scheduler::{schedule, PhaseLayout};
use crate::types::{DependencySnapshot, GapItem, PlanRequest, PlanResult};

/// Accepted range for `timeline_months`.
pub const TIMELINE_MONTHS: (u32, u32) = (1, 36);
/// Accepted range for `available_resources`.
pub const AVAILABLE_RESOURCES: (u32, u32) = (1, 100);
/// Accepted range for `phase_duration`.
pub const PHASE_DURATION: (u32, u32) = (1, 6);

/// Planner for phased remediation roadmaps.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner, rejecting an invalid configuration.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Builds a complete plan.
    ///
    /// Input errors are reported before any computation. Cycles, dangling
    /// edges and capacity overflow never fail the plan.
    pub fn create_plan(
        &self,
        request: &PlanRequest,
        items: &[GapItem],
        dependencies: &DependencySnapshot,
    ) -> Result<PlanResult> {
        validate_request(request)?;
        self.validate_items(items, dependencies)?;

        let graph = self.dependency_graph(items, dependencies, request.include_dependencies);
        let ordered = sort_items(items, request.prioritization_strategy, &graph);

        let layout = PhaseLayout::from(request);
        let phases = schedule(&ordered, &layout, &graph, &self.config);
        let resource_allocation = analyze(&phases, request.available_resources, &self.config);

        let total_effort_hours: u64 = phases.iter().map(|p| u64::from(p.effort_hours)).sum();
        let estimated_cost = total_effort_hours as f64 * self.config.hourly_rate;

        let milestones = request.include_milestones.then(|| {
            generate_milestones(&phases, request.timeline_months, request.start_date)
        });

        let recommendations = generate_recommendations(
            &RecommendationInput {
                graph: &graph,
                phases: &phases,
                allocation: &resource_allocation,
                timeline_months: request.timeline_months,
                strategy: request.prioritization_strategy,
            },
            &self.config,
        );

        tracing::info!(
            "Planned {} items for analysis {} into {} phases ({} hours, {} strategy)",
            items.len(),
            request.analysis_id,
            phases.len(),
            total_effort_hours,
            request.prioritization_strategy
        );

        Ok(PlanResult {
            analysis_id: request.analysis_id.clone(),
            strategy: request.prioritization_strategy,
            timeline_months: request.timeline_months,
            available_resources: request.available_resources,
            phase_duration: request.phase_duration,
            phases,
            total_effort_hours,
            estimated_cost,
            dependency_graph: request.include_dependencies.then(|| graph.summary()),
            resource_allocation,
            milestones,
            recommendations,
        })
    }

    /// Effort estimate per item, in input order.
    pub fn estimate(&self, items: &[GapItem]) -> Vec<(String, u32)> {
        items
            .iter()
            .map(|item| (item.id.clone(), estimate_effort(item, &self.config)))
            .collect()
    }

    /// Dependency analysis on its own, without scheduling.
    pub fn analyze_dependencies(
        &self,
        items: &[GapItem],
        dependencies: &DependencySnapshot,
    ) -> Result<DependencyGraphSummary> {
        self.validate_items(items, dependencies)?;
        Ok(self.dependency_graph(items, dependencies, true).summary())
    }

    fn dependency_graph(
        &self,
        items: &[GapItem],
        dependencies: &DependencySnapshot,
        include_dependencies: bool,
    ) -> DependencyGraph {
        if !include_dependencies {
            return DependencyGraph::build(items, &[]);
        }

        match &dependencies.topological_order {
            Some(order) => DependencyGraph::with_precomputed_order(
                items,
                &dependencies.edges,
                order,
                dependencies.has_cycle.unwrap_or(false),
            ),
            None => DependencyGraph::build(items, &dependencies.edges),
        }
    }

    fn validate_items(&self, items: &[GapItem], dependencies: &DependencySnapshot) -> Result<()> {
        if items.is_empty() {
            return Err(PlanningError::EmptyGapItems);
        }
        if items.len() > self.config.max_items {
            return Err(PlanningError::TooManyItems {
                count: items.len(),
                limit: self.config.max_items,
            });
        }
        if dependencies.edges.len() > self.config.max_edges {
            return Err(PlanningError::TooManyEdges {
                count: dependencies.edges.len(),
                limit: self.config.max_edges,
            });
        }

        let mut seen = HashSet::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(PlanningError::MissingIdentifier(position));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(PlanningError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(())
    }
}

/// Checks the numeric request parameters against their accepted ranges.
pub fn validate_request(request: &PlanRequest) -> Result<()> {
    check_range("timeline_months", request.timeline_months, TIMELINE_MONTHS)?;
    check_range("available_resources", request.available_resources, AVAILABLE_RESOURCES)?;
    check_range("phase_duration", request.phase_duration, PHASE_DURATION)?;
    Ok(())
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<()> {
    if value < min || value > max {
        return Err(PlanningError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
