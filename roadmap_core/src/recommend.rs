//! Plan recommendations.
//!
//! Four independent lists built from the dependency graph, the schedule and
//! its resource allocation.

use serde::{Deserialize, Serialize};

use crate::allocation::ResourceAllocation;
use crate::config::PlannerConfig;
use crate::graph::DependencyGraph;
use crate::types::{Phase, PrioritizationStrategy};

/// How many leading items are named as priority items.
const PRIORITY_ITEM_COUNT: usize = 3;

/// Categorised recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Cycle and dangling-reference warnings, then the items to start with
    pub critical_dependencies: Vec<String>,
    /// Utilization warnings
    pub resource_constraints: Vec<String>,
    /// Timeline and overload warnings
    pub risk_factors: Vec<String>,
    /// Organisational success factors
    pub success_factors: Vec<String>,
}

/// Everything the recommendations are derived from.
pub struct RecommendationInput<'a> {
    /// Dependency graph used for the plan
    pub graph: &'a DependencyGraph,
    /// Scheduled phases
    pub phases: &'a [Phase],
    /// Allocation per phase
    pub allocation: &'a [ResourceAllocation],
    /// Plan length in months
    pub timeline_months: u32,
    /// Strategy used
    pub strategy: PrioritizationStrategy,
}

/// Builds the four recommendation lists.
pub fn generate_recommendations(
    input: &RecommendationInput<'_>,
    config: &PlannerConfig,
) -> Recommendations {
    Recommendations {
        critical_dependencies: critical_dependencies(input.graph),
        resource_constraints: resource_constraints(input.allocation, config),
        risk_factors: risk_factors(input.phases, input.timeline_months, config),
        success_factors: success_factors(input.strategy),
    }
}

fn critical_dependencies(graph: &DependencyGraph) -> Vec<String> {
    let mut out = Vec::new();

    if graph.has_cycle() {
        let cycles = graph.cycles();
        if cycles.is_empty() {
            out.push(
                "Circular dependencies detected - review and resolve dependency conflicts"
                    .to_string(),
            );
        } else {
            for cycle in cycles {
                out.push(format!(
                    "Circular dependency detected between {} - review and resolve before implementation",
                    cycle.join(", ")
                ));
            }
        }
    }

    let dangling = graph.dangling_edges();
    if !dangling.is_empty() {
        out.push(format!(
            "{} dependencies reference items outside this plan and were ignored",
            dangling.len()
        ));
    }

    let leading: Vec<&str> = graph
        .topological_order()
        .iter()
        .take(PRIORITY_ITEM_COUNT)
        .map(String::as_str)
        .collect();
    if !leading.is_empty() {
        out.push(format!("Priority items to address first: {}", leading.join(", ")));
    }

    out
}

fn resource_constraints(allocation: &[ResourceAllocation], config: &PlannerConfig) -> Vec<String> {
    let high = allocation
        .iter()
        .filter(|a| a.is_high_utilization(config))
        .count();

    if high == 0 {
        return Vec::new();
    }
    vec![format!(
        "{} phase(s) have high resource utilization - consider adding resources or extending the timeline",
        high
    )]
}

fn risk_factors(phases: &[Phase], timeline_months: u32, config: &PlannerConfig) -> Vec<String> {
    let mut out = Vec::new();

    if timeline_months < config.aggressive_timeline_months {
        out.push("Aggressive timeline may impact implementation quality".to_string());
    }
    if phases
        .iter()
        .any(|phase| phase.items.len() > config.max_items_per_phase)
    {
        out.push(
            "Some phases have high item counts - consider breaking work into smaller packages"
                .to_string(),
        );
    }

    out
}

fn success_factors(strategy: PrioritizationStrategy) -> Vec<String> {
    let mut out: Vec<String> = [
        "Executive sponsorship and commitment",
        "Clear communication of security objectives",
        "Regular progress monitoring and reporting",
        "Adequate training and awareness programs",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();

    if strategy == PrioritizationStrategy::QuickWins {
        out.push("Leverage quick wins to build momentum and demonstrate value".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::analyze;
    use crate::scheduler::{schedule, PhaseLayout};
    use crate::types::{DependencyEdge, GapItem, ImplementationStatus};

    fn build(
        items: &[GapItem],
        edges: &[DependencyEdge],
        timeline_months: u32,
        resources: u32,
        strategy: PrioritizationStrategy,
    ) -> Recommendations {
        let config = PlannerConfig::default();
        let graph = DependencyGraph::build(items, edges);
        let layout = PhaseLayout {
            timeline_months,
            phase_duration: 3,
            available_resources: resources,
            start_date: None,
        };
        let phases = schedule(items, &layout, &graph, &config);
        let allocation = analyze(&phases, resources, &config);
        generate_recommendations(
            &RecommendationInput {
                graph: &graph,
                phases: &phases,
                allocation: &allocation,
                timeline_months,
                strategy,
            },
            &config,
        )
    }

    fn items(count: usize) -> Vec<GapItem> {
        (0..count)
            .map(|i| GapItem::new(format!("I{}", i), "").with_status(ImplementationStatus::FullyImplemented))
            .collect()
    }

    #[test]
    fn test_priority_items_named() {
        let recs = build(&items(5), &[], 12, 2, PrioritizationStrategy::Balanced);
        assert_eq!(recs.critical_dependencies, vec!["Priority items to address first: I0, I1, I2"]);
        assert!(recs.resource_constraints.is_empty());
        assert!(recs.risk_factors.is_empty());
        assert_eq!(recs.success_factors.len(), 4);
    }

    #[test]
    fn test_cycle_warning_precedes_priority_items() {
        let edges = [DependencyEdge::new("I0", "I1"), DependencyEdge::new("I1", "I0")];
        let recs = build(&items(3), &edges, 12, 2, PrioritizationStrategy::Balanced);
        assert_eq!(recs.critical_dependencies.len(), 2);
        assert!(recs.critical_dependencies[0].contains("I0, I1"));
        assert!(recs.critical_dependencies[1].starts_with("Priority items"));
    }

    #[test]
    fn test_dangling_edges_reported() {
        let edges = [DependencyEdge::new("I0", "MISSING")];
        let recs = build(&items(2), &edges, 12, 2, PrioritizationStrategy::Balanced);
        assert!(recs.critical_dependencies[0].starts_with("1 dependencies reference items outside"));
    }

    #[test]
    fn test_aggressive_timeline_and_overload() {
        let recs = build(&items(25), &[], 6, 10, PrioritizationStrategy::Balanced);
        assert_eq!(recs.risk_factors.len(), 2);
    }

    #[test]
    fn test_high_utilization_counted() {
        let heavy: Vec<GapItem> = (0..12)
            .map(|i| GapItem::new(format!("H{}", i), "").with_status(ImplementationStatus::NotImplemented))
            .collect();
        // 480 capacity per phase; phase 1 holds 6 x 80 = 480 -> 1 resource of 1 = 100%
        let recs = build(&heavy, &[], 6, 1, PrioritizationStrategy::Balanced);
        assert_eq!(recs.resource_constraints.len(), 1);
        assert!(recs.resource_constraints[0].starts_with("2 phase(s)"));
    }

    #[test]
    fn test_quick_wins_success_factor() {
        let recs = build(&items(1), &[], 12, 2, PrioritizationStrategy::QuickWins);
        assert_eq!(recs.success_factors.len(), 5);
    }
}
