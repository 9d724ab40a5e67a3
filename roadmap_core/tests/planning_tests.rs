//! End-to-end planning scenarios
//!
//! Each test drives `Planner::create_plan` the way a caller would.

use roadmap_core::allocation::analyze_phase;
use roadmap_core::*;

fn not_implemented(id: &str) -> GapItem {
    GapItem::new(id, format!("Control {}", id)).with_status(ImplementationStatus::NotImplemented)
}

fn plan(request: &PlanRequest, items: &[GapItem], edges: Vec<DependencyEdge>) -> PlanResult {
    Planner::default()
        .create_plan(request, items, &DependencySnapshot::from_edges(edges))
        .unwrap()
}

/// Single item, no edges, one three-month phase
#[test]
fn test_single_item_single_phase() {
    let request = PlanRequest::new("a1", 3, 2).with_phase_duration(3);
    let result = plan(&request, &[not_implemented("A")], vec![]);

    assert_eq!(result.phases.len(), 1);
    assert_eq!(result.phases[0].number, 1);
    assert_eq!(result.phases[0].name, "Foundation & Quick Wins");
    assert_eq!((result.phases[0].start_month, result.phases[0].end_month), (1, 3));
    assert_eq!(result.phase_of("A"), Some(1));
}

/// B depends on A; one resource, one-month phases, 160 hours each
#[test]
fn test_dependency_forces_later_phase() {
    let request = PlanRequest::new("a1", 2, 1).with_phase_duration(1);
    let items = vec![not_implemented("A"), not_implemented("B")];
    let result = plan(&request, &items, vec![DependencyEdge::new("B", "A")]);

    assert_eq!(result.phases.len(), 2);
    assert_eq!(result.phases[0].capacity_hours, 160);
    assert_eq!(result.phase_of("A"), Some(1));
    assert_eq!(result.phase_of("B"), Some(2));
    // Phase 1 still had 80 hours of headroom
    assert_eq!(result.phases[0].effort_hours, 80);
}

/// The balanced score of a perfect independent item
#[test]
fn test_balanced_score_boost() {
    let item = GapItem::new("A", "A").with_scores(100.0, 10.0, 0.0);
    assert!((balanced_score(&item, false) - 1.2).abs() < 1e-9);
    assert!((balanced_score(&item, true) - 1.0).abs() < 1e-9);
}

/// 80% utilization sits on the exclusive boundary
#[test]
fn test_allocation_boundary() {
    let phase = Phase {
        number: 1,
        name: "Foundation & Quick Wins".to_string(),
        start_month: 1,
        end_month: 3,
        start_date: None,
        end_date: None,
        effort_hours: 1700,
        capacity_hours: 2400,
        resource_count: 5,
        items: Vec::new(),
        status: WorkStatus::Pending,
    };
    let allocation = analyze_phase(&phase, 5, &PlannerConfig::default());

    assert_eq!(allocation.resources_needed, 4);
    assert_eq!(allocation.workload_percentage, 80);
    assert!(allocation.bottlenecks.is_empty());
}

/// A three-item cycle still plans every item
#[test]
fn test_cycle_does_not_abort_planning() {
    let request = PlanRequest::new("a1", 6, 2);
    let items = vec![not_implemented("X"), not_implemented("Y"), not_implemented("Z")];
    let edges = vec![
        DependencyEdge::new("X", "Y"),
        DependencyEdge::new("Y", "Z"),
        DependencyEdge::new("Z", "X"),
    ];
    let result = plan(&request, &items, edges);

    let graph = result.dependency_graph.as_ref().unwrap();
    assert!(graph.has_cycle);
    assert_eq!(graph.topological_order.len(), 3);
    assert_eq!(result.item_count(), 3);
    assert!(result.recommendations.critical_dependencies[0].starts_with("Circular dependency"));
}

/// Overflow lands in the last phase and shows up as a bottleneck
#[test]
fn test_overflow_reported_as_bottleneck() {
    let request = PlanRequest::new("a1", 2, 1).with_phase_duration(1);
    let items: Vec<GapItem> = (0..6).map(|i| not_implemented(&format!("I{}", i))).collect();
    let result = plan(&request, &items, vec![]);

    assert_eq!(result.item_count(), 6);
    let last = &result.phases[1];
    assert_eq!(last.items.len(), 4);
    assert_eq!(last.effort_hours, 320);

    let allocation = &result.resource_allocation[1];
    assert_eq!(allocation.resources_needed, 2);
    assert_eq!(allocation.workload_percentage, 200);
    assert_eq!(allocation.bottlenecks, vec![Bottleneck::InsufficientResources]);
    assert_eq!(result.recommendations.resource_constraints.len(), 1);
}

/// Phases cover the whole timeline with a short final phase
#[test]
fn test_phases_partition_timeline() {
    let request = PlanRequest::new("a1", 10, 3).with_phase_duration(4);
    let result = plan(&request, &[not_implemented("A")], vec![]);

    let spans: Vec<(u32, u32)> = result
        .phases
        .iter()
        .map(|p| (p.start_month, p.end_month))
        .collect();
    assert_eq!(spans, vec![(1, 4), (5, 8), (9, 10)]);
    let names: Vec<&str> = result.phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Foundation & Quick Wins", "Core Implementation", "Optimization & Maturity"]);
    assert!(result.phases.iter().all(|p| p.resource_count == 3));
}

/// Quick wins puts low-effort items in front and adds a success factor
#[test]
fn test_quick_wins_plan() {
    let request = PlanRequest::new("a1", 12, 1)
        .with_phase_duration(1)
        .with_strategy(PrioritizationStrategy::QuickWins);
    let items = vec![
        not_implemented("hard").with_scores(50.0, 5.0, 9.0),
        not_implemented("medium").with_scores(50.0, 5.0, 5.0),
        not_implemented("easy").with_scores(50.0, 5.0, 1.0),
    ];
    let result = plan(&request, &items, vec![]);

    let phase_one: Vec<&str> = result.phases[0].items.iter().map(|i| i.item_id.as_str()).collect();
    assert_eq!(phase_one, vec!["easy", "medium"]);
    assert_eq!(result.phase_of("hard"), Some(2));
    assert!(result
        .recommendations
        .success_factors
        .iter()
        .any(|line| line.contains("quick wins")));
}

/// Cost follows the configured rate
#[test]
fn test_estimated_cost_uses_config_rate() {
    let config = PlannerConfig {
        hourly_rate: 100.0,
        ..PlannerConfig::default()
    };
    let planner = Planner::new(config).unwrap();
    let items = vec![not_implemented("A"), not_implemented("B")];
    let result = planner
        .create_plan(&PlanRequest::new("a1", 6, 1), &items, &DependencySnapshot::default())
        .unwrap();

    assert_eq!(result.total_effort_hours, 160);
    assert_eq!(result.estimated_cost, 16_000.0);
}

/// Calendar dates flow into phases and milestones
#[test]
fn test_start_date_dates_plan() {
    let start = chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
    let request = PlanRequest::new("a1", 12, 2).with_start_date(start);
    let result = plan(&request, &[not_implemented("A")], vec![]);

    assert_eq!(result.phases[3].end_date, chrono::NaiveDate::from_ymd_opt(2027, 12, 31));
    let milestones = result.milestones.as_ref().unwrap();
    assert_eq!(milestones.last().unwrap().target_date, chrono::NaiveDate::from_ymd_opt(2027, 12, 31));
}

/// Out-of-range input is rejected with a structured response
#[test]
fn test_invalid_request_response() {
    let result = Planner::default().create_plan(
        &PlanRequest::new("a1", 12, 2).with_phase_duration(9),
        &[not_implemented("A")],
        &DependencySnapshot::default(),
    );
    let response = PlanResponse::from_result(result);

    assert!(!response.success);
    assert!(response.plan.is_none());
    assert_eq!(response.message, "phase_duration must be between 1 and 6, got 9");
}

/// The plan serializes with snake_case strategy and status values
#[test]
fn test_plan_serializes() {
    let request = PlanRequest::new("a1", 3, 2).with_strategy(PrioritizationStrategy::RiskBased);
    let result = plan(&request, &[not_implemented("A")], vec![]);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["strategy"], "risk_based");
    assert_eq!(json["phases"][0]["status"], "pending");
    assert_eq!(json["phases"][0]["items"][0]["status"], "pending");
    assert!(json["recommendations"]["success_factors"].is_array());
}
