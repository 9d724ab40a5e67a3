//! Gap item prioritization.
//!
//! Every strategy is a stable sort, so items that compare equal keep their
//! input order.

use std::cmp::Ordering;

use crate::graph::DependencyGraph;
use crate::types::{GapItem, PrioritizationStrategy};

/// Weight of the risk factor in the balanced score.
pub const RISK_WEIGHT: f64 = 0.4;
/// Weight of the (inverted) effort factor in the balanced score.
pub const EFFORT_WEIGHT: f64 = 0.3;
/// Weight of the gap factor in the balanced score.
pub const GAP_WEIGHT: f64 = 0.3;
/// Multiplier for items that depend on nothing.
pub const INDEPENDENT_BOOST: f64 = 1.2;
/// Sort position for items missing from the topological order.
pub const UNORDERED_POSITION: usize = 999;

/// Composite score used by the balanced strategy.
///
/// `0.4 * risk/10 + 0.3 * (10 - effort)/10 + 0.3 * gap/100`, boosted by 1.2
/// when the item has no dependency of its own.
pub fn balanced_score(item: &GapItem, has_dependencies: bool) -> f64 {
    let score = RISK_WEIGHT * (item.risk_score / 10.0)
        + EFFORT_WEIGHT * ((10.0 - item.effort_score) / 10.0)
        + GAP_WEIGHT * (item.gap_score / 100.0);

    if has_dependencies {
        score
    } else {
        score * INDEPENDENT_BOOST
    }
}

/// Orders gap items for scheduling.
pub fn sort_items(
    items: &[GapItem],
    strategy: PrioritizationStrategy,
    graph: &DependencyGraph,
) -> Vec<GapItem> {
    let mut ordered = items.to_vec();

    match strategy {
        PrioritizationStrategy::RiskBased => {
            ordered.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        }
        PrioritizationStrategy::QuickWins => {
            ordered.sort_by(|a, b| {
                a.effort_score
                    .total_cmp(&b.effort_score)
                    .then_with(|| b.gap_score.total_cmp(&a.gap_score))
            });
        }
        PrioritizationStrategy::DependenciesFirst => {
            ordered.sort_by_key(|item| graph.position(&item.id).unwrap_or(UNORDERED_POSITION));
        }
        PrioritizationStrategy::Balanced => {
            let mut scored: Vec<(f64, GapItem)> = ordered
                .into_iter()
                .map(|item| (balanced_score(&item, graph.has_dependencies(&item.id)), item))
                .collect();
            scored.sort_by(|a, b| descending(a.0, b.0));
            ordered = scored.into_iter().map(|(_, item)| item).collect();
        }
    }

    tracing::debug!(
        "Prioritized {} items with {} strategy",
        ordered.len(),
        strategy
    );
    ordered
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DependencyEdge;

    fn scored(id: &str, gap: f64, risk: f64, effort: f64) -> GapItem {
        GapItem::new(id, id).with_scores(gap, risk, effort)
    }

    fn ids(items: &[GapItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_balanced_score_maximum() {
        let item = scored("A", 100.0, 10.0, 0.0);
        assert!((balanced_score(&item, true) - 1.0).abs() < 1e-9);
        assert!((balanced_score(&item, false) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_risk_based_descending() {
        let items = vec![scored("low", 0.0, 2.0, 5.0), scored("high", 0.0, 9.0, 5.0), scored("mid", 0.0, 5.0, 5.0)];
        let graph = DependencyGraph::build(&items, &[]);
        let sorted = sort_items(&items, PrioritizationStrategy::RiskBased, &graph);
        assert_eq!(ids(&sorted), ["high", "mid", "low"]);
    }

    #[test]
    fn test_quick_wins_effort_then_gap() {
        let items = vec![
            scored("hard", 90.0, 5.0, 8.0),
            scored("easy-small", 10.0, 5.0, 2.0),
            scored("easy-big", 60.0, 5.0, 2.0),
        ];
        let graph = DependencyGraph::build(&items, &[]);
        let sorted = sort_items(&items, PrioritizationStrategy::QuickWins, &graph);
        assert_eq!(ids(&sorted), ["easy-big", "easy-small", "hard"]);
    }

    #[test]
    fn test_dependencies_first_follows_topological_order() {
        let items = vec![scored("A", 0.0, 9.0, 1.0), scored("B", 0.0, 1.0, 9.0)];
        let graph = DependencyGraph::build(&items, &[DependencyEdge::new("A", "B")]);
        let sorted = sort_items(&items, PrioritizationStrategy::DependenciesFirst, &graph);
        assert_eq!(ids(&sorted), ["B", "A"]);
    }

    #[test]
    fn test_balanced_rewards_independent_items() {
        // Identical scores; only B carries a dependency
        let items = vec![scored("B", 50.0, 5.0, 5.0), scored("A", 50.0, 5.0, 5.0)];
        let graph = DependencyGraph::build(&items, &[DependencyEdge::new("B", "A")]);
        let sorted = sort_items(&items, PrioritizationStrategy::Balanced, &graph);
        assert_eq!(ids(&sorted), ["A", "B"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![scored("first", 0.0, 5.0, 5.0), scored("second", 0.0, 5.0, 5.0), scored("third", 0.0, 5.0, 5.0)];
        let graph = DependencyGraph::build(&items, &[]);
        for strategy in [
            PrioritizationStrategy::RiskBased,
            PrioritizationStrategy::QuickWins,
            PrioritizationStrategy::DependenciesFirst,
            PrioritizationStrategy::Balanced,
        ] {
            let sorted = sort_items(&items, strategy, &graph);
            assert_eq!(ids(&sorted), ["first", "second", "third"], "strategy {}", strategy);
        }
    }
}
