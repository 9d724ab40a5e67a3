//! Dependency graph over gap items.
//!
//! Edge direction: A -> B means "A depends on B", so B must be scheduled no
//! later than A. Edges touching ids outside the item set are dropped and kept
//! aside for reporting. The topological order always covers every item
//! exactly once; items caught in (or behind) a cycle are appended in input
//! order and the graph is flagged with `has_cycle`.

use std::collections::{HashMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::types::{DependencyEdge, GapItem};

/// Serializable view of a dependency graph, attached to the plan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraphSummary {
    /// Whether any cycle was found (or reported by the dependency source)
    pub has_cycle: bool,
    /// Every item id exactly once
    pub topological_order: Vec<String>,
    /// Accepted edges, deduplicated, in input order
    pub edges: Vec<DependencyEdge>,
    /// Items forming each cycle, in input order
    pub cycles: Vec<Vec<String>>,
    /// Edges ignored because an endpoint is not a planned item
    pub dangling_edges: Vec<DependencyEdge>,
}

/// Dependency graph with a cycle-tolerant topological order.
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
    edges: Vec<DependencyEdge>,
    dangling: Vec<DependencyEdge>,
    topological_order: Vec<String>,
    positions: HashMap<String, usize>,
    has_cycle: bool,
}

impl DependencyGraph {
    /// Builds the graph and computes its order with Kahn's algorithm.
    pub fn build(items: &[GapItem], edges: &[DependencyEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::with_capacity(items.len());

        for item in items {
            if !node_indices.contains_key(&item.id) {
                let idx = graph.add_node(item.id.clone());
                node_indices.insert(item.id.clone(), idx);
            }
        }

        let mut accepted = Vec::new();
        let mut dangling = Vec::new();
        for edge in edges {
            match (node_indices.get(&edge.from_id), node_indices.get(&edge.to_id)) {
                (Some(&from), Some(&to)) => {
                    // Already exists, no-op
                    if graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                        accepted.push(edge.clone());
                    }
                }
                _ => dangling.push(edge.clone()),
            }
        }

        let (topological_order, has_cycle) = kahn_order(&graph);

        if has_cycle {
            tracing::warn!("Dependency cycle detected among {} items", items.len());
        }
        if !dangling.is_empty() {
            tracing::warn!("Ignoring {} dependency edges with unknown endpoints", dangling.len());
        }

        let positions = index_positions(&topological_order);
        Self {
            graph,
            node_indices,
            edges: accepted,
            dangling,
            topological_order,
            positions,
            has_cycle,
        }
    }

    /// Builds the graph but takes the order from the dependency source.
    ///
    /// The supplied order is normalised to the same contract as a computed
    /// one: unknown and repeated ids are skipped, missing items are appended
    /// in input order. The cycle flag is the supplied flag or a locally
    /// detected cycle.
    pub fn with_precomputed_order(
        items: &[GapItem],
        edges: &[DependencyEdge],
        order: &[String],
        has_cycle: bool,
    ) -> Self {
        let mut built = Self::build(items, edges);

        let mut normalised = Vec::with_capacity(items.len());
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        let known = order
            .iter()
            .filter(|id| built.node_indices.contains_key(*id));
        let remaining = built.graph.node_indices().map(|idx| &built.graph[idx]);
        for id in known.chain(remaining) {
            if seen.insert(id.clone()) {
                normalised.push(id.clone());
            }
        }

        built.positions = index_positions(&normalised);
        built.topological_order = normalised;
        built.has_cycle = built.has_cycle || has_cycle;
        built
    }

    /// Every item id exactly once, prerequisites first where acyclic.
    pub fn topological_order(&self) -> &[String] {
        &self.topological_order
    }

    /// Whether a cycle was detected or reported.
    pub fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    /// Position of an item in the topological order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Accepted edges, in input order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Edges dropped because an endpoint is not a planned item.
    pub fn dangling_edges(&self) -> &[DependencyEdge] {
        &self.dangling
    }

    /// Number of items in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Ids the given item depends on, in input order.
    pub fn dependencies_of(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Ids that depend on the given item, in input order.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Whether the item depends on anything.
    pub fn has_dependencies(&self, id: &str) -> bool {
        self.node_indices
            .get(id)
            .map(|&idx| self.graph.neighbors_directed(idx, Direction::Outgoing).next().is_some())
            .unwrap_or(false)
    }

    /// Detect all cycles, self-loops included.
    ///
    /// Each cycle lists its members in input order; cycles are ordered by
    /// their first member.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();

        cycles
            .into_iter()
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }

    /// Serializable summary for the plan result.
    pub fn summary(&self) -> DependencyGraphSummary {
        DependencyGraphSummary {
            has_cycle: self.has_cycle,
            topological_order: self.topological_order.clone(),
            edges: self.edges.clone(),
            cycles: self.cycles(),
            dangling_edges: self.dangling.clone(),
        }
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort();
        neighbors.into_iter().map(|n| self.graph[n].clone()).collect()
    }
}

/// Kahn's algorithm over "depends on" edges.
///
/// A node becomes ready once all its prerequisites are emitted. Ready nodes
/// leave a FIFO queue: the initially ready nodes are queued in input order,
/// and each emitted node queues its newly ready dependents in input order.
/// A node that becomes ready later can therefore follow one with a higher
/// input index. Nodes never reaching zero pending prerequisites are appended
/// in input order and reported as a cycle.
fn kahn_order(graph: &DiGraph<String, ()>) -> (Vec<String>, bool) {
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Outgoing).count())
        .collect();

    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|idx| pending[idx.index()] == 0)
        .collect();

    let mut emitted = vec![false; graph.node_count()];
    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(idx) = queue.pop_front() {
        emitted[idx.index()] = true;
        order.push(graph[idx].clone());

        let mut dependents: Vec<NodeIndex> =
            graph.neighbors_directed(idx, Direction::Incoming).collect();
        dependents.sort();
        for dependent in dependents {
            let count = &mut pending[dependent.index()];
            *count = count.saturating_sub(1);
            if *count == 0 && !emitted[dependent.index()] {
                queue.push_back(dependent);
            }
        }
    }

    let has_cycle = order.len() < graph.node_count();
    if has_cycle {
        for idx in graph.node_indices() {
            if !emitted[idx.index()] {
                order.push(graph[idx].clone());
            }
        }
    }

    (order, has_cycle)
}

fn index_positions(order: &[String]) -> HashMap<String, usize> {
    order
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.clone(), pos))
        .collect()
}
