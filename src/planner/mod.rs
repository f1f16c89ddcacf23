//! # Execution Planner
//!
//! Turns a [`DependencyGraph`] into a call order.
//!
//! The graph is condensed into strongly connected components and the
//! condensation is ordered with Kahn's algorithm, always releasing the ready
//! component whose smallest member id sorts first. Members of a component are
//! emitted in id order. On an acyclic graph every component is a single node,
//! so this is a plain lexicographically tie-broken topological sort. On a
//! cyclic graph it is the best-effort order, and the simple cycles are listed
//! alongside it.

mod cycles;
mod scc;

pub use cycles::{simple_cycles, CycleReport};
pub use scc::strongly_connected_components;

use crate::classify::Classification;
use crate::graph::DependencyGraph;
use crate::spec::Operation;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Ordered operations plus cycle diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub order: Vec<String>,
    /// Whether the graph has any cycle, reported or not.
    pub has_cycle: bool,
    /// Each cycle lists its ids once, starting at the smallest.
    pub cycles: Vec<Vec<String>>,
    /// Set when `max_reported_cycles` hid at least one cycle.
    pub cycles_truncated: bool,
    /// Protected operation id to the header/query names it needs.
    pub protected_headers: BTreeMap<String, Vec<String>>,
}

impl ExecutionPlan {
    /// Decided from the strongly connected components, so a cycle cap of
    /// zero never turns a cyclic graph into an acyclic one.
    pub fn is_acyclic(&self) -> bool {
        !self.has_cycle
    }

    /// Record the required headers of every protected operation.
    pub fn with_protected_headers(
        mut self,
        operations: &[Operation],
        classes: &[Classification],
    ) -> Self {
        self.protected_headers = operations
            .iter()
            .zip(classes)
            .filter(|(_, c)| c.is_protected)
            .map(|(op, c)| {
                let headers: Vec<String> = c.required_headers.iter().cloned().collect();
                (op.id.clone(), headers)
            })
            .collect();
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionPlanner {
    max_cycles: Option<usize>,
}

impl ExecutionPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of reported cycles.
    pub fn with_max_cycles(mut self, max_cycles: Option<usize>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn plan(&self, graph: &DependencyGraph) -> ExecutionPlan {
        let nodes = graph.nodes();
        let components = strongly_connected_components(graph);
        let has_cycle = components.len() < graph.node_count()
            || (0..graph.node_count()).any(|v| graph.successors(v).contains(&v));

        let order: Vec<String> = condensed_order(graph, &components)
            .into_iter()
            .map(|v| nodes[v].clone())
            .collect();

        let mut plan = ExecutionPlan {
            order,
            has_cycle,
            ..Default::default()
        };
        if !has_cycle {
            debug!(operations = plan.order.len(), "graph is acyclic");
            return plan;
        }

        let report = simple_cycles(graph, self.max_cycles);
        plan.cycles = report
            .cycles
            .into_iter()
            .map(|c| c.into_iter().map(|v| nodes[v].clone()).collect())
            .collect();
        // the graph is cyclic, so an empty list means the cap hid every cycle
        plan.cycles_truncated = report.truncated || plan.cycles.is_empty();
        if plan.cycles_truncated {
            warn!(
                reported = plan.cycles.len(),
                "cycle enumeration stopped at max_reported_cycles"
            );
        }
        plan
    }
}

/// Kahn's algorithm over the condensation, as node indices.
fn condensed_order(graph: &DependencyGraph, components: &[Vec<usize>]) -> Vec<usize> {
    let nodes = graph.nodes();
    let mut component_of = vec![0usize; graph.node_count()];
    for (c, members) in components.iter().enumerate() {
        for &v in members {
            component_of[v] = c;
        }
    }

    let mut dag_succ: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
    let mut in_degree = vec![0usize; components.len()];
    for v in 0..graph.node_count() {
        for &w in graph.successors(v) {
            let (cv, cw) = (component_of[v], component_of[w]);
            if cv != cw && dag_succ[cv].insert(cw) {
                in_degree[cw] += 1;
            }
        }
    }

    let mut sorted_members: Vec<Vec<usize>> = components.to_vec();
    for members in &mut sorted_members {
        members.sort_by(|&a, &b| nodes[a].cmp(&nodes[b]));
    }
    // members are non-empty, so the first one is the component's key
    let key = |c: usize| nodes[sorted_members[c][0]].as_str();

    let mut ready: BTreeMap<&str, usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(c, _)| (key(c), c))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some((_, c)) = ready.pop_first() {
        order.extend(sorted_members[c].iter().copied());
        for &next in &dag_succ[c] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(key(next), next);
            }
        }
    }
    order
}
