//! Elementary cycle enumeration (Johnson, 1975).
//!
//! Start nodes are taken in lexicographic id order and each search is limited
//! to nodes that sort at or after the start, so every cycle is reported once,
//! beginning at its smallest id.

use crate::graph::DependencyGraph;
use std::collections::{BTreeSet, VecDeque};

/// Result of a cycle enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Each cycle as node indices, without repeating the start node.
    pub cycles: Vec<Vec<usize>>,
    /// Set when enumeration stopped at the configured limit.
    pub truncated: bool,
}

struct Search<'g> {
    graph: &'g DependencyGraph,
    start: usize,
    /// Nodes of the start node's component in the current subgraph.
    members: Vec<bool>,
    blocked: Vec<bool>,
    block_map: Vec<BTreeSet<usize>>,
    path: Vec<usize>,
    limit: Option<usize>,
    report: CycleReport,
}

impl Search<'_> {
    fn full(&self) -> bool {
        self.limit.is_some_and(|max| self.report.cycles.len() >= max)
    }

    fn circuit(&mut self, v: usize) -> bool {
        let mut found = false;
        self.path.push(v);
        self.blocked[v] = true;

        let graph = self.graph;
        for &w in graph.successors(v) {
            if !self.members[w] {
                continue;
            }
            if w == self.start {
                self.report.cycles.push(self.path.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w) {
                found = true;
            }
            if self.full() {
                self.report.truncated = true;
                break;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for &w in graph.successors(v) {
                if self.members[w] {
                    self.block_map[w].insert(v);
                }
            }
        }
        self.path.pop();
        found
    }

    fn unblock(&mut self, u: usize) {
        self.blocked[u] = false;
        let waiting = std::mem::take(&mut self.block_map[u]);
        for w in waiting {
            if self.blocked[w] {
                self.unblock(w);
            }
        }
    }
}

/// Nodes reachable from `start` (inclusive) following `step`, within `allowed`.
fn reach<'a, F>(start: usize, allowed: &[bool], step: F) -> Vec<bool>
where
    F: Fn(usize) -> &'a BTreeSet<usize>,
{
    let mut seen = vec![false; allowed.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(v) = queue.pop_front() {
        for &w in step(v) {
            if allowed[w] && !seen[w] {
                seen[w] = true;
                queue.push_back(w);
            }
        }
    }
    seen
}

/// Enumerate simple cycles, stopping after `limit` when one is given.
pub fn simple_cycles(graph: &DependencyGraph, limit: Option<usize>) -> CycleReport {
    let n = graph.node_count();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| graph.nodes()[a].cmp(&graph.nodes()[b]));

    let mut report = CycleReport::default();
    if limit == Some(0) {
        return report;
    }

    // allowed[v]: v sorts at or after the current start node
    let mut allowed = vec![true; n];
    for &start in &order {
        let forward = reach(start, &allowed, |v| graph.successors(v));
        let backward = reach(start, &allowed, |v| graph.predecessors(v));
        let members: Vec<bool> = forward
            .iter()
            .zip(&backward)
            .map(|(f, b)| *f && *b)
            .collect();

        let trivial = members.iter().filter(|m| **m).count() == 1
            && !graph.successors(start).contains(&start);
        if !trivial {
            let mut search = Search {
                graph,
                start,
                members,
                blocked: vec![false; n],
                block_map: vec![BTreeSet::new(); n],
                path: Vec::new(),
                limit: limit.map(|max| max - report.cycles.len()),
                report: CycleReport::default(),
            };
            search.circuit(start);
            report.cycles.extend(search.report.cycles);
            if search.report.truncated {
                report.truncated = true;
                break;
            }
        }
        allowed[start] = false;
    }
    report
}
