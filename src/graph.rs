//! # Dependency Graph
//!
//! Directed graph over operation ids. An edge `a -> b` means `a` should run
//! before `b`, either because `a` emits a field `b` consumes (`schema-field`)
//! or because `a` issues credentials `b` needs (`auth`).
//!
//! ## Edge Rules
//!
//! 1. **Schema edges**: `a -> b` for `a != b` whenever the response fields of
//!    `a` intersect the request fields of `b`.
//! 2. **Auth edges**: for each protected `p` with no producer among its
//!    predecessors, every producer other than `p` gets an edge into `p`.
//!
//! Schema edges are all in place before any auth edge is considered, so an
//! existing schema edge from a producer suppresses the auth fan-in.

use crate::classify::Classification;
use crate::schema::OperationFields;
use crate::spec::Operation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace};

/// Why an edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeReason {
    SchemaField,
    Auth,
}

impl std::fmt::Display for EdgeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeReason::SchemaField => write!(f, "schema-field"),
            EdgeReason::Auth => write!(f, "auth"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub reason: EdgeReason,
}

/// Operation dependency graph.
///
/// Nodes keep insertion order; adjacency is index based and ordered so every
/// traversal over it is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: BTreeSet<GraphEdge>,
    successors: Vec<BTreeSet<usize>>,
    predecessors: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index. Re-adding an id returns the existing index.
    pub fn add_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(id);
        self.successors.push(BTreeSet::new());
        self.predecessors.push(BTreeSet::new());
        idx
    }

    /// Add an edge between existing nodes. Returns `false` when either end is
    /// unknown or the `(from, to, reason)` triple is already present.
    pub fn add_edge(&mut self, from: &str, to: &str, reason: EdgeReason) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        let inserted = self.edges.insert(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        });
        if inserted {
            self.successors[a].insert(b);
            self.predecessors[b].insert(a);
        }
        inserted
    }

    pub fn contains_edge(&self, from: &str, to: &str, reason: EdgeReason) -> bool {
        self.edges.contains(&GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        })
    }

    /// Whether any edge, of any reason, runs `from -> to`.
    pub fn has_dependency(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.successors[a].contains(&b),
            _ => false,
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges in `(from, to, reason)` order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct successor indices of node `idx`.
    pub fn successors(&self, idx: usize) -> &BTreeSet<usize> {
        &self.successors[idx]
    }

    /// Distinct predecessor indices of node `idx`.
    pub fn predecessors(&self, idx: usize) -> &BTreeSet<usize> {
        &self.predecessors[idx]
    }
}

/// Build the dependency graph for one planning run.
///
/// `fields` and `classes` are parallel to `operations`.
pub fn build_graph(
    operations: &[Operation],
    fields: &[OperationFields],
    classes: &[Classification],
) -> DependencyGraph {
    debug_assert_eq!(operations.len(), fields.len());
    debug_assert_eq!(operations.len(), classes.len());

    let mut graph = DependencyGraph::new();
    for op in operations {
        graph.add_node(op.id.as_str());
    }

    add_schema_edges(&mut graph, operations, fields);
    add_auth_edges(&mut graph, operations, classes);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "dependency graph built"
    );
    graph
}

fn add_schema_edges(
    graph: &mut DependencyGraph,
    operations: &[Operation],
    fields: &[OperationFields],
) {
    // field name -> indices of operations whose responses contain it
    let mut emitters: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, f) in fields.iter().enumerate() {
        for name in &f.response {
            emitters.entry(name.as_str()).or_default().push(idx);
        }
    }

    for (consumer, f) in fields.iter().enumerate() {
        let mut producers = BTreeSet::new();
        for name in &f.request {
            if let Some(list) = emitters.get(name.as_str()) {
                producers.extend(list.iter().copied().filter(|&p| p != consumer));
            }
        }
        for producer in producers {
            let (from, to) = (&operations[producer].id, &operations[consumer].id);
            if graph.add_edge(from, to, EdgeReason::SchemaField) {
                trace!(from = %from, to = %to, "schema-field edge");
            }
        }
    }
}

fn add_auth_edges(
    graph: &mut DependencyGraph,
    operations: &[Operation],
    classes: &[Classification],
) {
    let producers: BTreeSet<usize> = operations
        .iter()
        .zip(classes)
        .filter(|(_, c)| c.is_producer)
        .filter_map(|(op, _)| graph.node_index(&op.id))
        .collect();
    if producers.is_empty() {
        return;
    }

    for (op, class) in operations.iter().zip(classes) {
        if !class.is_protected {
            continue;
        }
        let Some(target) = graph.node_index(&op.id) else {
            continue;
        };
        if graph
            .predecessors(target)
            .iter()
            .any(|p| producers.contains(p))
        {
            trace!(operation = %op.id, "protected operation already fed by a producer");
            continue;
        }
        let sources: Vec<String> = producers
            .iter()
            .filter(|&&p| p != target)
            .map(|&p| graph.nodes()[p].clone())
            .collect();
        for from in sources {
            if graph.add_edge(&from, &op.id, EdgeReason::Auth) {
                trace!(from = %from, to = %op.id, "auth edge");
            }
        }
    }
}
