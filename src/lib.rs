//! # apiseq
//!
//! **apiseq** reads an [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0) document and works out
//! the order in which its operations can be called: an operation that returns a field another
//! operation consumes runs first, and credential-issuing operations run before the protected
//! operations that need their tokens.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Document loading and the flattened operation catalog
//! - **[`schema`]** - Field-name resolution over JSON Schema fragments
//! - **[`security`]** - Security requirement to header-name mapping
//! - **[`classify`]** - Credential producer / protected operation classification
//! - **[`graph`]** - Dependency graph construction
//! - **[`planner`]** - Topological ordering, cycle enumeration and best-effort order
//! - **[`export`]** - Plan artifact serialization
//! - **[`pipeline`]** - The whole chain for one document
//! - **[`config`]** - Tunable classifier vocabulary
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `apiseq` command line
//!
//! ### Planning Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(apiseq plan)
//!     participant Load as spec::load_document
//!     participant Catalog as spec::build_catalog
//!     participant Classify as classify::AuthClassifier
//!     participant Graph as graph::build_graph
//!     participant Planner as planner::ExecutionPlanner
//!     participant Export as export::write_artifact
//!
//!     CLI->>Load: load_document("openapi.yaml")
//!     Load-->>CLI: SpecDocument
//!     CLI->>Catalog: build_catalog(&doc)
//!     Catalog-->>CLI: Catalog { operations, schemes, global security }
//!     CLI->>Classify: classify each operation
//!     Classify-->>CLI: Vec<Classification>
//!     CLI->>Graph: build_graph(ops, fields, classes)
//!     Graph->>Graph: schema-field edges
//!     Graph->>Graph: auth edges
//!     Graph-->>CLI: DependencyGraph
//!     CLI->>Planner: plan(&graph)
//!     Planner-->>CLI: ExecutionPlan { order, cycles }
//!     CLI->>Export: write_artifact(plan.json)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apiseq::{load_document, plan_document, PlannerConfig};
//!
//! let doc = load_document("openapi.yaml".as_ref())?;
//! let run = plan_document(&doc, &PlannerConfig::default());
//! for id in &run.plan.order {
//!     println!("{id}");
//! }
//! ```
//!
//! ## Determinism
//!
//! Every collection that reaches the output is ordered: nodes follow catalog order, edges are
//! sorted by `(from, to, reason)`, ties in the execution order break on the smallest id and cycles
//! start at their smallest id. The same document and configuration always give the same artifact.

pub mod classify;
pub mod cli;
pub mod config;
pub mod export;
pub mod graph;
pub mod logging;
pub mod pipeline;
pub mod planner;
pub mod schema;
pub mod security;
pub mod spec;

pub use classify::{AuthClassifier, Classification};
pub use config::{load_planner_config, PlannerConfig};
pub use export::{export, render_artifact, write_artifact, ArtifactFormat, PlanArtifact, PlanStatus};
pub use graph::{build_graph, DependencyGraph, EdgeReason, GraphEdge};
pub use pipeline::{plan_document, plan_file, PlanRun};
pub use planner::{ExecutionPlan, ExecutionPlanner};
pub use schema::{FieldSet, OperationFields, SchemaResolver};
pub use security::SecurityResolver;
pub use spec::{build_catalog, load_document, parse_document, Catalog, Operation, SpecDocument};
