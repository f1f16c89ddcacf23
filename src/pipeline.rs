//! One planning run, end to end.

use crate::classify::{AuthClassifier, Classification};
use crate::config::PlannerConfig;
use crate::export::{export, ArtifactFormat, PlanArtifact};
use crate::graph::{build_graph, DependencyGraph};
use crate::planner::{ExecutionPlan, ExecutionPlanner};
use crate::schema::{OperationFields, SchemaResolver};
use crate::security::SecurityResolver;
use crate::spec::{build_catalog, load_document, Operation, SpecDocument};
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything a run produced. Built fresh per document and dropped after use.
#[derive(Debug, Clone)]
pub struct PlanRun {
    /// Title slug of the planned document.
    pub slug: String,
    pub operations: Vec<Operation>,
    pub fields: Vec<OperationFields>,
    pub classifications: Vec<Classification>,
    pub graph: DependencyGraph,
    pub plan: ExecutionPlan,
}

impl PlanRun {
    pub fn artifact(&self) -> PlanArtifact {
        export(&self.plan, &self.graph)
    }

    /// `<slug>.plan.<ext>`, the artifact name used when only a directory is given.
    pub fn default_artifact_name(&self, format: ArtifactFormat) -> String {
        format!("{}.plan.{}", self.slug, format.extension())
    }
}

/// Catalog, classify, link and order the operations of `doc`.
pub fn plan_document(doc: &SpecDocument, config: &PlannerConfig) -> PlanRun {
    let catalog = build_catalog(doc);
    info!(
        title = doc.title().unwrap_or("untitled"),
        operations = catalog.operations.len(),
        "operation catalog built"
    );

    let schema = SchemaResolver::new(doc.root());
    let security = SecurityResolver::new(&catalog.security_schemes, config);
    let classifier = AuthClassifier::new(schema, security, &catalog.global_security, config);

    let fields: Vec<OperationFields> = catalog
        .operations
        .iter()
        .map(|op| schema.operation_fields(op))
        .collect();
    let classifications: Vec<Classification> = catalog
        .operations
        .iter()
        .zip(&fields)
        .map(|(op, f)| classifier.classify_with_fields(op, &f.response))
        .collect();
    for (op, class) in catalog.operations.iter().zip(&classifications) {
        debug!(
            operation = %op.id,
            name = op.display_name(),
            producer = class.is_producer,
            protected = class.is_protected,
            "operation classified"
        );
    }
    info!(
        producers = classifications.iter().filter(|c| c.is_producer).count(),
        protected = classifications.iter().filter(|c| c.is_protected).count(),
        "operations classified"
    );

    let graph = build_graph(&catalog.operations, &fields, &classifications);
    let plan = ExecutionPlanner::new()
        .with_max_cycles(config.max_reported_cycles)
        .plan(&graph)
        .with_protected_headers(&catalog.operations, &classifications);

    if plan.is_acyclic() {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "execution order computed"
        );
    } else {
        warn!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = plan.cycles.len(),
            "dependency cycles detected, order is best-effort"
        );
    }

    PlanRun {
        slug: doc.slug(),
        operations: catalog.operations,
        fields,
        classifications,
        graph,
        plan,
    }
}

/// Load `path` and plan it.
pub fn plan_file(path: &Path, config: &PlannerConfig) -> anyhow::Result<PlanRun> {
    let doc = load_document(path)?;
    Ok(plan_document(&doc, config))
}
