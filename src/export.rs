//! Plan artifact.
//!
//! The artifact is the only thing the planner hands to the outside world:
//!
//! ```json
//! {
//!   "status": "ok",
//!   "sequence": ["POST /login", "GET /profile"],
//!   "cycles": [],
//!   "nodes": ["GET /profile", "POST /login"],
//!   "edges": [{ "from": "POST /login", "to": "GET /profile", "reason": "auth" }],
//!   "protected_headers": { "GET /profile": ["Authorization"] }
//! }
//! ```

use crate::graph::{DependencyGraph, GraphEdge};
use crate::planner::ExecutionPlan;
use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Ok,
    CycleDetected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanArtifact {
    pub status: PlanStatus,
    pub sequence: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
    pub protected_headers: BTreeMap<String, Vec<String>>,
}

impl PlanArtifact {
    pub fn is_ok(&self) -> bool {
        self.status == PlanStatus::Ok
    }
}

/// Assemble the artifact. No computation beyond copying.
pub fn export(plan: &ExecutionPlan, graph: &DependencyGraph) -> PlanArtifact {
    PlanArtifact {
        status: if plan.is_acyclic() {
            PlanStatus::Ok
        } else {
            PlanStatus::CycleDetected
        },
        sequence: plan.order.clone(),
        cycles: plan.cycles.clone(),
        nodes: graph.nodes().to_vec(),
        edges: graph.edges().cloned().collect(),
        protected_headers: plan.protected_headers.clone(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ArtifactFormat {
    #[default]
    Json,
    Yaml,
}

impl ArtifactFormat {
    /// Pick a format from an output file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ArtifactFormat::Yaml
            }
            _ => ArtifactFormat::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Yaml => "yaml",
        }
    }
}

/// Render as JSON (four-space indent) or YAML.
pub fn render_artifact(artifact: &PlanArtifact, format: ArtifactFormat) -> anyhow::Result<String> {
    match format {
        ArtifactFormat::Json => {
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            artifact
                .serialize(&mut ser)
                .context("failed to render plan as JSON")?;
            String::from_utf8(buf).context("rendered plan is not UTF-8")
        }
        ArtifactFormat::Yaml => {
            serde_yaml::to_string(artifact).context("failed to render plan as YAML")
        }
    }
}

pub fn write_artifact(
    artifact: &PlanArtifact,
    path: &Path,
    format: ArtifactFormat,
) -> anyhow::Result<()> {
    let mut rendered = render_artifact(artifact, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write plan artifact: {}", path.display()))?;
    info!(path = %path.display(), "plan artifact written");
    Ok(())
}
