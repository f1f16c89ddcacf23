use anyhow::{bail, Context};
use oas3::OpenApiV3Spec;
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Immutable parsed API description; the root for `$ref` resolution.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    root: Value,
    conforms: bool,
}

impl SpecDocument {
    /// Wrap an already parsed tree.
    ///
    /// The tree is also checked against the strict OpenAPI 3 model. A mismatch
    /// is logged and recorded but never rejects the document: planning only
    /// needs the parts it can read.
    pub fn from_value(root: Value) -> Self {
        let conforms = match serde_json::from_value::<OpenApiV3Spec>(root.clone()) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "document does not match the OpenAPI 3 model; planning continues");
                false
            }
        };
        SpecDocument { root, conforms }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Whether the document deserialized cleanly into the strict OpenAPI model.
    pub fn conforms(&self) -> bool {
        self.conforms
    }

    pub fn title(&self) -> Option<&str> {
        self.root.pointer("/info/title").and_then(Value::as_str)
    }

    /// Lowercase title with non-alphanumerics folded to `_`, or `api` when untitled.
    pub fn slug(&self) -> String {
        let slug = self
            .title()
            .unwrap_or_default()
            .to_lowercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
            .trim_matches('_')
            .to_string();
        if slug.is_empty() {
            "api".to_string()
        } else {
            slug
        }
    }
}

/// Convert a YAML tree into a JSON tree.
///
/// YAML allows non-string mapping keys (`200:` for a status code), so keys are
/// stringified rather than rejected. Tags are dropped and non-finite floats
/// become `null`.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut out = Map::new();
            for (k, v) in mapping {
                out.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_json::to_string(&yaml_to_json(other)).unwrap_or_default(),
    }
}

/// Parse document text. `yaml` selects the YAML reader; otherwise JSON is
/// tried first and YAML second, since YAML is a superset of JSON.
pub fn parse_document(content: &str, yaml: bool) -> anyhow::Result<SpecDocument> {
    let root = if yaml {
        yaml_to_json(serde_yaml::from_str(content).context("invalid YAML document")?)
    } else {
        match serde_json::from_str::<Value>(content) {
            Ok(v) => v,
            Err(json_err) => {
                debug!(error = %json_err, "not JSON, retrying as YAML");
                yaml_to_json(serde_yaml::from_str(content).context("document is neither JSON nor YAML")?)
            }
        }
    };

    if !root.is_object() {
        bail!("API description must be a mapping at the top level");
    }
    Ok(SpecDocument::from_value(root))
}

/// Load an API description from disk, choosing the reader by extension.
pub fn load_document(path: &Path) -> anyhow::Result<SpecDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read API description: {}", path.display()))?;
    let yaml = path
        .extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false);
    parse_document(&content, yaml)
        .with_context(|| format!("failed to parse API description: {}", path.display()))
}
