//! Schema field resolution.
//!
//! Reduces a JSON Schema fragment to the set of property names it can
//! contain. The walk over-approximates on purpose: every branch of
//! `allOf`/`anyOf`/`oneOf` contributes, nested objects contribute their own
//! property names, and array item schemas are flattened into their parent.

use crate::spec::{resolve_local_ref, Operation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Field names derived from one or more schemas. Ordered for stable output.
pub type FieldSet = BTreeSet<String>;

const COMBINATORS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

static PATH_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{([^{}/]+)\}").expect("placeholder regex")
});

/// Resolves schema fragments against the document they came from.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    root: &'a Value,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        SchemaResolver { root }
    }

    /// All field names `node` can contain. `None`, `null` and non-object nodes
    /// resolve to the empty set.
    pub fn resolve(&self, node: Option<&Value>) -> FieldSet {
        let mut out = FieldSet::new();
        if let Some(node) = node {
            let mut visited = HashSet::new();
            self.collect(node, &mut visited, &mut out);
        }
        out
    }

    /// Union of [`resolve`](Self::resolve) over several schemas.
    pub fn resolve_all<'v, I>(&self, nodes: I) -> FieldSet
    where
        I: IntoIterator<Item = &'v Value>,
    {
        let mut out = FieldSet::new();
        let mut visited = HashSet::new();
        for node in nodes {
            self.collect(node, &mut visited, &mut out);
        }
        out
    }

    // `visited` is shared across the whole walk: a reference already expanded
    // cannot add anything new, so revisiting it is skipped rather than treated
    // as an error.
    fn collect(&self, node: &Value, visited: &mut HashSet<String>, out: &mut FieldSet) {
        let Some(obj) = node.as_object() else {
            return;
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            if visited.insert(reference.to_string()) {
                match resolve_local_ref(self.root, reference) {
                    Some(target) => self.collect(target, visited, out),
                    None => trace!(reference, "unresolved schema reference"),
                }
            }
        }

        if let Some(props) = obj.get("properties").and_then(Value::as_object) {
            for (name, prop) in props {
                out.insert(name.clone());
                self.collect(prop, visited, out);
            }
        }

        match obj.get("items") {
            Some(Value::Array(tuple)) => {
                for item in tuple {
                    self.collect(item, visited, out);
                }
            }
            Some(item) => self.collect(item, visited, out),
            None => {}
        }

        if let Some(prefix) = obj.get("prefixItems").and_then(Value::as_array) {
            for item in prefix {
                self.collect(item, visited, out);
            }
        }

        for key in COMBINATORS {
            if let Some(branches) = obj.get(key).and_then(Value::as_array) {
                for branch in branches {
                    self.collect(branch, visited, out);
                }
            }
        }
    }

    /// Fields an operation emits: every response schema across every status
    /// code and media type.
    pub fn response_fields(&self, op: &Operation) -> FieldSet {
        self.resolve_all(op.responses.values().flatten())
    }

    /// Fields an operation consumes: request body schemas, path template
    /// placeholders and declared parameter names.
    pub fn request_fields(&self, op: &Operation) -> FieldSet {
        let mut fields = self.resolve_all(op.request_schemas.iter());
        fields.extend(path_placeholders(&op.path));
        fields.extend(op.parameters.iter().map(|p| p.name.clone()));
        fields
    }

    /// Compute both field sets for an operation.
    pub fn operation_fields(&self, op: &Operation) -> OperationFields {
        OperationFields {
            request: self.request_fields(op),
            response: self.response_fields(op),
        }
    }
}

/// Request and response field sets of one operation, computed once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationFields {
    pub request: FieldSet,
    pub response: FieldSet,
}

/// Names of `{placeholder}` segments in a path template, in order of appearance.
pub fn path_placeholders(path: &str) -> Vec<String> {
    PATH_PLACEHOLDER
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
