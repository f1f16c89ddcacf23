use super::load::SpecDocument;
use super::types::{
    lenient_from, operation_key, security_list, Catalog, Operation, ParameterLocation,
    ParameterMeta, RawContainer, RawOperation, RawParameter, Responses, SecurityDeclaration,
    SecurityRequirement, SecuritySchemes,
};
use http::Method;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Path item keys that name operations. Anything else on a path item
/// (`summary`, `servers`, `parameters`, `x-*`) is not an operation.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Upper bound on `$ref` hops when dereferencing a component.
const MAX_REF_HOPS: usize = 32;

/// Resolve a document-local `$ref` (`#/components/schemas/User`) to the node it names.
///
/// Returns `None` for external references (`other.yaml#/...`, URLs) and for
/// pointers that do not exist in the document.
pub fn resolve_local_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    root.pointer(pointer)
}

/// Follow `$ref` chains on a component object (parameter, request body, response).
///
/// Non-reference values are returned as-is. Dangling or cyclic chains yield `None`.
pub fn deref_component<'a>(root: &'a Value, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;
    let mut seen: HashSet<&str> = HashSet::new();
    for _ in 0..MAX_REF_HOPS {
        let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
            return Some(current);
        };
        if !seen.insert(reference) {
            debug!(reference, "cyclic component reference");
            return None;
        }
        match resolve_local_ref(root, reference) {
            Some(next) => current = next,
            None => {
                debug!(reference, "unresolvable component reference");
                return None;
            }
        }
    }
    None
}

/// Extract parameter metadata, resolving `#/components/parameters/*` references.
///
/// Entries without a usable `name` are dropped.
pub fn extract_parameters(root: &Value, params: &[Value]) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let Some(param) = deref_component(root, p) else {
            continue;
        };
        let raw: RawParameter = lenient_from(param);
        let name = match raw.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                debug!("skipping parameter without a name");
                continue;
            }
        };
        out.push(ParameterMeta {
            name,
            location: raw.location.as_deref().and_then(ParameterLocation::parse),
            required: raw.required,
            schema: raw.schema,
        });
    }
    out
}

/// Merge path-level and operation-level parameters.
///
/// An operation parameter replaces a path parameter with the same name and location.
fn merge_parameters(shared: Vec<ParameterMeta>, own: Vec<ParameterMeta>) -> Vec<ParameterMeta> {
    let mut merged: Vec<ParameterMeta> = shared
        .into_iter()
        .filter(|s| {
            !own.iter()
                .any(|o| o.name == s.name && o.location == s.location)
        })
        .collect();
    merged.extend(own);
    merged
}

/// Collect the schema of every media type under a request body or response object.
fn content_schemas(root: &Value, container: &Value) -> Vec<Value> {
    let Some(container) = deref_component(root, container) else {
        return Vec::new();
    };
    let raw: RawContainer = lenient_from(container);
    raw.content
        .values()
        .filter_map(|media| media.get("schema"))
        .filter(|schema| !schema.is_null())
        .cloned()
        .collect()
}

/// Extract the request body schemas of an operation, one per media type.
pub fn extract_request_schemas(root: &Value, request_body: Option<&Value>) -> Vec<Value> {
    request_body
        .map(|body| content_schemas(root, body))
        .unwrap_or_default()
}

/// Extract response schemas for every declared status code.
///
/// Status keys are kept verbatim so `default` and range keys like `2XX`
/// contribute fields too.
pub fn extract_responses(
    root: &Value,
    responses: &std::collections::BTreeMap<String, Value>,
) -> Responses {
    responses
        .iter()
        .map(|(status, resp)| (status.clone(), content_schemas(root, resp)))
        .collect()
}

/// Extract all security schemes from `components.securitySchemes`.
pub fn extract_security_schemes(root: &Value) -> SecuritySchemes {
    root.pointer("/components/securitySchemes")
        .and_then(Value::as_object)
        .map(|schemes| {
            schemes
                .iter()
                .filter_map(|(name, scheme)| {
                    deref_component(root, scheme).map(|s| (name.clone(), lenient_from(s)))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Read the document-level `security` list entry by entry.
///
/// A missing or non-list value means "none".
pub fn extract_global_security(root: &Value) -> Vec<SecurityRequirement> {
    root.get("security")
        .and_then(security_list)
        .unwrap_or_default()
}

fn build_operation(
    root: &Value,
    method: Method,
    path: &str,
    raw_op: &Value,
    shared_params: &[ParameterMeta],
) -> Operation {
    let raw: RawOperation = lenient_from(raw_op);
    let parameters = merge_parameters(
        shared_params.to_vec(),
        extract_parameters(root, &raw.parameters),
    );

    Operation {
        id: operation_key(&method, path),
        method,
        path: path.to_string(),
        parameters,
        request_schemas: extract_request_schemas(root, raw.request_body.as_ref()),
        responses: extract_responses(root, &raw.responses),
        security: SecurityDeclaration::from(raw.security),
        tags: raw
            .tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        operation_id: raw.operation_id,
        summary: raw.summary,
    }
}

/// Flatten a document into one [`Operation`] per `(method, path)` pair.
///
/// This is pure flattening: every verb key under every path becomes a record,
/// even when its body is malformed, so the catalog always mirrors the
/// document's operation set. The first spelling of a duplicated verb
/// (`get` and `GET` on one path) wins.
pub fn build_catalog(doc: &SpecDocument) -> Catalog {
    let root = doc.root();
    let mut operations = Vec::new();
    let mut seen = HashSet::new();

    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let Some(item) = deref_component(root, item).and_then(Value::as_object) else {
                debug!(path = %path, "skipping non-object path item");
                continue;
            };

            let shared_params = item
                .get("parameters")
                .and_then(Value::as_array)
                .map(|params| extract_parameters(root, params))
                .unwrap_or_default();

            for (key, raw_op) in item {
                let verb = key.to_ascii_lowercase();
                if !HTTP_METHODS.contains(&verb.as_str()) {
                    continue;
                }
                let method = match Method::from_bytes(verb.to_ascii_uppercase().as_bytes()) {
                    Ok(m) => m,
                    Err(_) => continue,
                };
                let op = build_operation(root, method, path, raw_op, &shared_params);
                if !seen.insert(op.id.clone()) {
                    warn!(id = %op.id, "duplicate operation key; keeping the first definition");
                    continue;
                }
                operations.push(op);
            }
        }
    }

    Catalog {
        operations,
        security_schemes: extract_security_schemes(root),
        global_security: extract_global_security(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_local_ref_handles_escapes() {
        let root = json!({
            "components": { "schemas": { "a/b": { "type": "string" } } }
        });
        assert!(resolve_local_ref(&root, "#/components/schemas/a~1b").is_some());
        assert!(resolve_local_ref(&root, "#/components/schemas/missing").is_none());
        assert!(resolve_local_ref(&root, "other.yaml#/components/schemas/a").is_none());
    }

    #[test]
    fn test_deref_component_stops_on_cycles() {
        let root = json!({
            "components": { "parameters": {
                "A": { "$ref": "#/components/parameters/B" },
                "B": { "$ref": "#/components/parameters/A" }
            } }
        });
        let start = json!({ "$ref": "#/components/parameters/A" });
        assert!(deref_component(&root, &start).is_none());
    }

    #[test]
    fn test_merge_parameters_operation_wins() {
        let root = json!({});
        let shared = extract_parameters(
            &root,
            &[json!({ "name": "id", "in": "path", "required": true })],
        );
        let own = extract_parameters(
            &root,
            &[
                json!({ "name": "id", "in": "path", "required": false }),
                json!({ "name": "q", "in": "query" }),
            ],
        );
        let merged = merge_parameters(shared, own);
        assert_eq!(merged.len(), 2);
        assert!(!merged[0].required);
        assert_eq!(merged[1].name, "q");
    }

    #[test]
    fn test_global_security_keeps_valid_entries() {
        let root = json!({ "security": [{ "bearerAuth": [] }, "junk"] });
        assert_eq!(
            extract_global_security(&root),
            vec![SecurityRequirement::from_schemes(["bearerAuth"])]
        );
        assert!(extract_global_security(&json!({ "security": { "a": [] } })).is_empty());
        assert!(extract_global_security(&json!({})).is_empty());
    }

    #[test]
    fn test_unnamed_parameters_are_dropped() {
        let params = extract_parameters(&json!({}), &[json!({ "in": "query" }), json!(7)]);
        assert!(params.is_empty());
    }
}
