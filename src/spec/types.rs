use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deserialize a field, falling back to its default when the input has the wrong shape.
///
/// The planner must keep going on malformed-but-parseable documents, so every
/// field read from the raw tree goes through this instead of failing the
/// whole operation record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Read a raw JSON fragment into `T`, defaulting on any shape mismatch.
pub(crate) fn lenient_from<T>(value: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    T::deserialize(value).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse the `in` keyword of a parameter object.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Cookie => write!(f, "Cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMeta {
    pub name: String,
    /// `None` when the `in` keyword is missing or unknown.
    pub location: Option<ParameterLocation>,
    pub required: bool,
    pub schema: Option<Value>,
}

/// One entry of a `security` list: scheme name to scopes.
///
/// Only the scheme names matter for planning; scopes are kept as raw values
/// so odd scope lists never invalidate the requirement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SecurityRequirement(pub BTreeMap<String, Value>);

impl SecurityRequirement {
    /// Build a requirement naming the given schemes with no scopes.
    pub fn from_schemes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SecurityRequirement(
            names
                .into_iter()
                .map(|n| (n.into(), Value::Array(Vec::new())))
                .collect(),
        )
    }

    pub fn scheme_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Read a `security` list entry by entry.
///
/// Malformed entries are skipped. A non-empty list whose entries are all
/// malformed still declares security, so it keeps one empty requirement.
/// Anything other than an array yields `None`.
pub(crate) fn security_list(value: &Value) -> Option<Vec<SecurityRequirement>> {
    let entries = value.as_array()?;
    let mut list: Vec<SecurityRequirement> = entries
        .iter()
        .filter_map(|entry| SecurityRequirement::deserialize(entry).ok())
        .collect();
    if list.is_empty() && !entries.is_empty() {
        list.push(SecurityRequirement::default());
    }
    Some(list)
}

fn lenient_security<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<SecurityRequirement>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(security_list(&value))
}

/// How an operation declares its own security.
///
/// OpenAPI distinguishes a missing `security` key (inherit the document
/// default) from an explicit empty list (no security at all).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SecurityDeclaration {
    #[default]
    Inherit,
    Disabled,
    Required(Vec<SecurityRequirement>),
}

impl From<Option<Vec<SecurityRequirement>>> for SecurityDeclaration {
    fn from(raw: Option<Vec<SecurityRequirement>>) -> Self {
        match raw {
            None => SecurityDeclaration::Inherit,
            Some(list) if list.is_empty() => SecurityDeclaration::Disabled,
            Some(list) => SecurityDeclaration::Required(list),
        }
    }
}

/// Entry of `components.securitySchemes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecurityScheme {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub scheme_type: String,
    /// HTTP auth sub-scheme (`bearer`, `basic`, ...).
    #[serde(deserialize_with = "lenient")]
    pub scheme: Option<String>,
    /// Header, query or cookie name for API keys. Some documents also put a
    /// custom header name on bearer schemes.
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "in", deserialize_with = "lenient")]
    pub location: Option<String>,
}

impl SecurityScheme {
    pub fn is_http_bearer(&self) -> bool {
        self.scheme_type.eq_ignore_ascii_case("http")
            && self
                .scheme
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("bearer"))
    }

    pub fn is_api_key(&self) -> bool {
        self.scheme_type.eq_ignore_ascii_case("apikey")
    }
}

pub type SecuritySchemes = BTreeMap<String, SecurityScheme>;

/// Response schemas keyed by status code (`"200"`, `"4XX"`, `"default"`), one
/// entry per declared media type.
pub type Responses = BTreeMap<String, Vec<Value>>;

/// A flattened `(method, path)` pair with everything the planner reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// `"<METHOD> <path>"`, unique within a catalog.
    pub id: String,
    pub method: Method,
    pub path: String,
    pub parameters: Vec<ParameterMeta>,
    /// Request body schemas, one per declared media type.
    pub request_schemas: Vec<Value>,
    pub responses: Responses,
    pub security: SecurityDeclaration,
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
}

impl Operation {
    /// Display name used in logs: summary, then operationId, then the id.
    pub fn display_name(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.operation_id.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Synthesize the operation id for a method and path template.
pub fn operation_key(method: &Method, path: &str) -> String {
    format!("{} {}", method.as_str().to_ascii_uppercase(), path)
}

/// Typed output of the catalog: operations plus the document-wide security data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub operations: Vec<Operation>,
    pub security_schemes: SecuritySchemes,
    pub global_security: Vec<SecurityRequirement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOperation {
    #[serde(deserialize_with = "lenient")]
    pub tags: Vec<Value>,
    #[serde(rename = "operationId", deserialize_with = "lenient")]
    pub operation_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub parameters: Vec<Value>,
    #[serde(rename = "requestBody", deserialize_with = "lenient")]
    pub request_body: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub responses: BTreeMap<String, Value>,
    #[serde(deserialize_with = "lenient_security")]
    pub security: Option<Vec<SecurityRequirement>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawParameter {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "in", deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub required: bool,
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawContainer {
    /// Media type to media object, shared by request bodies and responses.
    #[serde(deserialize_with = "lenient")]
    pub content: BTreeMap<String, Value>,
}
