//! # Security Module
//!
//! Maps OpenAPI `security` requirement lists to the concrete header or query
//! parameter names a caller has to fill in.
//!
//! ## Supported Schemes
//!
//! | Scheme | Contributes |
//! |--------|-------------|
//! | `http` + `bearer` | declared `name`, else the configured bearer header (`Authorization`) |
//! | `apiKey` | declared `name`, else the configured API-key name (`X-API-KEY`) |
//!
//! Every other scheme type, and any requirement naming a scheme missing from
//! `components.securitySchemes`, is skipped. A malformed document must not stop
//! planning.

use crate::config::PlannerConfig;
use crate::spec::{SecurityRequirement, SecurityScheme, SecuritySchemes};
use std::collections::BTreeSet;
use tracing::debug;

/// Resolves requirement lists against the document's scheme registry.
#[derive(Debug, Clone, Copy)]
pub struct SecurityResolver<'a> {
    schemes: &'a SecuritySchemes,
    config: &'a PlannerConfig,
}

impl<'a> SecurityResolver<'a> {
    pub fn new(schemes: &'a SecuritySchemes, config: &'a PlannerConfig) -> Self {
        SecurityResolver { schemes, config }
    }

    /// Header/query names that satisfy any scheme named in `requirements`.
    pub fn resolve_headers(&self, requirements: &[SecurityRequirement]) -> BTreeSet<String> {
        let mut headers = BTreeSet::new();
        for requirement in requirements {
            for name in requirement.scheme_names() {
                match self.schemes.get(name) {
                    Some(scheme) => {
                        if let Some(header) = self.header_for(scheme) {
                            headers.insert(header);
                        }
                    }
                    None => debug!(scheme = name, "security requirement names an unknown scheme"),
                }
            }
        }
        headers
    }

    fn header_for(&self, scheme: &SecurityScheme) -> Option<String> {
        let declared = scheme.name.as_deref().filter(|n| !n.is_empty());
        if scheme.is_http_bearer() {
            Some(
                declared
                    .unwrap_or(&self.config.default_bearer_header)
                    .to_string(),
            )
        } else if scheme.is_api_key() {
            Some(
                declared
                    .unwrap_or(&self.config.default_api_key_name)
                    .to_string(),
            )
        } else {
            None
        }
    }
}
