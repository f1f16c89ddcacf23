//! Credential producer / consumer classification.
//!
//! An operation is a **producer** when its metadata mentions a producer
//! keyword or its responses carry a credential-looking field. It is
//! **protected** when its effective security requirement is non-empty.
//! Both checks are substring matches over the vocabularies in
//! [`PlannerConfig`], so they over-match. A false positive only adds edges.

use crate::config::PlannerConfig;
use crate::schema::{FieldSet, SchemaResolver};
use crate::security::SecurityResolver;
use crate::spec::{Operation, SecurityDeclaration, SecurityRequirement};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_producer: bool,
    pub is_protected: bool,
    /// Header/query names needed to call the operation. Empty when unprotected,
    /// or when the requirement only names schemes that contribute no header.
    pub required_headers: BTreeSet<String>,
}

pub struct AuthClassifier<'a> {
    schema: SchemaResolver<'a>,
    security: SecurityResolver<'a>,
    global_security: &'a [SecurityRequirement],
    config: &'a PlannerConfig,
}

impl<'a> AuthClassifier<'a> {
    pub fn new(
        schema: SchemaResolver<'a>,
        security: SecurityResolver<'a>,
        global_security: &'a [SecurityRequirement],
        config: &'a PlannerConfig,
    ) -> Self {
        AuthClassifier {
            schema,
            security,
            global_security,
            config,
        }
    }

    pub fn classify(&self, op: &Operation) -> Classification {
        self.classify_with_fields(op, &self.schema.response_fields(op))
    }

    /// Classify `op` given the union of its response fields, when the caller
    /// already computed them.
    pub fn classify_with_fields(
        &self,
        op: &Operation,
        response_fields: &FieldSet,
    ) -> Classification {
        let is_producer = self.has_producer_hint(op)
            || response_fields
                .iter()
                .any(|f| self.config.is_credential_field(f));

        let effective: &[SecurityRequirement] = match &op.security {
            SecurityDeclaration::Required(own) => own,
            SecurityDeclaration::Inherit => self.global_security,
            SecurityDeclaration::Disabled => &[],
        };
        let is_protected = !effective.is_empty();
        let required_headers = if is_protected {
            self.security.resolve_headers(effective)
        } else {
            BTreeSet::new()
        };

        Classification {
            is_producer,
            is_protected,
            required_headers,
        }
    }

    fn has_producer_hint(&self, op: &Operation) -> bool {
        op.tags
            .iter()
            .map(String::as_str)
            .chain(op.operation_id.as_deref())
            .chain(op.summary.as_deref())
            .any(|text| self.config.mentions_producer_keyword(text))
    }
}
