//! # Spec Module
//!
//! Loads an API description and flattens it into the typed operation catalog
//! every other stage works from. Only this module and the schema resolver look
//! at the raw document tree.

mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::{
    operation_key, Catalog, Operation, ParameterLocation, ParameterMeta, Responses,
    SecurityDeclaration, SecurityRequirement, SecurityScheme, SecuritySchemes,
};
