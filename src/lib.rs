//! apigen-schema
//!
//! Normalized, typed attribute schemas from HTTP API descriptions.
//!
//! This library turns the operations of an OpenAPI-style document (request
//! bodies, response bodies, parameters, across create/read/update/delete)
//! into one canonical attribute schema per resource or data source. Sources
//! merge in a fixed precedence order - the first source to mention an
//! attribute defines its kind and computability, later sources fill in
//! missing documentation and contribute new attributes - and user-supplied,
//! path-addressed overrides patch the merged result.
//!
//! # Example
//!
//! ```
//! use apigen_schema::{build_attributes, merge, Computability, ComputabilityHint};
//! use serde_json::json;
//!
//! let create_body = json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "tags": { "type": "array", "items": { "type": "string" } }
//!     }
//! });
//! let read_body = json!({
//!     "type": "object",
//!     "properties": {
//!         "id": { "type": "string" },
//!         "name": { "type": "string", "description": "Display name." }
//!     }
//! });
//!
//! let target = build_attributes(&create_body, ComputabilityHint::Inferred, &[]).unwrap();
//! let overlay = build_attributes(&read_body, ComputabilityHint::ForceComputed, &[]).unwrap();
//! let merged = merge(target, vec![overlay]);
//!
//! // "id" is absorbed as a new computed attribute, while "name" keeps its
//! // required computability from the create body and gains the overlay's
//! // description.
//! let name = merged.attributes.get("name").unwrap();
//! assert_eq!(name.computability, Computability::Required);
//! assert_eq!(name.description.as_deref(), Some("Display name."));
//! assert_eq!(
//!     merged.attributes.get("id").unwrap().computability,
//!     Computability::Computed
//! );
//! ```
//!
//! # Merge rules
//!
//! | Situation | Effect |
//! |-----------|--------|
//! | attribute only in a later source | appended after existing attributes |
//! | same name, same kind | target keeps kind/computability; blank description filled |
//! | same name, different kind | target kept, source dropped, conflict recorded |
//! | nested attributes / object element types | merged recursively under the same rules |
//!
//! Overrides differ deliberately: an override's description always replaces
//! the merged one.

mod assembler;
mod attribute;
mod builder;
mod config;
mod element;
mod error;
mod explorer;
mod loader;
mod merge;
mod overrides;
mod render;

pub use assembler::{assemble, AssembledEntity, Assembly, Diagnostic, Severity};
pub use attribute::{
    Attribute, AttributeKind, AttributeList, Computability, COMPUTABILITY_TOKENS,
};
pub use builder::{build_attributes, build_element_type, build_parameter, ComputabilityHint};
pub use config::{
    load_config, parse_config, validate_config, EntityConfig, GeneratorConfig, OverrideConfig,
};
pub use element::{ElementType, ObjectField};
pub use error::{
    BuildError, ConfigError, ConfigViolation, DocumentError, ExploreError, OverrideError,
};
pub use explorer::{explore, OperationRef, OperationView, Parameter};
pub use loader::{
    is_url, json_type_name, load_document, load_document_auto, load_document_str,
    navigate_pointer,
};
pub use merge::{merge, merge_element, KindConflict, Merged};
pub use overrides::{apply_overrides, Override, OverrideOutcome, OverridePath};
pub use render::{render, render_element, render_entity};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
