//! Entity assembly - builds, merges, and overrides one schema per entity.
//!
//! For each configured resource and data source, attribute lists are built
//! from the entity's operations, merged in a fixed precedence order, and
//! patched with the entity's overrides. Failures degrade a single source or
//! entity and are collected as diagnostics; nothing here aborts the run.

use serde::Serialize;
use serde_json::Value;

use crate::attribute::AttributeList;
use crate::builder::{build_attributes, build_parameter, ComputabilityHint};
use crate::config::{EntityConfig, GeneratorConfig};
use crate::explorer::{explore, OperationRef, OperationView};
use crate::merge::{merge, Merged};
use crate::overrides::{apply_overrides, OverridePath};

/// Severity level for assembly diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Schema content was dropped or an override failed.
    Warning,
    /// Tolerated but probably unintended (e.g. an override path with no
    /// matching attribute).
    Info,
}

/// A single diagnostic message from assembly.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub entity: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

/// One merged, overridden schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledEntity {
    pub name: String,
    pub attributes: AttributeList,
}

/// Result of assembling every configured entity.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// In sorted-by-name order, for reproducible output.
    pub resources: Vec<AssembledEntity>,
    pub data_sources: Vec<AssembledEntity>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    /// Returns true if assembly produced no warnings.
    pub fn is_clean(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

enum EntityKind {
    Resource,
    DataSource,
}

/// Assemble schemas for every entity in the config.
///
/// Entities are processed in sorted-by-name order (the config maps are
/// ordered), so repeated runs over the same inputs produce identical output.
pub fn assemble(document: &Value, config: &GeneratorConfig) -> Assembly {
    let mut diagnostics = Vec::new();

    let resources = config
        .resources
        .iter()
        .map(|(name, entity)| {
            assemble_entity(document, name, entity, EntityKind::Resource, &mut diagnostics)
        })
        .collect();

    let data_sources = config
        .data_sources
        .iter()
        .map(|(name, entity)| {
            assemble_entity(document, name, entity, EntityKind::DataSource, &mut diagnostics)
        })
        .collect();

    Assembly {
        resources,
        data_sources,
        diagnostics,
    }
}

fn assemble_entity(
    document: &Value,
    name: &str,
    entity: &EntityConfig,
    kind: EntityKind,
    diagnostics: &mut Vec<Diagnostic>,
) -> AssembledEntity {
    let ignores = entity.ignore_paths();
    let mut sources: Vec<AttributeList> = Vec::new();

    match kind {
        EntityKind::Resource => {
            // Precedence: create request body defines the contract, the read
            // response overlays computed state, read parameters and the
            // update request body fill in the rest.
            if let Some(view) = explore_operation(document, name, "create", entity.create.as_ref(), diagnostics) {
                push_body(
                    &mut sources,
                    view.request_body.as_ref(),
                    ComputabilityHint::Inferred,
                    &ignores,
                    name,
                    "create request body",
                    diagnostics,
                );
            }
            if let Some(view) = explore_operation(document, name, "read", entity.read.as_ref(), diagnostics) {
                push_body(
                    &mut sources,
                    view.response_body.as_ref(),
                    ComputabilityHint::ForceComputed,
                    &ignores,
                    name,
                    "read response body",
                    diagnostics,
                );
                push_parameters(&mut sources, &view, &ignores, name, diagnostics);
            }
            if let Some(view) = explore_operation(document, name, "update", entity.update.as_ref(), diagnostics) {
                push_body(
                    &mut sources,
                    view.request_body.as_ref(),
                    ComputabilityHint::Inferred,
                    &ignores,
                    name,
                    "update request body",
                    diagnostics,
                );
            }
        }
        EntityKind::DataSource => {
            // Parameters are the user-facing arguments and take precedence;
            // the read response contributes the computed remainder.
            if let Some(view) = explore_operation(document, name, "read", entity.read.as_ref(), diagnostics) {
                push_parameters(&mut sources, &view, &ignores, name, diagnostics);
                push_body(
                    &mut sources,
                    view.response_body.as_ref(),
                    ComputabilityHint::ForceComputed,
                    &ignores,
                    name,
                    "read response body",
                    diagnostics,
                );
            }
        }
    }

    if sources.is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            entity: name.to_string(),
            message: "no usable schema sources; the generated schema is empty".to_string(),
        });
    }

    let mut iter = sources.into_iter();
    let target = iter.next().unwrap_or_default();
    let Merged {
        mut attributes,
        conflicts,
    } = merge(target, iter.collect());

    for conflict in conflicts {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            entity: name.to_string(),
            message: conflict.to_string(),
        });
    }

    let outcome = apply_overrides(&mut attributes, &entity.override_entries());
    for error in outcome.errors {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            entity: name.to_string(),
            message: error.to_string(),
        });
    }
    for path in outcome.unmatched {
        diagnostics.push(Diagnostic {
            severity: Severity::Info,
            entity: name.to_string(),
            message: format!("override path \"{}\" matches no attribute", path),
        });
    }

    AssembledEntity {
        name: name.to_string(),
        attributes,
    }
}

fn explore_operation(
    document: &Value,
    entity: &str,
    label: &str,
    operation: Option<&OperationRef>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<OperationView> {
    let operation = operation?;
    match explore(document, operation) {
        Ok(view) => Some(view),
        Err(error) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                entity: entity.to_string(),
                message: format!("{} operation skipped: {}", label, error),
            });
            None
        }
    }
}

fn push_body(
    sources: &mut Vec<AttributeList>,
    schema: Option<&Value>,
    hint: ComputabilityHint,
    ignores: &[OverridePath],
    entity: &str,
    label: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(schema) = schema else {
        return;
    };

    match build_attributes(schema, hint, ignores) {
        Ok(attributes) => sources.push(attributes),
        Err(error) => diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            entity: entity.to_string(),
            message: format!("{} skipped: {}", label, error),
        }),
    }
}

fn push_parameters(
    sources: &mut Vec<AttributeList>,
    view: &OperationView,
    ignores: &[OverridePath],
    entity: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut attributes = AttributeList::new();

    for parameter in &view.parameters {
        // Header and cookie parameters are transport detail, not schema.
        if parameter.location != "query" && parameter.location != "path" {
            continue;
        }

        match build_parameter(parameter, ignores) {
            Ok(Some(attribute)) => attributes.push(attribute),
            Ok(None) => {}
            Err(error) => diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                entity: entity.to_string(),
                message: format!("parameter \"{}\" skipped: {}", parameter.name, error),
            }),
        }
    }

    if !attributes.is_empty() {
        sources.push(attributes);
    }
}
