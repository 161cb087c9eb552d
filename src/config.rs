//! Generator configuration - entities, operations, overrides, ignores.
//!
//! Config is plain JSON. The raw document is checked against an embedded
//! JSON Schema before deserialization so violations surface with instance
//! paths instead of serde messages. Dotted override and ignore keys are
//! split into [`OverridePath`]s here, at the boundary - the engines never
//! re-parse strings.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ConfigError, ConfigViolation};
use crate::explorer::OperationRef;
use crate::overrides::{Override, OverridePath};

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, EntityConfig>,
    #[serde(default)]
    pub data_sources: BTreeMap<String, EntityConfig>,
}

/// Configuration for one resource or data source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityConfig {
    pub create: Option<OperationRef>,
    pub read: Option<OperationRef>,
    pub update: Option<OperationRef>,
    pub delete: Option<OperationRef>,
    /// Dotted attribute path -> override.
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideConfig>,
    /// Dotted attribute paths pruned while building.
    #[serde(default)]
    pub ignores: Vec<String>,
}

/// Raw override entry as written in config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideConfig {
    pub description: Option<String>,
    /// Raw token; checked by the override engine so a bad token degrades
    /// one entry instead of failing the whole config.
    pub computed_optional_required: Option<String>,
}

impl EntityConfig {
    /// Override entries with paths pre-split, in sorted key order.
    pub fn override_entries(&self) -> Vec<(OverridePath, Override)> {
        self.overrides
            .iter()
            .map(|(key, entry)| {
                (
                    OverridePath::split(key),
                    Override {
                        description: entry.description.clone(),
                        computability: entry.computed_optional_required.clone(),
                    },
                )
            })
            .collect()
    }

    /// Ignore paths pre-split for the builder.
    pub fn ignore_paths(&self) -> Vec<OverridePath> {
        self.ignores.iter().map(|s| OverridePath::split(s)).collect()
    }
}

/// Load and validate a generator config file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content)
}

/// Parse and validate a generator config from a JSON string.
pub fn parse_config(content: &str) -> Result<GeneratorConfig, ConfigError> {
    let raw: Value =
        serde_json::from_str(content).map_err(|source| ConfigError::InvalidJson { source })?;

    validate_config(&raw)?;

    serde_json::from_value(raw).map_err(|source| ConfigError::InvalidJson { source })
}

/// Validate a raw config document against the embedded config schema.
///
/// Violations are collected with their instance paths; an empty result means
/// the document deserializes cleanly.
pub fn validate_config(raw: &Value) -> Result<(), ConfigError> {
    let schema = config_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Invalid {
        violations: vec![ConfigViolation {
            path: "/".to_string(),
            message: e.to_string(),
        }],
    })?;

    let violations: Vec<ConfigViolation> = validator
        .iter_errors(raw)
        .map(|e| ConfigViolation {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { violations })
    }
}

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "resources": { "$ref": "#/$defs/entities" },
            "data_sources": { "$ref": "#/$defs/entities" }
        },
        "additionalProperties": false,
        "$defs": {
            "entities": {
                "type": "object",
                "additionalProperties": { "$ref": "#/$defs/entity" }
            },
            "entity": {
                "type": "object",
                "properties": {
                    "create": { "$ref": "#/$defs/operation" },
                    "read": { "$ref": "#/$defs/operation" },
                    "update": { "$ref": "#/$defs/operation" },
                    "delete": { "$ref": "#/$defs/operation" },
                    "overrides": {
                        "type": "object",
                        "propertyNames": { "minLength": 1 },
                        "additionalProperties": { "$ref": "#/$defs/override" }
                    },
                    "ignores": {
                        "type": "array",
                        "items": { "type": "string", "minLength": 1 }
                    }
                },
                "additionalProperties": false
            },
            "operation": {
                "type": "object",
                "properties": {
                    "path": { "type": "string", "minLength": 1 },
                    "method": { "type": "string", "minLength": 1 }
                },
                "required": ["path", "method"],
                "additionalProperties": false
            },
            "override": {
                "type": "object",
                "properties": {
                    "description": { "type": "string" },
                    "computed_optional_required": { "type": "string" }
                },
                "additionalProperties": false
            }
        }
    })
}
