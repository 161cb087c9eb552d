//! Attribute building from JSON Schema nodes.
//!
//! Turns one schema node (request body, response body, or parameter schema)
//! into an attribute tree. Computability is inferred from the schema's
//! `required` arrays unless the caller forces everything computed, as it does
//! for response-derived sources.

use serde_json::{Map, Value};

use crate::attribute::{Attribute, AttributeKind, AttributeList, Computability};
use crate::element::{ElementType, ObjectField};
use crate::error::BuildError;
use crate::explorer::Parameter;
use crate::loader::json_type_name;
use crate::overrides::OverridePath;

/// How to assign computability while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputabilityHint {
    /// `required` members become `Required`, the rest `Optional`.
    Inferred,
    /// Every attribute becomes `Computed` (response-derived sources).
    ForceComputed,
}

/// Build an attribute list from an object schema node.
///
/// `ignores` are dotted attribute paths pruned during the walk: a matched
/// attribute is skipped entirely, and prefixes descend into nested schemas.
///
/// # Errors
///
/// Returns `BuildError` when the node is not an object schema or contains an
/// unsupported construct.
pub fn build_attributes(
    node: &Value,
    hint: ComputabilityHint,
    ignores: &[OverridePath],
) -> Result<AttributeList, BuildError> {
    let Some(map) = node.as_object() else {
        return Err(BuildError::InvalidNode {
            path: String::new(),
            actual: json_type_name(node).to_string(),
        });
    };

    let is_object = map.get("type").and_then(Value::as_str) == Some("object")
        || map.contains_key("properties");
    if !is_object {
        return Err(BuildError::UnsupportedSchema {
            path: String::new(),
            message: "expected an object schema with properties".to_string(),
        });
    }

    let views = ignore_views(ignores);
    build_object_attributes(map, hint, &views, "")
}

/// Build an element type from a schema node.
///
/// Used for the contents of `List`/`Map`/`Set` attributes, where values are
/// typed but not named schema nodes.
pub fn build_element_type(node: &Value) -> Result<ElementType, BuildError> {
    element_type_at(node, "")
}

/// Build a single attribute from a request parameter.
///
/// Required parameters become `Required`; optional ones `ComputedOptional`,
/// since the server may fill them in when the user does not. Returns
/// `Ok(None)` when the parameter is ignored.
pub fn build_parameter(
    parameter: &Parameter,
    ignores: &[OverridePath],
) -> Result<Option<Attribute>, BuildError> {
    let views = ignore_views(ignores);
    if is_ignored(&views, &parameter.name) {
        return Ok(None);
    }

    let child_ignores = narrowed(&views, &parameter.name);
    let kind = build_kind(
        &parameter.schema,
        ComputabilityHint::Inferred,
        &child_ignores,
        &parameter.name,
    )?;

    let computability = if parameter.required {
        Computability::Required
    } else {
        Computability::ComputedOptional
    };

    let mut attribute = Attribute::new(&parameter.name, computability, kind);
    attribute.description = parameter
        .description
        .clone()
        .or_else(|| description_of(&parameter.schema));
    Ok(Some(attribute))
}

fn build_object_attributes(
    map: &Map<String, Value>,
    hint: ComputabilityHint,
    ignores: &[&[String]],
    path: &str,
) -> Result<AttributeList, BuildError> {
    let required = required_names(map);
    let mut attributes = AttributeList::new();

    if let Some(properties) = map.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            if is_ignored(ignores, name) {
                continue;
            }

            let child_path = join_path(path, name);
            let child_ignores = narrowed(ignores, name);
            let kind = build_kind(property, hint, &child_ignores, &child_path)?;

            let computability = match hint {
                ComputabilityHint::ForceComputed => Computability::Computed,
                ComputabilityHint::Inferred => {
                    if required.contains(&name.as_str()) {
                        Computability::Required
                    } else {
                        Computability::Optional
                    }
                }
            };

            let mut attribute = Attribute::new(name, computability, kind);
            attribute.description = description_of(property);
            attributes.push(attribute);
        }
    }

    Ok(attributes)
}

fn build_kind(
    node: &Value,
    hint: ComputabilityHint,
    ignores: &[&[String]],
    path: &str,
) -> Result<AttributeKind, BuildError> {
    let Some(map) = node.as_object() else {
        return Err(BuildError::InvalidNode {
            path: path.to_string(),
            actual: json_type_name(node).to_string(),
        });
    };

    match map.get("type").and_then(Value::as_str) {
        Some("boolean") => Ok(AttributeKind::Bool),
        Some("string") => Ok(AttributeKind::String {
            sensitive: format_of(map) == Some("password"),
        }),
        Some("integer") => Ok(AttributeKind::Int64),
        Some("number") => Ok(match format_of(map) {
            Some("double") | Some("float") => AttributeKind::Float64,
            _ => AttributeKind::Number,
        }),
        Some("object") => {
            if map.contains_key("properties") {
                return Ok(AttributeKind::SingleNested {
                    attributes: build_object_attributes(map, hint, ignores, path)?,
                });
            }
            if let Some(additional) = map.get("additionalProperties") {
                if let Some(additional_map) = additional.as_object() {
                    if additional_map.contains_key("properties") {
                        return Ok(AttributeKind::MapNested {
                            attributes: build_object_attributes(additional_map, hint, ignores, path)?,
                        });
                    }
                    return Ok(AttributeKind::Map {
                        element: element_type_at(additional, path)?,
                    });
                }
            }
            Err(BuildError::UnsupportedSchema {
                path: path.to_string(),
                message: "object schema has neither properties nor additionalProperties"
                    .to_string(),
            })
        }
        Some("array") => {
            let Some(items) = map.get("items") else {
                return Err(BuildError::UnsupportedSchema {
                    path: path.to_string(),
                    message: "array schema is missing items".to_string(),
                });
            };
            let unique = map.get("uniqueItems").and_then(Value::as_bool) == Some(true);

            if items.get("properties").is_some() {
                let Some(items_map) = items.as_object() else {
                    return Err(BuildError::InvalidNode {
                        path: path.to_string(),
                        actual: json_type_name(items).to_string(),
                    });
                };
                let attributes = build_object_attributes(items_map, hint, ignores, path)?;
                return Ok(if unique {
                    AttributeKind::SetNested { attributes }
                } else {
                    AttributeKind::ListNested { attributes }
                });
            }

            let element = element_type_at(items, path)?;
            Ok(if unique {
                AttributeKind::Set { element }
            } else {
                AttributeKind::List { element }
            })
        }
        Some(other) => Err(BuildError::UnsupportedSchema {
            path: path.to_string(),
            message: format!("unsupported type \"{}\"", other),
        }),
        None => Err(BuildError::UnsupportedSchema {
            path: path.to_string(),
            message: "schema has no type".to_string(),
        }),
    }
}

fn element_type_at(node: &Value, path: &str) -> Result<ElementType, BuildError> {
    let Some(map) = node.as_object() else {
        return Err(BuildError::InvalidNode {
            path: path.to_string(),
            actual: json_type_name(node).to_string(),
        });
    };

    match map.get("type").and_then(Value::as_str) {
        Some("boolean") => Ok(ElementType::Bool),
        Some("string") => Ok(ElementType::String),
        Some("integer") => Ok(ElementType::Int64),
        Some("number") => Ok(match format_of(map) {
            Some("double") | Some("float") => ElementType::Float64,
            _ => ElementType::Number,
        }),
        Some("array") => {
            let Some(items) = map.get("items") else {
                return Err(BuildError::UnsupportedSchema {
                    path: path.to_string(),
                    message: "array schema is missing items".to_string(),
                });
            };
            let inner = Box::new(element_type_at(items, path)?);
            if map.get("uniqueItems").and_then(Value::as_bool) == Some(true) {
                Ok(ElementType::Set(inner))
            } else {
                Ok(ElementType::List(inner))
            }
        }
        Some("object") => {
            if let Some(properties) = map.get("properties").and_then(Value::as_object) {
                let mut fields = Vec::new();
                for (name, property) in properties {
                    let child_path = join_path(path, name);
                    fields.push(ObjectField::new(name, element_type_at(property, &child_path)?));
                }
                return Ok(ElementType::Object(fields));
            }
            if let Some(additional) = map.get("additionalProperties") {
                if additional.is_object() {
                    return Ok(ElementType::Map(Box::new(element_type_at(additional, path)?)));
                }
            }
            Err(BuildError::UnsupportedSchema {
                path: path.to_string(),
                message: "object schema has neither properties nor additionalProperties"
                    .to_string(),
            })
        }
        Some(other) => Err(BuildError::UnsupportedSchema {
            path: path.to_string(),
            message: format!("unsupported type \"{}\"", other),
        }),
        None => Err(BuildError::UnsupportedSchema {
            path: path.to_string(),
            message: "schema has no type".to_string(),
        }),
    }
}

fn format_of(map: &Map<String, Value>) -> Option<&str> {
    map.get("format").and_then(Value::as_str)
}

fn description_of(node: &Value) -> Option<String> {
    node.get("description")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn required_names(map: &Map<String, Value>) -> Vec<&str> {
    map.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn ignore_views(ignores: &[OverridePath]) -> Vec<&[String]> {
    ignores.iter().map(|p| p.segments()).collect()
}

fn is_ignored(ignores: &[&[String]], name: &str) -> bool {
    ignores.iter().any(|p| p.len() == 1 && p[0] == name)
}

fn narrowed<'a>(ignores: &[&'a [String]], name: &str) -> Vec<&'a [String]> {
    ignores
        .iter()
        .filter(|p| p.len() > 1 && p[0] == name)
        .map(|p| &p[1..])
        .collect()
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
