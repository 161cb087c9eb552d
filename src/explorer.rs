//! Operation lookup inside an API description document.
//!
//! Locates the request body, response body, and parameters for one HTTP
//! operation, with intra-document `$ref` pointers resolved so downstream
//! building sees self-contained schema nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExploreError;
use crate::loader::navigate_pointer;

/// Reference to one HTTP operation in the document, as named by config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRef {
    /// Path template, e.g. `/pets/{id}`.
    pub path: String,
    /// HTTP method; matched case-insensitively.
    pub method: String,
}

/// A request parameter attached to an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// Where the parameter lives: `query`, `path`, `header`, or `cookie`.
    pub location: String,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Value,
}

/// The schema-bearing pieces of one operation, refs resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationView {
    /// `requestBody` JSON schema, when the operation declares one.
    pub request_body: Option<Value>,
    /// Schema of the first 2xx response with a JSON body.
    pub response_body: Option<Value>,
    /// Operation-level parameters first, then path-item-level ones that the
    /// operation does not redeclare.
    pub parameters: Vec<Parameter>,
}

/// Locate an operation and extract its schema-bearing pieces.
///
/// Absent pieces (no request body, no JSON response) are `None`/empty, not
/// errors; only an unknown path/method or an unresolvable `$ref` fails.
pub fn explore(document: &Value, operation: &OperationRef) -> Result<OperationView, ExploreError> {
    let path_item = document
        .get("paths")
        .and_then(|paths| paths.get(&operation.path))
        .ok_or_else(|| ExploreError::UnknownPath {
            path: operation.path.clone(),
        })?;

    let method = operation.method.to_lowercase();
    let node = path_item
        .get(&method)
        .ok_or_else(|| ExploreError::UnknownMethod {
            path: operation.path.clone(),
            method: method.clone(),
        })?;

    let mut node = node.clone();
    resolve_refs(document, &mut node, &mut Vec::new())?;

    let mut parameters = collect_parameters(&node);

    // Path-item-level parameters apply to every operation on the path; the
    // operation wins when it redeclares a name.
    if let Some(shared) = path_item.get("parameters") {
        let mut shared = shared.clone();
        resolve_refs(document, &mut shared, &mut Vec::new())?;
        for parameter in parse_parameters(&shared) {
            if !parameters.iter().any(|p| p.name == parameter.name) {
                parameters.push(parameter);
            }
        }
    }

    Ok(OperationView {
        request_body: request_body_schema(&node),
        response_body: response_body_schema(&node),
        parameters,
    })
}

fn request_body_schema(operation: &Value) -> Option<Value> {
    operation
        .get("requestBody")
        .and_then(|body| media_schema(body.get("content")?))
        .cloned()
}

fn response_body_schema(operation: &Value) -> Option<Value> {
    let responses = operation.get("responses")?.as_object()?;
    responses
        .iter()
        .filter(|(status, _)| status.starts_with('2'))
        .find_map(|(_, response)| media_schema(response.get("content")?))
        .cloned()
}

fn media_schema(content: &Value) -> Option<&Value> {
    content.get("application/json")?.get("schema")
}

fn collect_parameters(operation: &Value) -> Vec<Parameter> {
    operation
        .get("parameters")
        .map(parse_parameters)
        .unwrap_or_default()
}

fn parse_parameters(node: &Value) -> Vec<Parameter> {
    let Some(items) = node.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?.to_string();
            let schema = item.get("schema")?.clone();
            Some(Parameter {
                name,
                location: item
                    .get("in")
                    .and_then(Value::as_str)
                    .unwrap_or("query")
                    .to_string(),
                required: item
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                description: item
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                schema,
            })
        })
        .collect()
}

/// Recursively inline intra-document `$ref` pointers, in place.
///
/// Sibling keys next to a `$ref` are kept, with the referenced object's keys
/// filled in around them. External references are rejected: documents are
/// expected to be self-contained.
fn resolve_refs(
    document: &Value,
    node: &mut Value,
    visited: &mut Vec<String>,
) -> Result<(), ExploreError> {
    let reference = match node {
        Value::Object(map) => map.get("$ref").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    };

    if let Some(reference) = reference {
        if !reference.starts_with('#') {
            return Err(ExploreError::BadReference {
                reference,
                message: "external references are not supported".to_string(),
            });
        }
        if visited.contains(&reference) {
            return Err(ExploreError::CircularReference { reference });
        }

        let mut resolved =
            navigate_pointer(document, &reference)
                .map_err(|e| ExploreError::BadReference {
                    reference: reference.clone(),
                    message: e.to_string(),
                })?
                .clone();

        visited.push(reference);
        resolve_refs(document, &mut resolved, visited)?;
        visited.pop();

        if let Value::Object(fields) = resolved {
            if let Some(map) = node.as_object_mut() {
                map.remove("$ref");
                for (key, value) in fields {
                    map.entry(key).or_insert(value);
                }
            }
        } else {
            *node = resolved;
        }
        return Ok(());
    }

    match node {
        Value::Object(map) => {
            for child in map.values_mut() {
                resolve_refs(document, child, visited)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_refs(document, item, visited)?;
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(path: &str, method: &str) -> OperationRef {
        OperationRef {
            path: path.to_string(),
            method: method.to_string(),
        }
    }

    fn pets_document() -> Value {
        json!({
            "openapi": "3.0.3",
            "paths": {
                "/pets": {
                    "parameters": [
                        { "name": "store", "in": "query", "schema": { "type": "string" } }
                    ],
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/pet" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/pet" }
                                    }
                                }
                            }
                        }
                    },
                    "get": {
                        "parameters": [
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                            { "name": "store", "in": "query", "required": true,
                              "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "object", "properties": {} }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "pet": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "owner": { "$ref": "#/components/schemas/owner" }
                        }
                    },
                    "owner": {
                        "type": "object",
                        "properties": { "id": { "type": "string" } }
                    }
                }
            }
        })
    }

    #[test]
    fn explore_unknown_path() {
        let result = explore(&pets_document(), &op("/stores", "get"));
        assert!(matches!(result, Err(ExploreError::UnknownPath { .. })));
    }

    #[test]
    fn explore_unknown_method() {
        let result = explore(&pets_document(), &op("/pets", "delete"));
        assert!(matches!(result, Err(ExploreError::UnknownMethod { .. })));
    }

    #[test]
    fn explore_method_is_case_insensitive() {
        let view = explore(&pets_document(), &op("/pets", "POST")).unwrap();
        assert!(view.request_body.is_some());
    }

    #[test]
    fn explore_resolves_request_body_refs_transitively() {
        let view = explore(&pets_document(), &op("/pets", "post")).unwrap();
        let body = view.request_body.unwrap();

        assert_eq!(body["type"], "object");
        // Nested ref to "owner" was inlined too.
        assert_eq!(body["properties"]["owner"]["type"], "object");
        assert!(body["properties"]["owner"].get("$ref").is_none());
    }

    #[test]
    fn explore_finds_first_2xx_response() {
        let view = explore(&pets_document(), &op("/pets", "post")).unwrap();
        assert_eq!(view.response_body.unwrap()["type"], "object");
    }

    #[test]
    fn explore_missing_request_body_is_none() {
        let view = explore(&pets_document(), &op("/pets", "get")).unwrap();
        assert!(view.request_body.is_none());
    }

    #[test]
    fn explore_operation_parameters_win_over_path_parameters() {
        let view = explore(&pets_document(), &op("/pets", "get")).unwrap();

        let store: Vec<&Parameter> =
            view.parameters.iter().filter(|p| p.name == "store").collect();
        assert_eq!(store.len(), 1);
        // The operation-level declaration (required) shadows the path-level one.
        assert!(store[0].required);

        assert!(view.parameters.iter().any(|p| p.name == "limit"));
    }

    #[test]
    fn explore_path_parameters_apply_when_not_redeclared() {
        let view = explore(&pets_document(), &op("/pets", "post")).unwrap();
        assert!(view.parameters.iter().any(|p| p.name == "store" && !p.required));
    }

    #[test]
    fn resolve_refs_rejects_external_reference() {
        let document = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "other.json#/pet" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });

        let result = explore(&document, &op("/pets", "get"));
        assert!(matches!(result, Err(ExploreError::BadReference { .. })));
    }

    #[test]
    fn resolve_refs_detects_cycles() {
        let document = json!({
            "paths": {
                "/nodes": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/node" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "node": {
                        "type": "object",
                        "properties": {
                            "next": { "$ref": "#/components/schemas/node" }
                        }
                    }
                }
            }
        });

        let result = explore(&document, &op("/nodes", "get"));
        assert!(matches!(result, Err(ExploreError::CircularReference { .. })));
    }

    #[test]
    fn ref_siblings_are_kept() {
        let document = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/pet",
                                            "description": "local wins"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "pet": { "type": "object", "description": "shadowed", "properties": {} }
                }
            }
        });

        let view = explore(&document, &op("/pets", "get")).unwrap();
        let body = view.response_body.unwrap();
        assert_eq!(body["description"], "local wins");
        assert_eq!(body["type"], "object");
    }
}
