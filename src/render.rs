//! Output projection to the downstream generator format.
//!
//! Each attribute serializes as an object with its name plus exactly one
//! populated kind key; element types likewise. Property order follows the
//! attribute list, which keeps output diffs stable across runs.

use serde_json::{Map, Value};

use crate::assembler::{AssembledEntity, Assembly};
use crate::attribute::{Attribute, AttributeKind, AttributeList};
use crate::element::ElementType;

/// Render a full assembly to the output document.
pub fn render(assembly: &Assembly) -> Value {
    let mut document = Map::new();
    document.insert(
        "resources".to_string(),
        Value::Array(assembly.resources.iter().map(render_entity).collect()),
    );
    document.insert(
        "datasources".to_string(),
        Value::Array(assembly.data_sources.iter().map(render_entity).collect()),
    );
    Value::Object(document)
}

/// Render one entity as `{ "name": ..., "schema": { "attributes": [...] } }`.
pub fn render_entity(entity: &AssembledEntity) -> Value {
    let mut schema = Map::new();
    schema.insert(
        "attributes".to_string(),
        render_attributes(&entity.attributes),
    );

    let mut out = Map::new();
    out.insert("name".to_string(), Value::String(entity.name.clone()));
    out.insert("schema".to_string(), Value::Object(schema));
    Value::Object(out)
}

fn render_attributes(attributes: &AttributeList) -> Value {
    Value::Array(attributes.iter().map(render_attribute).collect())
}

fn render_attribute(attribute: &Attribute) -> Value {
    let mut body = Map::new();
    body.insert(
        "computed_optional_required".to_string(),
        Value::String(attribute.computability.as_str().to_string()),
    );

    if let Some(description) = &attribute.description {
        if !description.is_empty() {
            body.insert(
                "description".to_string(),
                Value::String(description.clone()),
            );
        }
    }

    match &attribute.kind {
        AttributeKind::Bool
        | AttributeKind::Float64
        | AttributeKind::Int64
        | AttributeKind::Number => {}
        AttributeKind::String { sensitive } => {
            if *sensitive {
                body.insert("sensitive".to_string(), Value::Bool(true));
            }
        }
        AttributeKind::List { element }
        | AttributeKind::Map { element }
        | AttributeKind::Set { element } => {
            body.insert("element_type".to_string(), render_element(element));
        }
        AttributeKind::ListNested { attributes }
        | AttributeKind::MapNested { attributes }
        | AttributeKind::SetNested { attributes }
        | AttributeKind::SingleNested { attributes } => {
            body.insert("attributes".to_string(), render_attributes(attributes));
        }
    }

    let mut out = Map::new();
    out.insert("name".to_string(), Value::String(attribute.name.clone()));
    out.insert(attribute.kind.name().to_string(), Value::Object(body));
    Value::Object(out)
}

/// Render an element type as an object with exactly one populated kind key.
pub fn render_element(element: &ElementType) -> Value {
    let mut out = Map::new();
    match element {
        ElementType::Bool
        | ElementType::Float64
        | ElementType::Int64
        | ElementType::Number
        | ElementType::String => {
            out.insert(element.name().to_string(), Value::Object(Map::new()));
        }
        ElementType::List(inner) | ElementType::Map(inner) | ElementType::Set(inner) => {
            let mut body = Map::new();
            body.insert("element_type".to_string(), render_element(inner));
            out.insert(element.name().to_string(), Value::Object(body));
        }
        ElementType::Object(fields) => {
            let rendered: Vec<Value> = fields
                .iter()
                .map(|field| {
                    let mut entry = Map::new();
                    entry.insert("name".to_string(), Value::String(field.name.clone()));
                    if let Value::Object(kind) = render_element(&field.element) {
                        for (key, value) in kind {
                            entry.insert(key, value);
                        }
                    }
                    Value::Object(entry)
                })
                .collect();

            let mut body = Map::new();
            body.insert("attribute_types".to_string(), Value::Array(rendered));
            out.insert("object".to_string(), Value::Object(body));
        }
    }
    Value::Object(out)
}
