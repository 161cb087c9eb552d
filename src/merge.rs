//! Attribute and element-type merging across operation sources.
//!
//! Sources are merged in precedence order: the first source to mention an
//! attribute defines its kind and computability, later sources may only fill
//! in missing documentation and contribute attributes (or nested fields) the
//! earlier sources did not know about.

use crate::attribute::{Attribute, AttributeKind, AttributeList};
use crate::element::ElementType;

/// Result of merging attribute lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub attributes: AttributeList,
    /// Kind disagreements encountered while merging. The target's kind was
    /// kept and the source's content discarded; callers surface these as
    /// warnings so silently dropped schema content stays visible.
    pub conflicts: Vec<KindConflict>,
}

/// A same-named attribute pair whose kinds disagreed during merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindConflict {
    /// Dotted path of the attribute, relative to the merge root.
    pub path: String,
    pub kept: &'static str,
    pub dropped: &'static str,
}

impl std::fmt::Display for KindConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "kind conflict at \"{}\": kept {}, dropped {}",
            self.path, self.kept, self.dropped
        )
    }
}

/// Merge `sources` into `target`, in order.
///
/// The target always wins on kind, computability, and sensitivity; its
/// description is filled from a source only when absent or empty. Attributes
/// unknown to the target are appended in source traversal order, and nested
/// attribute lists merge recursively under the same rules.
pub fn merge(target: AttributeList, sources: Vec<AttributeList>) -> Merged {
    let mut attributes = target;
    let mut conflicts = Vec::new();

    for source in sources {
        merge_one(&mut attributes, source, "", &mut conflicts);
    }

    Merged {
        attributes,
        conflicts,
    }
}

fn merge_one(
    target: &mut AttributeList,
    source: AttributeList,
    path: &str,
    conflicts: &mut Vec<KindConflict>,
) {
    for attribute in source {
        match target.get_mut(&attribute.name) {
            None => target.push(attribute),
            Some(existing) => merge_attribute(existing, attribute, path, conflicts),
        }
    }
}

fn merge_attribute(
    target: &mut Attribute,
    source: Attribute,
    path: &str,
    conflicts: &mut Vec<KindConflict>,
) {
    let attribute_path = join_path(path, &source.name);

    match (&mut target.kind, source.kind) {
        (AttributeKind::Bool, AttributeKind::Bool)
        | (AttributeKind::Float64, AttributeKind::Float64)
        | (AttributeKind::Int64, AttributeKind::Int64)
        | (AttributeKind::Number, AttributeKind::Number)
        | (AttributeKind::String { .. }, AttributeKind::String { .. }) => {}

        (AttributeKind::List { element }, AttributeKind::List { element: other })
        | (AttributeKind::Map { element }, AttributeKind::Map { element: other })
        | (AttributeKind::Set { element }, AttributeKind::Set { element: other }) => {
            merge_element(element, other);
        }

        (
            AttributeKind::ListNested { attributes },
            AttributeKind::ListNested { attributes: other },
        )
        | (
            AttributeKind::MapNested { attributes },
            AttributeKind::MapNested { attributes: other },
        )
        | (
            AttributeKind::SetNested { attributes },
            AttributeKind::SetNested { attributes: other },
        )
        | (
            AttributeKind::SingleNested { attributes },
            AttributeKind::SingleNested { attributes: other },
        ) => {
            merge_one(attributes, other, &attribute_path, conflicts);
        }

        // Kind mismatch: the target node stays untouched, including its
        // description, and the source node's content is discarded.
        (kept, dropped) => {
            conflicts.push(KindConflict {
                path: attribute_path,
                kept: kept.name(),
                dropped: dropped.name(),
            });
            return;
        }
    }

    if target.description_is_blank() && source.description.is_some() {
        target.description = source.description;
    }
}

/// Merge a source element type into a target element type, in place.
///
/// Only `List` pairs and `Object` pairs recurse; any other combination keeps
/// the target unchanged. Object fields merge by name, with source-only fields
/// appended after the target's existing fields.
pub fn merge_element(target: &mut ElementType, source: ElementType) {
    match (target, source) {
        (ElementType::List(inner), ElementType::List(other)) => {
            merge_element(inner, *other);
        }
        (ElementType::Object(fields), ElementType::Object(other)) => {
            for field in other {
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => merge_element(&mut existing.element, field.element),
                    None => fields.push(field),
                }
            }
        }
        _ => {}
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
