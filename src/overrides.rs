//! Path-addressed overrides applied to a merged attribute tree.
//!
//! Overrides patch description and computability after merging. Unlike merge,
//! an override's description always replaces the existing one - the user's
//! word is final even when the merged tree already carries documentation.

use crate::attribute::{AttributeList, Computability};
use crate::error::OverrideError;

/// A user-declared patch for one attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Override {
    /// Replacement description. `Some("")` counts as explicitly set.
    pub description: Option<String>,
    /// Raw computability token; mapped at apply time so an unrecognized
    /// token degrades this entry only.
    pub computability: Option<String>,
}

/// Attribute address as a pre-split chain of names to descend into.
///
/// Produced from dotted config keys at the config boundary; the engine never
/// re-parses strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverridePath(Vec<String>);

impl OverridePath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Split a dotted key (e.g. `"spec.replicas"`) into segments.
    ///
    /// Empty segments are discarded, so `""` yields an empty path.
    pub fn split(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for OverridePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Result of applying a set of override entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideOutcome {
    /// Entries that failed: path through a non-nested attribute, or an
    /// unknown computability token.
    pub errors: Vec<OverrideError>,
    /// Entries whose path matched no attribute. Tolerated, but reported so
    /// callers can surface likely typos.
    pub unmatched: Vec<OverridePath>,
}

enum ApplyStatus {
    Applied,
    Unmatched,
    /// The error was already recorded.
    Failed,
}

/// Apply override entries to an attribute tree, in place.
///
/// Each entry descends the tree along its path segments and patches the
/// attribute at the final segment. Failures are collected per entry and
/// never abort the remaining entries; entries are independent, so their
/// order is not significant for well-formed sets.
pub fn apply_overrides(
    attributes: &mut AttributeList,
    entries: &[(OverridePath, Override)],
) -> OverrideOutcome {
    let mut outcome = OverrideOutcome::default();

    for (path, patch) in entries {
        match apply_one(attributes, path.segments(), path, patch, &mut outcome.errors) {
            ApplyStatus::Applied | ApplyStatus::Failed => {}
            ApplyStatus::Unmatched => outcome.unmatched.push(path.clone()),
        }
    }

    outcome
}

fn apply_one(
    list: &mut AttributeList,
    segments: &[String],
    path: &OverridePath,
    patch: &Override,
    errors: &mut Vec<OverrideError>,
) -> ApplyStatus {
    let [head, rest @ ..] = segments else {
        return ApplyStatus::Unmatched;
    };

    let Some(attribute) = list.get_mut(head) else {
        return ApplyStatus::Unmatched;
    };

    if rest.is_empty() {
        if let Some(text) = &patch.description {
            attribute.description = Some(text.clone());
        }
        if let Some(token) = &patch.computability {
            match Computability::parse(token) {
                Some(value) => attribute.computability = value,
                None => {
                    errors.push(OverrideError::UnknownComputability {
                        path: path.to_string(),
                        token: token.clone(),
                    });
                    return ApplyStatus::Failed;
                }
            }
        }
        return ApplyStatus::Applied;
    }

    match attribute.kind.nested_mut() {
        Some(nested) => apply_one(nested, rest, path, patch, errors),
        None => {
            errors.push(OverrideError::NotNested {
                path: path.to_string(),
                attribute: head.clone(),
            });
            ApplyStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, AttributeKind};

    fn string_attr(name: &str) -> Attribute {
        Attribute::new(
            name,
            Computability::Optional,
            AttributeKind::String { sensitive: false },
        )
    }

    fn entry(path: &str, patch: Override) -> (OverridePath, Override) {
        (OverridePath::split(path), patch)
    }

    #[test]
    fn split_discards_empty_segments() {
        assert_eq!(OverridePath::split("a.b.c").segments().len(), 3);
        assert!(OverridePath::split("").is_empty());
        assert_eq!(OverridePath::split("a..b").segments(), ["a", "b"]);
    }

    #[test]
    fn path_display_is_dotted() {
        assert_eq!(OverridePath::split("spec.replicas").to_string(), "spec.replicas");
    }

    #[test]
    fn override_replaces_non_empty_description() {
        let mut attrs: AttributeList = vec![string_attr("name").describe("old")]
            .into_iter()
            .collect();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "name",
                Override {
                    description: Some("new".into()),
                    computability: None,
                },
            )],
        );

        assert!(outcome.errors.is_empty());
        assert!(outcome.unmatched.is_empty());
        assert_eq!(attrs.get("name").unwrap().description.as_deref(), Some("new"));
    }

    #[test]
    fn override_sets_computability_from_token() {
        let mut attrs: AttributeList = vec![string_attr("name")].into_iter().collect();

        apply_overrides(
            &mut attrs,
            &[entry(
                "name",
                Override {
                    description: None,
                    computability: Some("computed_optional".into()),
                },
            )],
        );

        assert_eq!(
            attrs.get("name").unwrap().computability,
            Computability::ComputedOptional
        );
    }

    #[test]
    fn override_unknown_token_is_collected_and_leaves_attribute_unchanged() {
        let mut attrs: AttributeList = vec![string_attr("name")].into_iter().collect();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "name",
                Override {
                    description: None,
                    computability: Some("readonly".into()),
                },
            )],
        );

        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            OverrideError::UnknownComputability { token, .. } if token == "readonly"
        ));
        assert_eq!(attrs.get("name").unwrap().computability, Computability::Optional);
    }

    #[test]
    fn override_unknown_path_is_tolerated() {
        let mut attrs: AttributeList = vec![string_attr("name")].into_iter().collect();
        let before = attrs.clone();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "does_not_exist",
                Override {
                    description: Some("x".into()),
                    computability: None,
                },
            )],
        );

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.unmatched, vec![OverridePath::split("does_not_exist")]);
        assert_eq!(attrs, before);
    }

    #[test]
    fn override_descends_nested_attributes() {
        let mut attrs: AttributeList = vec![Attribute::new(
            "single_nested",
            Computability::Required,
            AttributeKind::SingleNested {
                attributes: vec![Attribute::new(
                    "list_nested",
                    Computability::Required,
                    AttributeKind::ListNested {
                        attributes: vec![string_attr("string_attribute"), string_attr("sibling")]
                            .into_iter()
                            .collect(),
                    },
                )]
                .into_iter()
                .collect(),
            },
        )]
        .into_iter()
        .collect();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "single_nested.list_nested.string_attribute",
                Override {
                    description: Some("leaf".into()),
                    computability: Some("required".into()),
                },
            )],
        );
        assert!(outcome.errors.is_empty());

        let nested = attrs.get("single_nested").unwrap().kind.nested().unwrap();
        let leaf_list = nested.get("list_nested").unwrap().kind.nested().unwrap();
        let leaf = leaf_list.get("string_attribute").unwrap();
        assert_eq!(leaf.description.as_deref(), Some("leaf"));
        assert_eq!(leaf.computability, Computability::Required);

        // Siblings and ancestors stay untouched.
        assert!(leaf_list.get("sibling").unwrap().description.is_none());
        assert!(attrs.get("single_nested").unwrap().description.is_none());
    }

    #[test]
    fn override_through_non_nested_attribute_errors() {
        let mut attrs: AttributeList = vec![string_attr("scalar")].into_iter().collect();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "scalar.child",
                Override {
                    description: Some("x".into()),
                    computability: None,
                },
            )],
        );

        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            OverrideError::NotNested { attribute, .. } if attribute == "scalar"
        ));
    }

    #[test]
    fn empty_path_is_skipped() {
        let mut attrs: AttributeList = vec![string_attr("name")].into_iter().collect();
        let before = attrs.clone();

        let outcome = apply_overrides(
            &mut attrs,
            &[entry(
                "",
                Override {
                    description: Some("x".into()),
                    computability: None,
                },
            )],
        );

        assert!(outcome.errors.is_empty());
        assert_eq!(attrs, before);
    }

    #[test]
    fn explicit_empty_description_replaces() {
        let mut attrs: AttributeList = vec![string_attr("name").describe("old")]
            .into_iter()
            .collect();

        apply_overrides(
            &mut attrs,
            &[entry(
                "name",
                Override {
                    description: Some(String::new()),
                    computability: None,
                },
            )],
        );

        assert_eq!(attrs.get("name").unwrap().description.as_deref(), Some(""));
    }
}
