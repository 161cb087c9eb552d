//! Core types for attribute schemas.

use crate::element::ElementType;

/// External tokens accepted for computability overrides.
pub const COMPUTABILITY_TOKENS: &[&str] =
    &["computed", "optional", "required", "computed_optional"];

/// Whether an attribute's value is server-computed, user-supplied, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Computability {
    /// The server fills the value in; the user never supplies it.
    Computed,
    /// The user may supply the value.
    Optional,
    /// The user must supply the value.
    Required,
    /// The user may supply the value, and the server fills it in otherwise.
    ComputedOptional,
}

impl Computability {
    /// Parse a computability token from a string.
    ///
    /// Returns `None` for unknown tokens (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "computed" => Some(Computability::Computed),
            "optional" => Some(Computability::Optional),
            "required" => Some(Computability::Required),
            "computed_optional" => Some(Computability::ComputedOptional),
            _ => None,
        }
    }

    /// Returns the external token for this computability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Computability::Computed => "computed",
            Computability::Optional => "optional",
            Computability::Required => "required",
            Computability::ComputedOptional => "computed_optional",
        }
    }
}

/// A named, typed node of the output schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Unique within the containing [`AttributeList`].
    pub name: String,
    pub computability: Computability,
    pub description: Option<String>,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn new(name: impl Into<String>, computability: Computability, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            computability,
            description: None,
            kind,
        }
    }

    /// Set the description (builder style).
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// True when the description is absent or empty, i.e. merge may fill it.
    pub fn description_is_blank(&self) -> bool {
        self.description.as_deref().map_or(true, str::is_empty)
    }
}

/// The kind-specific payload of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    Bool,
    Float64,
    Int64,
    Number,
    String { sensitive: bool },
    List { element: ElementType },
    Map { element: ElementType },
    Set { element: ElementType },
    ListNested { attributes: AttributeList },
    MapNested { attributes: AttributeList },
    SetNested { attributes: AttributeList },
    SingleNested { attributes: AttributeList },
}

impl AttributeKind {
    /// Returns the external name of this attribute kind.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "bool",
            AttributeKind::Float64 => "float64",
            AttributeKind::Int64 => "int64",
            AttributeKind::Number => "number",
            AttributeKind::String { .. } => "string",
            AttributeKind::List { .. } => "list",
            AttributeKind::Map { .. } => "map",
            AttributeKind::Set { .. } => "set",
            AttributeKind::ListNested { .. } => "list_nested",
            AttributeKind::MapNested { .. } => "map_nested",
            AttributeKind::SetNested { .. } => "set_nested",
            AttributeKind::SingleNested { .. } => "single_nested",
        }
    }

    /// Returns the nested attribute list for nested kinds, `None` otherwise.
    pub fn nested(&self) -> Option<&AttributeList> {
        match self {
            AttributeKind::ListNested { attributes }
            | AttributeKind::MapNested { attributes }
            | AttributeKind::SetNested { attributes }
            | AttributeKind::SingleNested { attributes } => Some(attributes),
            _ => None,
        }
    }

    /// Mutable variant of [`AttributeKind::nested`].
    pub fn nested_mut(&mut self) -> Option<&mut AttributeList> {
        match self {
            AttributeKind::ListNested { attributes }
            | AttributeKind::MapNested { attributes }
            | AttributeKind::SetNested { attributes }
            | AttributeKind::SingleNested { attributes } => Some(attributes),
            _ => None,
        }
    }
}

/// An ordered list of attributes with unique names.
///
/// Order is insertion order and carries through to output. Callers must only
/// push names not already present; lookups are by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeList(Vec<Attribute>);

impl AttributeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.0.iter_mut().find(|a| a.name == name)
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.0.push(attribute);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }
}

impl IntoIterator for AttributeList {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Attribute> for AttributeList {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
