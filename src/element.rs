//! Element types - type descriptors for values held inside collection attributes.

/// Type of the values carried by a `List`, `Map`, or `Set` attribute.
///
/// Unlike attributes, element types are anonymous: they describe the shape of
/// collection contents, not named schema nodes. `Object` is the exception in
/// that its fields are named, but the fields are still element types rather
/// than attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Bool,
    Float64,
    Int64,
    Number,
    String,
    List(Box<ElementType>),
    Map(Box<ElementType>),
    Set(Box<ElementType>),
    Object(Vec<ObjectField>),
}

/// A named field of an `ElementType::Object`.
///
/// Field names are unique within one object; order is preserved into output.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: String,
    pub element: ElementType,
}

impl ObjectField {
    pub fn new(name: impl Into<String>, element: ElementType) -> Self {
        Self {
            name: name.into(),
            element,
        }
    }
}

impl ElementType {
    /// Returns the external name of this element type kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Float64 => "float64",
            ElementType::Int64 => "int64",
            ElementType::Number => "number",
            ElementType::String => "string",
            ElementType::List(_) => "list",
            ElementType::Map(_) => "map",
            ElementType::Set(_) => "set",
            ElementType::Object(_) => "object",
        }
    }
}
