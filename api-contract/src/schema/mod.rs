//! Declarative response shapes and the structural validator that checks
//! values against them.
//!
//! Shapes are plain data: build them once (usually in a `lazy_static!`
//! block), share them through [`Shape::reference`] and validate as many
//! values against them as needed.

mod primitive;
mod validator;

pub use primitive::{Constraints, Format, Primitive, PrimitiveKind};
pub use validator::{assert_valid, validate, validate_text, ValidationResult};

use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(Primitive),
    Object(ObjectShape),
    Array(ArrayShape),
    /// The value has to match at least one alternative, tried in order.
    Union(Vec<Shape>),
    /// Reuse of a shape defined elsewhere. Shapes form a DAG, references
    /// must never point back at an enclosing shape.
    Reference(Arc<Shape>),
    /// `null` or the wrapped shape.
    Nullable(Box<Shape>),
    /// Exactly this value. Built by [`Shape::literal`] for `null`, arrays
    /// and objects.
    Exact(Value),
    Any,
}

impl Shape {
    pub fn number() -> Self {
        Primitive::number().into()
    }

    pub fn integer() -> Self {
        Primitive::integer().into()
    }

    pub fn string() -> Self {
        Primitive::string().into()
    }

    pub fn boolean() -> Self {
        Primitive::boolean().into()
    }

    pub fn date() -> Self {
        Primitive::date().into()
    }

    pub fn any() -> Self {
        Shape::Any
    }

    pub fn array_of<S: Into<Shape>>(element: S) -> ArrayShape {
        ArrayShape::new(element)
    }

    pub fn union<S: Into<Shape>, I: IntoIterator<Item = S>>(alternatives: I) -> Self {
        Shape::Union(alternatives.into_iter().map(Into::into).collect())
    }

    pub fn reference(shape: &Arc<Shape>) -> Self {
        Shape::Reference(shape.clone())
    }

    /// Accepts only the exact given value, e.g. `Shape::literal("")` for an
    /// empty response body.
    pub fn literal<V: Into<Value>>(value: V) -> Self {
        let value = value.into();
        let kind = match &value {
            Value::Number(_) => PrimitiveKind::Number,
            Value::Bool(_) => PrimitiveKind::Boolean,
            Value::String(_) => PrimitiveKind::String,
            Value::Null | Value::Array(_) | Value::Object(_) => return Shape::Exact(value),
        };

        Primitive::new(kind).one_of(vec![value]).into()
    }

    pub fn nullable(self) -> Self {
        match self {
            Shape::Primitive(primitive) => Shape::Primitive(primitive.nullable()),
            Shape::Nullable(inner) => Shape::Nullable(inner),
            Shape::Any => Shape::Any,
            other => Shape::Nullable(Box::new(other)),
        }
    }
}

impl From<Primitive> for Shape {
    fn from(primitive: Primitive) -> Self {
        Shape::Primitive(primitive)
    }
}

impl From<ObjectShape> for Shape {
    fn from(object: ObjectShape) -> Self {
        Shape::Object(object)
    }
}

impl From<ArrayShape> for Shape {
    fn from(array: ArrayShape) -> Self {
        Shape::Array(array)
    }
}

impl From<&Arc<Shape>> for Shape {
    fn from(shape: &Arc<Shape>) -> Self {
        Shape::reference(shape)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnknownPolicy {
    Reject,
    Allow,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct ObjectShape {
    pub fields: Vec<Field>,
    pub unknown_policy: UnknownPolicy,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            unknown_policy: UnknownPolicy::Reject,
        }
    }

    pub fn required<N: Into<String>, S: Into<Shape>>(self, name: N, shape: S) -> Self {
        self.field(name, shape, true)
    }

    pub fn optional<N: Into<String>, S: Into<Shape>>(self, name: N, shape: S) -> Self {
        self.field(name, shape, false)
    }

    /// Redefining a field replaces the earlier definition in place.
    pub fn field<N: Into<String>, S: Into<Shape>>(mut self, name: N, shape: S, required: bool) -> Self {
        let field = Field {
            name: name.into(),
            shape: shape.into(),
            required,
        };

        match self.fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }

        self
    }

    /// Tolerate keys that are not declared, the `.unknown(true)` escape hatch.
    pub fn allow_unknown(mut self) -> Self {
        self.unknown_policy = UnknownPolicy::Allow;
        self
    }

    pub fn reject_unknown(mut self) -> Self {
        self.unknown_policy = UnknownPolicy::Reject;
        self
    }

    /// Builds a new shape from this one with the fields of `other` added on
    /// top. Used for endpoint variants that extend a common resource.
    pub fn extend(self, other: &ObjectShape) -> Self {
        other.fields.iter().fold(self, |shape, field| {
            shape.field(field.name.clone(), field.shape.clone(), field.required)
        })
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl Default for ObjectShape {
    fn default() -> Self {
        Self::new()
    }
}

/// Key used to detect duplicates inside an array, a JSON pointer into each
/// element. The empty pointer compares whole elements.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniqueKey(pub String);

#[derive(Debug, Clone)]
pub struct ArrayShape {
    pub element: Box<Shape>,
    pub min_items: usize,
    pub max_items: Option<usize>,
    pub unique_by: Option<UniqueKey>,
}

impl ArrayShape {
    pub fn new<S: Into<Shape>>(element: S) -> Self {
        Self {
            element: Box::new(element.into()),
            min_items: 0,
            max_items: None,
            unique_by: None,
        }
    }

    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_items(1)
    }

    /// `pointer` is a JSON pointer into each element. A bare field name such
    /// as `"id"` is read as `"/id"`.
    pub fn unique_by<S: Into<String>>(mut self, pointer: S) -> Self {
        let mut pointer = pointer.into();
        if !pointer.is_empty() && !pointer.starts_with('/') {
            pointer.insert(0, '/');
        }

        self.unique_by = Some(UniqueKey(pointer));
        self
    }

    pub fn unique(self) -> Self {
        self.unique_by("")
    }
}

/// Shorthand for a string primitive restricted to a regular expression.
pub fn pattern(regex: Regex) -> Shape {
    Primitive::string().pattern(regex).into()
}
