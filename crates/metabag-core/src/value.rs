//! The recursive value model.
//!
//! A [`Value`] is exactly one of seven variants. Compound variants own their
//! children outright, so a value tree never shares nodes and never contains
//! cycles. Nothing in the crate mutates a value in place: containers rebind
//! keys to new values instead.

use crate::metadata::Metadata;

/// One datum inside a metadata document.
///
/// Different variants are never equal: `Int(1) != Double(1.0)`. Doubles use
/// IEEE-754 equality, so `Double(NAN) != Double(NAN)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit null. Distinct from a key being absent.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Ordered sequence; element order is significant.
    Array(Vec<Value>),
    /// Nested string-keyed container.
    Object(Metadata),
}

/// Discriminator written by the tagged encoding, one per [`Value`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    String,
    Int,
    Double,
    Bool,
    Array,
    Object,
    Nil,
}

impl Tag {
    /// Every tag, in the order the decoder looks for them.
    pub const ALL: [Tag; 7] = [
        Tag::String,
        Tag::Int,
        Tag::Double,
        Tag::Bool,
        Tag::Array,
        Tag::Object,
        Tag::Nil,
    ];

    /// The field name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::String => "string",
            Tag::Int => "int",
            Tag::Double => "double",
            Tag::Bool => "bool",
            Tag::Array => "array",
            Tag::Object => "object",
            Tag::Nil => "nil",
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl Value {
    /// The tag this value is written under.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Nil,
            Value::Bool(_) => Tag::Bool,
            Value::Int(_) => Tag::Int,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::Array(_) => Tag::Array,
            Value::Object(_) => Tag::Object,
        }
    }

    /// Short variant name, used by the CLI and in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.tag().as_str()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Only matches `Double`; an `Int` is not widened.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Metadata> {
        match self {
            Value::Object(metadata) => Some(metadata),
            _ => None,
        }
    }
}
