//! Tagged encoder — writes values in their self-describing wire shape.
//!
//! Every [`Value`] is written as a single-field object whose field name is the
//! variant's tag:
//!
//! ```text
//! {"string": "Voyager"}   {"int": 3}   {"double": 8.7}   {"bool": true}
//! {"array": [{"string": "series"}]}   {"object": {"season": {"int": 3}}}
//! {"nil": null}
//! ```
//!
//! A [`Metadata`] is written as a plain object whose fields are its keys, each
//! addressed through a [`DynamicKey`].
//!
//! `NaN` and the infinities have no JSON form; encoding a value that contains
//! one fails with [`MetadataError::Json`](crate::MetadataError::Json).
//!
//! # Example
//! ```
//! use metabag_core::encode;
//! let tagged = encode(r#"{"title":"Voyager","season":3}"#).unwrap();
//! assert_eq!(tagged, r#"{"season":{"int":3},"title":{"string":"Voyager"}}"#);
//! ```

use crate::error::Result;
use crate::key::DynamicKey;
use crate::metadata::Metadata;
use crate::value::{Tag, Value};
use serde::ser::{self, SerializeMap};
use serde::{Serialize, Serializer};

/// Encode a plain JSON document into its tagged form.
///
/// A root object is treated as a container (one field per key); any other
/// root is encoded as a single tagged value.
pub fn encode(json: &str) -> Result<String> {
    let native: serde_json::Value = serde_json::from_str(json)?;
    match native {
        serde_json::Value::Object(map) => to_string(&Metadata::from_native(map)),
        other => to_string(&Value::from(other)),
    }
}

/// Serialize a value or container as compact tagged JSON.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a value or container as indented tagged JSON.
pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize a value or container as tagged JSON bytes.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Value::Double(d) = self {
            if !d.is_finite() {
                return Err(ser::Error::custom(format!(
                    "non-finite double {d} has no JSON representation"
                )));
            }
        }
        let mut map = serializer.serialize_map(Some(1))?;
        let tag = self.tag().as_str();
        match self {
            Value::String(s) => map.serialize_entry(tag, s)?,
            Value::Int(i) => map.serialize_entry(tag, i)?,
            Value::Double(d) => map.serialize_entry(tag, d)?,
            Value::Bool(b) => map.serialize_entry(tag, b)?,
            Value::Array(items) => map.serialize_entry(tag, items)?,
            Value::Object(metadata) => map.serialize_entry(tag, metadata)?,
            Value::Null => map.serialize_entry(Tag::Nil.as_str(), &())?,
        }
        map.end()
    }
}

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(&DynamicKey::from_string(key.as_str()), value)?;
        }
        map.end()
    }
}
