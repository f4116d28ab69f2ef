//! Two-phase decoder — reads tagged and untagged fragments back into values.
//!
//! Incoming documents are first buffered as a `serde_json::Value` tree so that
//! every shape trial below can look at the same input without consuming it.
//!
//! # Phase 1: tagged
//!
//! If the fragment is an object carrying at least one known tag, the first
//! tag found in the order `string, int, double, bool, array, object, nil`
//! decides the variant. A payload of the wrong shape is an error; there is no
//! fallback once a tag has been seen. The `nil` payload is ignored.
//!
//! # Phase 2: untagged
//!
//! Otherwise the fragment is tried, in order, as null, string, bool, integer,
//! floating-point, array of values and object of values. The first trial that
//! matches wins. A number written with a zero fractional part (`7.0`) matches
//! the integer trial. If nothing matches, a single
//! [`MetadataError::TypeMismatch`] is reported at the fragment's path.
//!
//! # Example
//! ```
//! use metabag_core::decode;
//! let plain = decode(r#"{"season":{"int":3},"tags":["series","cinema"]}"#).unwrap();
//! assert_eq!(plain, r#"{"season":3,"tags":["series","cinema"]}"#);
//! ```

use crate::error::{MetadataError, Result};
use crate::key::{CodingPath, DynamicKey};
use crate::metadata::Metadata;
use crate::value::{Tag, Value};
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Smallest `f64` that no longer fits in `i64` (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Decode a tagged (or plain) JSON document back into plain JSON.
///
/// A root object is read as a container; any other root as a single value.
/// The output is compact; use `serde_json::to_string_pretty` on the parsed
/// result if indentation is needed.
pub fn decode(json: &str) -> Result<String> {
    let raw: JsonValue = serde_json::from_str(json)?;
    let native = match &raw {
        JsonValue::Object(_) => JsonValue::Object(decode_metadata(&raw)?.to_native()),
        other => decode_value(other)?.to_native(),
    };
    Ok(serde_json::to_string(&native)?)
}

/// Parse a container from JSON text.
pub fn from_str(json: &str) -> Result<Metadata> {
    let raw: JsonValue = serde_json::from_str(json)?;
    decode_metadata(&raw)
}

/// Parse a container from JSON bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Metadata> {
    let raw: JsonValue = serde_json::from_slice(bytes)?;
    decode_metadata(&raw)
}

/// Parse a single value from JSON text.
pub fn value_from_str(json: &str) -> Result<Value> {
    let raw: JsonValue = serde_json::from_str(json)?;
    decode_value(&raw)
}

/// Decode an already-parsed document as a container.
pub fn decode_metadata(raw: &JsonValue) -> Result<Metadata> {
    Decoder::default().metadata(raw)
}

/// Decode an already-parsed document as a single value.
pub fn decode_value(raw: &JsonValue) -> Result<Value> {
    Decoder::default().value(raw)
}

/// An untagged shape trial. Returns `None` to let the next trial run.
type Probe = fn(&mut Decoder, &JsonValue) -> Option<Value>;

const UNTAGGED_PROBES: [Probe; 7] = [
    probe_null,
    probe_string,
    probe_bool,
    probe_int,
    probe_double,
    probe_array,
    probe_object,
];

#[derive(Default)]
struct Decoder {
    path: CodingPath,
}

impl Decoder {
    fn mismatch(&self, expected: &'static str) -> MetadataError {
        MetadataError::type_mismatch(expected, &self.path)
    }

    fn metadata(&mut self, raw: &JsonValue) -> Result<Metadata> {
        let JsonValue::Object(map) = raw else {
            return Err(self.mismatch("object"));
        };
        let mut decoded = Metadata::new();
        for (name, fragment) in map {
            let key = DynamicKey::from_string(name.as_str());
            self.path.push(key.clone());
            let value = self.value(fragment);
            self.path.pop();
            decoded.set(key.into_string(), Some(value?));
        }
        Ok(decoded)
    }

    fn value(&mut self, raw: &JsonValue) -> Result<Value> {
        if let Some(value) = self.tagged(raw)? {
            return Ok(value);
        }
        tracing::trace!(path = %self.path, "no tag present, trying untagged shapes");
        for probe in UNTAGGED_PROBES {
            if let Some(value) = probe(self, raw) {
                return Ok(value);
            }
        }
        Err(self.mismatch("Value"))
    }

    /// Phase 1. `Ok(None)` means no tag was present.
    fn tagged(&mut self, raw: &JsonValue) -> Result<Option<Value>> {
        let JsonValue::Object(map) = raw else {
            return Ok(None);
        };
        let Some((tag, payload)) = Tag::ALL
            .into_iter()
            .find_map(|tag| map.get(tag.as_str()).map(|payload| (tag, payload)))
        else {
            return Ok(None);
        };
        self.path.push(DynamicKey::from_string(tag.as_str()));
        let value = self.payload(tag, payload);
        self.path.pop();
        value.map(Some)
    }

    fn payload(&mut self, tag: Tag, payload: &JsonValue) -> Result<Value> {
        match tag {
            Tag::String => payload
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| self.mismatch("string")),
            Tag::Int => exact_int(payload)
                .map(Value::Int)
                .ok_or_else(|| self.mismatch("int")),
            Tag::Double => payload
                .as_f64()
                .map(Value::Double)
                .ok_or_else(|| self.mismatch("double")),
            Tag::Bool => payload
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| self.mismatch("bool")),
            Tag::Array => match payload {
                JsonValue::Array(items) => self.elements(items).map(Value::Array),
                _ => Err(self.mismatch("array")),
            },
            Tag::Object => self.metadata(payload).map(Value::Object),
            Tag::Nil => Ok(Value::Null),
        }
    }

    fn elements(&mut self, items: &[JsonValue]) -> Result<Vec<Value>> {
        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push(DynamicKey::from(index));
            let value = self.value(item);
            self.path.pop();
            decoded.push(value?);
        }
        Ok(decoded)
    }
}

fn probe_null(_: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    raw.is_null().then_some(Value::Null)
}

fn probe_string(_: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    raw.as_str().map(|s| Value::String(s.to_string()))
}

fn probe_bool(_: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    raw.as_bool().map(Value::Bool)
}

fn probe_int(_: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    exact_int(raw).map(Value::Int)
}

fn probe_double(_: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    raw.as_f64().map(Value::Double)
}

fn probe_array(decoder: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    let JsonValue::Array(items) = raw else {
        return None;
    };
    match decoder.elements(items) {
        Ok(items) => Some(Value::Array(items)),
        Err(err) => {
            tracing::debug!(path = %decoder.path, error = %err, "array trial rejected");
            None
        }
    }
}

fn probe_object(decoder: &mut Decoder, raw: &JsonValue) -> Option<Value> {
    if !raw.is_object() {
        return None;
    }
    match decoder.metadata(raw) {
        Ok(metadata) => Some(Value::Object(metadata)),
        Err(err) => {
            tracing::debug!(path = %decoder.path, error = %err, "object trial rejected");
            None
        }
    }
}

/// An integer that fits `i64` exactly. Floats with no fractional part count.
fn exact_int(raw: &JsonValue) -> Option<i64> {
    let JsonValue::Number(n) = raw else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if !n.is_f64() {
        return None;
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        decode_value(&raw).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        decode_metadata(&raw).map_err(de::Error::custom)
    }
}
