//! Conversion between host data and the typed value model.
//!
//! Forward conversion never fails. Input is classified in a fixed order:
//!
//! 1. already a [`Value`] or [`Metadata`] → kept as is
//! 2. already-typed collections of values → wrapped without re-conversion
//! 3. null sentinels → [`Value::Null`]
//! 4. booleans → [`Value::Bool`] (ahead of every numeric rule)
//! 5. floating-point numbers → [`Value::Double`]
//! 6. other numbers → [`Value::Int`] when they fit in `i64`, otherwise the
//!    nearest [`Value::Double`]
//! 7. strings, arrays and string-keyed maps → converted recursively
//! 8. anything else → [`Value::Null`]
//!
//! Rule 6 loses precision for unsigned values above `i64::MAX`; this is
//! accepted rather than reported. Reverse conversion targets
//! `serde_json::Value`, which is the crate's dynamic host representation.

use crate::metadata::Metadata;
use crate::value::Value;
use serde_json::{Map, Number, Value as JsonValue};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

/// Classify a type-erased host value.
///
/// Recognized inputs: `Value`, `Metadata`, `Vec<Value>`, string-keyed
/// `HashMap`/`BTreeMap` of `Value`, `serde_json::Value` and `serde_json::Map`,
/// `()`, `bool`, every primitive integer and float type, `String`,
/// `&'static str`, `Vec`/`HashMap`/`BTreeMap` of `Box<dyn Any>` (converted
/// element by element), and `Vec`/`HashMap`/`BTreeMap` of strings, `bool`,
/// `i64`/`i32`/`u64`/`u32`/`usize`, `f64`/`f32`, `serde_json::Value` or
/// `Metadata`. A `Box<dyn Any>` is unwrapped first. Everything else
/// becomes `Null`.
pub fn from_dynamic(value: &dyn Any) -> Value {
    if let Some(boxed) = value.downcast_ref::<Box<dyn Any>>() {
        return from_dynamic(boxed.as_ref());
    }

    if let Some(value) = value.downcast_ref::<Value>() {
        return value.clone();
    }
    if let Some(metadata) = value.downcast_ref::<Metadata>() {
        return Value::Object(metadata.clone());
    }

    if let Some(items) = value.downcast_ref::<Vec<Value>>() {
        return Value::Array(items.clone());
    }
    if let Some(map) = value.downcast_ref::<HashMap<String, Value>>() {
        return Value::Object(Metadata::from(map.clone()));
    }
    if let Some(map) = value.downcast_ref::<BTreeMap<String, Value>>() {
        return Value::Object(Metadata::from(map.clone()));
    }
    if let Some(native) = value.downcast_ref::<JsonValue>() {
        return Value::from(native);
    }
    if let Some(map) = value.downcast_ref::<Map<String, JsonValue>>() {
        return Value::Object(Metadata::from_native_ref(map));
    }

    if value.is::<()>() {
        return Value::Null;
    }

    if let Some(b) = value.downcast_ref::<bool>() {
        return Value::Bool(*b);
    }

    if let Some(f) = value.downcast_ref::<f64>() {
        return Value::Double(*f);
    }
    if let Some(f) = value.downcast_ref::<f32>() {
        return Value::Double(f64::from(*f));
    }

    if let Some(number) = classify_integer(value) {
        return number;
    }

    if let Some(s) = value.downcast_ref::<String>() {
        return Value::String(s.clone());
    }
    if let Some(s) = value.downcast_ref::<&'static str>() {
        return Value::String((*s).to_string());
    }
    if let Some(items) = value.downcast_ref::<Vec<Box<dyn Any>>>() {
        return Value::Array(items.iter().map(|item| from_dynamic(item.as_ref())).collect());
    }
    if let Some(map) = value.downcast_ref::<HashMap<String, Box<dyn Any>>>() {
        return Value::Object(Metadata::from_dynamic_map(map));
    }
    if let Some(map) = value.downcast_ref::<BTreeMap<String, Box<dyn Any>>>() {
        return Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), from_dynamic(item.as_ref())))
                .collect(),
        );
    }

    if let Some(collection) = classify_typed_collection(value) {
        return collection;
    }

    tracing::debug!(
        type_id = ?Any::type_id(value),
        "unsupported host value coerced to null"
    );
    Value::Null
}

/// Rule 6 over every primitive integer width.
fn classify_integer(value: &dyn Any) -> Option<Value> {
    if let Some(n) = value.downcast_ref::<i64>() {
        return Some(Value::Int(*n));
    }
    if let Some(n) = value.downcast_ref::<i32>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<i16>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<i8>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<isize>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<i128>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<u64>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<u32>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<u16>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<u8>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<usize>() {
        return Some(Value::from(*n));
    }
    if let Some(n) = value.downcast_ref::<u128>() {
        return Some(Value::from(*n));
    }
    None
}

/// `Vec`, `HashMap` and `BTreeMap` arms for each listed element type, each
/// element going through its `From` impl.
macro_rules! typed_collections {
    ($value:ident: $($ty:ty),* $(,)?) => {
        $(
            if let Some(items) = $value.downcast_ref::<Vec<$ty>>() {
                return Some(Value::Array(
                    items.iter().cloned().map(Value::from).collect(),
                ));
            }
            if let Some(map) = $value.downcast_ref::<HashMap<String, $ty>>() {
                return Some(Value::Object(
                    map.iter()
                        .map(|(key, item)| (key.clone(), Value::from(item.clone())))
                        .collect(),
                ));
            }
            if let Some(map) = $value.downcast_ref::<BTreeMap<String, $ty>>() {
                return Some(Value::Object(
                    map.iter()
                        .map(|(key, item)| (key.clone(), Value::from(item.clone())))
                        .collect(),
                ));
            }
        )*
    };
}

/// Rule 7 for homogeneous collections of common element types.
fn classify_typed_collection(value: &dyn Any) -> Option<Value> {
    typed_collections!(
        value: String,
        &'static str,
        bool,
        i64,
        i32,
        u64,
        u32,
        usize,
        f64,
        f32,
        JsonValue,
        Metadata,
    );
    None
}

/// Unsigned values that fit in `i64` become `Int`; larger ones fall back to
/// the nearest `f64`.
fn classify_unsigned(n: u64) -> Value {
    match i64::try_from(n) {
        Ok(i) => Value::Int(i),
        Err(_) => Value::Double(n as f64),
    }
}

fn classify_wide(n: i128) -> Value {
    if let Ok(i) = i64::try_from(n) {
        Value::Int(i)
    } else if let Ok(u) = u64::try_from(n) {
        classify_unsigned(u)
    } else {
        Value::Double(n as f64)
    }
}

fn classify_number(n: &Number) -> Value {
    if n.is_f64() {
        return n.as_f64().map_or(Value::Null, Value::Double);
    }
    if let Some(i) = n.as_i64() {
        return Value::Int(i);
    }
    if let Some(u) = n.as_u64() {
        return classify_unsigned(u);
    }
    n.as_f64().map_or(Value::Null, Value::Double)
}

impl Value {
    /// See [`from_dynamic`].
    pub fn from_dynamic(value: &dyn Any) -> Value {
        from_dynamic(value)
    }

    /// Unwrap into the dynamic host representation.
    ///
    /// `Null` becomes an explicit JSON null. Non-finite doubles have no JSON
    /// form and also project to null.
    pub fn to_native(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number(Number::from(*i)),
            Value::Double(d) => Number::from_f64(*d).map_or(JsonValue::Null, JsonValue::Number),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_native).collect()),
            Value::Object(metadata) => JsonValue::Object(metadata.to_native()),
        }
    }
}

impl Metadata {
    /// Build a container from a native map, converting every entry.
    pub fn from_native(map: Map<String, JsonValue>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }

    fn from_native_ref(map: &Map<String, JsonValue>) -> Self {
        map.iter()
            .map(|(key, value)| (key.clone(), Value::from(value)))
            .collect()
    }

    /// Build a container from type-erased entries, classifying each one with
    /// [`from_dynamic`].
    pub fn from_dynamic_map(map: &HashMap<String, Box<dyn Any>>) -> Self {
        map.iter()
            .map(|(key, value)| (key.clone(), from_dynamic(value.as_ref())))
            .collect()
    }

    /// Deep projection into a native map. Keys bound to `Null` stay present
    /// with an explicit null.
    pub fn to_native(&self) -> Map<String, JsonValue> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.to_native()))
            .collect()
    }
}

impl From<&JsonValue> for Value {
    fn from(native: &JsonValue) -> Self {
        match native {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => classify_number(n),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(Metadata::from_native_ref(map)),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(native: JsonValue) -> Self {
        match native {
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(Metadata::from_native(map)),
            other => Value::from(&other),
        }
    }
}

impl From<Map<String, JsonValue>> for Metadata {
    fn from(map: Map<String, JsonValue>) -> Self {
        Metadata::from_native(map)
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        value.to_native()
    }
}

impl From<Metadata> for JsonValue {
    fn from(metadata: Metadata) -> Self {
        JsonValue::Object(metadata.to_native())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        classify_unsigned(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        match u64::try_from(n) {
            Ok(n) => classify_unsigned(n),
            Err(_) => Value::Double(n as f64),
        }
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        match i128::try_from(n) {
            Ok(n) => classify_wide(n),
            Err(_) => Value::Double(n as f64),
        }
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        classify_wide(n)
    }
}

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        match u64::try_from(n) {
            Ok(n) => classify_unsigned(n),
            Err(_) => Value::Double(n as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Double(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Metadata> for Value {
    fn from(metadata: Metadata) -> Self {
        Value::Object(metadata)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    fn from(map: HashMap<String, V>) -> Self {
        Value::Object(map.into_iter().collect())
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(map: BTreeMap<String, V>) -> Self {
        Value::Object(map.into_iter().collect())
    }
}
