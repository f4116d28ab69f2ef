//! Runtime keys for documents whose field names are only known at runtime.
//!
//! [`DynamicKey`] is what the container encoder writes each entry under and
//! what the decoder discovers while walking an incoming object. A sequence of
//! keys forms a [`CodingPath`], used to point at the failing fragment when a
//! decode fails.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A field name that is not fixed at compile time.
///
/// Built from a string it keeps that string verbatim. Built from an integer
/// index its string form is the decimal text and the integer is kept as well,
/// so array positions can be told apart from object fields in paths.
/// Equality and hashing only look at the string form.
#[derive(Debug, Clone)]
pub struct DynamicKey {
    string_value: String,
    int_value: Option<i64>,
}

impl DynamicKey {
    /// Key for a named field. Never fails.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
            int_value: None,
        }
    }

    /// Key for a positional index. Never fails.
    pub fn from_int(value: i64) -> Self {
        Self {
            string_value: value.to_string(),
            int_value: Some(value),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string_value
    }

    pub fn as_int(&self) -> Option<i64> {
        self.int_value
    }

    pub fn into_string(self) -> String {
        self.string_value
    }
}

impl PartialEq for DynamicKey {
    fn eq(&self, other: &Self) -> bool {
        self.string_value == other.string_value
    }
}

impl Eq for DynamicKey {}

impl Hash for DynamicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string_value.hash(state);
    }
}

impl fmt::Display for DynamicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value)
    }
}

impl From<&str> for DynamicKey {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl From<String> for DynamicKey {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl From<i64> for DynamicKey {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl From<usize> for DynamicKey {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(index) => Self::from_int(index),
            Err(_) => Self::from_string(value.to_string()),
        }
    }
}

impl Serialize for DynamicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.string_value)
    }
}

impl<'de> Deserialize<'de> for DynamicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DynamicKeyVisitor;

        impl<'de> Visitor<'de> for DynamicKeyVisitor {
            type Value = DynamicKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer key")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DynamicKey::from_string(value))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DynamicKey::from_string(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DynamicKey::from_int(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                match i64::try_from(value) {
                    Ok(index) => Ok(DynamicKey::from_int(index)),
                    Err(_) => Ok(DynamicKey::from_string(value.to_string())),
                }
            }
        }

        deserializer.deserialize_any(DynamicKeyVisitor)
    }
}

/// Location of a fragment inside a document, root first.
///
/// Rendered as `$` for the root, then `.name` for object fields and `[n]`
/// for array positions, e.g. `$.ratings[1].score`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingPath {
    keys: Vec<DynamicKey>,
}

impl CodingPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[DynamicKey] {
        &self.keys
    }

    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn push(&mut self, key: DynamicKey) {
        self.keys.push(key);
    }

    pub(crate) fn pop(&mut self) {
        self.keys.pop();
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for key in &self.keys {
            match key.as_int() {
                Some(index) => write!(f, "[{index}]")?,
                None => write!(f, ".{}", key.as_str())?,
            }
        }
        Ok(())
    }
}
