//! # metabag-core
//!
//! A typed container for semi-structured metadata: a bag of named values that
//! can be built from untyped host data, edited by key, and written to and read
//! back from JSON without losing track of which values were integers, doubles,
//! strings or explicit nulls.
//!
//! ## Quick start
//!
//! ```rust
//! use metabag_core::{Metadata, Value};
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("model", "orca-mini");
//! metadata.insert("maxTokens", 1024);
//! metadata.insert("notes", Value::Null);
//!
//! // Tagged wire form: every value names its own type.
//! let json = metabag_core::to_string(&metadata).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"maxTokens":{"int":1024},"model":{"string":"orca-mini"},"notes":{"nil":null}}"#
//! );
//!
//! // Reading it back restores the same container.
//! let back = metabag_core::from_str(&json).unwrap();
//! assert_eq!(back, metadata);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the `Value` sum type and its tags
//! - [`metadata`] — the `Metadata` container
//! - [`convert`] — host data ⇄ `Value` classification
//! - [`key`] — `DynamicKey` and `CodingPath`
//! - [`encoder`] — tagged serialization
//! - [`decoder`] — two-phase (tagged, then untagged) deserialization
//! - [`error`] — error types

pub mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod key;
pub mod metadata;
pub mod value;

pub use convert::from_dynamic;
pub use decoder::{decode, decode_metadata, decode_value, from_slice, from_str, value_from_str};
pub use encoder::{encode, to_string, to_string_pretty, to_vec};
pub use error::{MetadataError, Result};
pub use key::{CodingPath, DynamicKey};
pub use metadata::Metadata;
pub use value::{Tag, Value};
