//! Error types for metadata encoding and decoding operations.

use crate::key::CodingPath;
use thiserror::Error;

/// Errors that can occur while reading or writing metadata documents.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The input bytes were not a well-formed JSON document, or the
    /// serializer rejected the output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither a tagged shape nor any untagged fallback matched the input.
    /// `path` points at the offending fragment (`$` is the document root).
    #[error("type mismatch at {path}: expected {expected}")]
    TypeMismatch {
        expected: &'static str,
        path: CodingPath,
    },
}

impl MetadataError {
    pub(crate) fn type_mismatch(expected: &'static str, path: &CodingPath) -> Self {
        MetadataError::TypeMismatch {
            expected,
            path: path.clone(),
        }
    }
}

/// Convenience alias used throughout metabag-core.
pub type Result<T> = std::result::Result<T, MetadataError>;
