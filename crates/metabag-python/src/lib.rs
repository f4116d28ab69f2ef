//! # metabag-python
//!
//! Python bindings for metabag-core, built with PyO3.
//!
//! Exposes the following functions to Python as the `metabag` module:
//!
//! - `encode(obj)` -- Python dict/value -> tagged JSON string
//! - `decode(json)` -- tagged or plain JSON string -> Python dict/value
//! - `normalize(json)` -- tagged or plain JSON string -> plain JSON string
//!
//! Python objects are classified the same way as Rust host values: `None`
//! first, then `bool` (before `int`, since `bool` is an `int` subclass),
//! `float`, `int`, `str`, `list`/`tuple` and `dict`. Anything else becomes
//! null and is logged at debug level. `int`s beyond the signed 64-bit range
//! become the nearest float; past the `float` range that is an infinity,
//! which `encode` then rejects with `ValueError`.
//!
//! The `extension-module` feature is on by default. Run the unit tests with
//! `cargo test -p metabag-python --no-default-features` so they link against
//! libpython.

use metabag_core::{Metadata, Value};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

fn to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Value::Bool(b.is_true()));
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(Value::Double(obj.extract::<f64>()?));
    }
    if obj.is_instance_of::<PyInt>() {
        return classify_int(obj);
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::String(obj.extract::<String>()?));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        return list
            .iter()
            .map(|item| to_value(&item))
            .collect::<PyResult<Vec<_>>>()
            .map(Value::Array);
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return tuple
            .iter()
            .map(|item| to_value(&item))
            .collect::<PyResult<Vec<_>>>()
            .map(Value::Array);
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        return to_metadata(dict).map(Value::Object);
    }
    tracing::debug!(
        py_type = %obj.get_type(),
        "unsupported Python object coerced to null"
    );
    Ok(Value::Null)
}

/// Exact `i64` first, then `u64` (which overflows to the nearest double).
/// Anything wider is read from its decimal text, which saturates to an
/// infinity instead of raising `OverflowError` like `float(n)` would.
fn classify_int(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if let Ok(i) = obj.extract::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(u) = obj.extract::<u64>() {
        return Ok(Value::from(u));
    }
    let text = obj.str()?;
    text.to_cow()?
        .parse::<f64>()
        .map(Value::Double)
        .map_err(|e| PyValueError::new_err(format!("invalid int {text}: {e}")))
}

/// Dict keys must be `str`; any other key type is a `TypeError`.
fn to_metadata(dict: &Bound<'_, PyDict>) -> PyResult<Metadata> {
    let mut metadata = Metadata::new();
    for (key, value) in dict.iter() {
        if !key.is_instance_of::<PyString>() {
            return Err(PyTypeError::new_err(format!(
                "metadata keys must be str, got {}",
                key.get_type().name()?
            )));
        }
        metadata.set(key.extract::<String>()?, Some(to_value(&value)?));
    }
    Ok(metadata)
}

fn to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    Ok(match value {
        Value::Null => py.None().into_bound(py),
        Value::Bool(b) => PyBool::new(py, *b).to_owned().into_any(),
        Value::Int(i) => (*i).into_pyobject(py)?.into_any(),
        Value::Double(d) => PyFloat::new(py, *d).into_any(),
        Value::String(s) => PyString::new(py, s).into_any(),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(to_py(py, item)?)?;
            }
            list.into_any()
        }
        Value::Object(metadata) => metadata_to_py(py, metadata)?.into_any(),
    })
}

fn metadata_to_py<'py>(py: Python<'py>, metadata: &Metadata) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (key, value) in metadata {
        dict.set_item(key, to_py(py, value)?)?;
    }
    Ok(dict)
}

fn value_error(err: metabag_core::MetadataError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Encode a Python object into tagged metadata JSON.
///
/// Args:
///     obj: A dict (encoded as a container) or any other value.
///
/// Returns:
///     The tagged JSON string.
///
/// Raises:
///     TypeError: If a dict anywhere in `obj` has a non-str key.
#[pyfunction]
fn encode(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        return metabag_core::to_string(&to_metadata(dict)?).map_err(value_error);
    }
    metabag_core::to_string(&to_value(obj)?).map_err(value_error)
}

/// Decode tagged or plain metadata JSON into native Python objects.
///
/// Args:
///     json: A JSON string. A top-level object is read as a container.
///
/// Returns:
///     A dict for a top-level object, otherwise the decoded value.
///     Explicit nulls come back as `None` and keep their keys.
///
/// Raises:
///     ValueError: If the input is not valid JSON or a fragment matches no
///         known shape.
#[pyfunction]
fn decode<'py>(py: Python<'py>, json: &str) -> PyResult<Bound<'py, PyAny>> {
    let raw: serde_json::Value =
        serde_json::from_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    if raw.is_object() {
        let metadata = metabag_core::decode_metadata(&raw).map_err(value_error)?;
        return Ok(metadata_to_py(py, &metadata)?.into_any());
    }
    let value = metabag_core::decode_value(&raw).map_err(value_error)?;
    to_py(py, &value)
}

/// Decode tagged or plain metadata JSON into plain JSON.
///
/// Raises:
///     ValueError: If the input is not valid JSON or a fragment matches no
///         known shape.
#[pyfunction]
fn normalize(json: &str) -> PyResult<String> {
    metabag_core::decode(json).map_err(value_error)
}

/// The `metabag` Python module, implemented in Rust via PyO3.
#[pymodule]
fn metabag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    Ok(())
}
