//! WASM bindings for metabag-core.
//!
//! Exposes `encode`, `decode` and `keys` as `#[wasm_bindgen]` functions
//! that can be called from JavaScript/TypeScript. Built with
//! `wasm-bindgen-cli`:
//!
//! ```sh
//! cargo build -p metabag-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/metabag_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Encode a plain JSON document into tagged metadata JSON.
///
/// Returns the tagged JSON string, or throws a JS error if the input is not
/// valid JSON.
#[wasm_bindgen]
pub fn encode(json: &str) -> std::result::Result<String, JsValue> {
    metabag_core::encode(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode tagged (or plain) metadata JSON back into compact plain JSON.
///
/// Throws a JS error naming the expected type and document path when a
/// fragment matches no known shape.
#[wasm_bindgen]
pub fn decode(json: &str) -> std::result::Result<String, JsValue> {
    metabag_core::decode(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Return the top-level keys of a metadata document, sorted.
#[wasm_bindgen]
pub fn keys(json: &str) -> std::result::Result<Vec<String>, JsValue> {
    let metadata = metabag_core::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(metadata.keys().map(str::to_string).collect())
}
