//! Conversions shared by the WASM bindings.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::JsValue;

use crate::error::MentorError;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
pub(crate) fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

impl From<MentorError> for JsValue {
    fn from(err: MentorError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: $crate::error::MentorError| ::wasm_bindgen::JsValue::from(e))
    };
}

pub(crate) use js_result;
