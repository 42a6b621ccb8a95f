//! JSON decoding of model output
//!
//! Models frequently wrap the requested object in prose ("Here is your
//! story: {...} Enjoy!"). [`extract_json`] starts at the first `{` and decodes
//! exactly one JSON value, ignoring whatever follows it. [`parse_json`] accepts
//! nothing but the JSON document itself.

use serde::de::DeserializeOwned;

use crate::error::InferenceError;

/// Decode the first JSON object embedded in `raw`
///
/// # Errors
///
/// Returns `InferenceError::InvalidResponse` when no `{` is present or the text
/// starting there is not a valid `T`.
///
/// # Examples
///
/// ```
/// use ai_core::extract_json;
///
/// let raw = "Ecco la storia: {\"intro\": \"C'era una volta\"} Buonanotte!";
/// let value: serde_json::Value = extract_json(raw).unwrap();
/// assert_eq!(value["intro"], "C'era una volta");
/// ```
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, InferenceError> {
    let start = raw
        .find('{')
        .ok_or_else(|| InferenceError::InvalidResponse("no JSON object in output".to_string()))?;

    let mut values = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<T>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(InferenceError::InvalidResponse(e.to_string())),
        None => Err(InferenceError::InvalidResponse(
            "empty JSON stream".to_string(),
        )),
    }
}

/// Decode `raw` as a single JSON document, surrounding whitespace allowed
///
/// # Errors
///
/// Returns `InferenceError::InvalidResponse` for any text around the document
/// or when it is not a valid `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, InferenceError> {
    Ok(serde_json::from_str(raw.trim())?)
}
