//! Response envelope helpers
//!
//! The API may return payloads either bare (`{"id": 1}`) or wrapped
//! (`{"data": {"id": 1}}`), and lists either as a bare array or as a page
//! object with a `content` array. Each helper tries the known locations in
//! order and takes the first truthy value.

use serde_json::Value;

use crate::models::ResourceId;

/// JSON pointers tried for the login token
pub const ACCESS_TOKEN_POINTERS: [&str; 2] = ["/accessToken", "/data/accessToken"];

/// JSON pointers tried for a created resource's id
pub const RESOURCE_ID_POINTERS: [&str; 2] = ["/id", "/data/id"];

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_truthy<'a>(body: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .find(|v| is_truthy(v))
}

/// Access token from a login response
///
/// Strings are used verbatim; any other truthy value is sent as its JSON text.
pub fn access_token(body: &Value) -> Option<String> {
    first_truthy(body, &ACCESS_TOKEN_POINTERS).map(|token| match token {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Items of a list response
///
/// Uses `content` when present and truthy, otherwise the body itself. Returns
/// `None` when the chosen value is not an array.
pub fn collection(body: &Value) -> Option<&[Value]> {
    let list = match body.get("content") {
        Some(content) if is_truthy(content) => content,
        _ => body,
    };
    list.as_array().map(Vec::as_slice)
}

/// Id of a created resource
pub fn resource_id(body: &Value) -> Option<ResourceId> {
    RESOURCE_ID_POINTERS
        .iter()
        .filter_map(|p| body.pointer(p))
        .find_map(ResourceId::from_value)
}
