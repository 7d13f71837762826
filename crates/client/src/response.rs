//! HTTP response wrapper

use serde_json::Value;

/// A completed HTTP exchange
///
/// The body is read in full and parsed as JSON once on construction; a body
/// that is empty or not JSON leaves [`json`](ApiResponse::json) as `None`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Vec<u8>,
    json: Option<Value>,
}

impl ApiResponse {
    /// Build from a status code and raw body bytes
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let json = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(&body).ok()
        };
        Self { status, body, json }
    }

    /// Build from a status code and an already-parsed JSON body
    pub fn from_json(status: u16, json: Value) -> Self {
        Self {
            status,
            body: json.to_string().into_bytes(),
            json: Some(json),
        }
    }

    /// Build a response with no body
    pub fn empty(status: u16) -> Self {
        Self::new(status, Vec::new())
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is one of `expected`
    pub fn status_in(&self, expected: &[u16]) -> bool {
        expected.contains(&self.status)
    }

    /// Parsed JSON body
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Body as lossy UTF-8, truncated for logging
    pub fn body_preview(&self, max: usize) -> String {
        let text = String::from_utf8_lossy(&self.body);
        if text.chars().count() <= max {
            text.into_owned()
        } else {
            let truncated: String = text.chars().take(max).collect();
            format!("{}...", truncated)
        }
    }
}
