//! Raw API responses

use serde_json::Value;

/// Body of a completed API call
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(Value),
    /// Body that is not valid JSON, kept verbatim
    Text(String),
}

/// A completed call: HTTP status plus body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Wraps a raw body, parsing it as JSON when possible
    pub fn new(status: u16, raw_body: String) -> Self {
        let body = match serde_json::from_str::<Value>(&raw_body) {
            Ok(json) => ResponseBody::Json(json),
            Err(_) => ResponseBody::Text(raw_body),
        };
        Self { status, body }
    }

    /// Status is one of the accepted success codes (200, 201)
    pub fn is_success_status(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// JSON body carries `"Sucesso": true`
    pub fn reports_success(&self) -> bool {
        match &self.body {
            ResponseBody::Json(json) => json.get("Sucesso").and_then(Value::as_bool) == Some(true),
            ResponseBody::Text(_) => false,
        }
    }

    /// Body rendered back to text for log lines
    pub fn body_text(&self) -> String {
        match &self.body {
            ResponseBody::Json(json) => json.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }
}
