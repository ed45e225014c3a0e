//! JSON-RPC 2.0 message types
//!
//! Incoming message envelope plus outgoing response and error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 incoming message envelope.
///
/// The same envelope carries requests (`id` + `method`), notifications
/// (`method` only), and replies to server-initiated requests (`id` with
/// `result` or `error` and no `method`).
#[derive(Debug, Deserialize)]
pub struct JsonRpcMessage {
    /// JSON-RPC version (always "2.0")
    #[serde(rename = "jsonrpc")]
    pub _jsonrpc: String,

    /// Request identifier, preserved verbatim for the reply. Integer or
    /// string; `None` for notifications.
    #[serde(default)]
    pub id: Option<Value>,

    /// Method name to invoke; absent on replies to server requests.
    #[serde(default)]
    pub method: Option<String>,

    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,

    /// Success payload of a client reply
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload of a client reply
    #[serde(default)]
    pub error: Option<Value>,
}

/// JSON-RPC 2.0 response message sent to the client.
///
/// Either `result` or `error` is set, never both.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Request identifier (matches the request's id)
    pub id: Option<Value>,

    /// Success result (mutually exclusive with error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error result (mutually exclusive with result)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }

    /// Create a null result response (for methods that return nothing)
    pub fn null(id: Option<Value>) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(Value::Null), error: None }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize, Clone)]
pub struct JsonRpcError {
    /// Error code (see the constants in `errors`)
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Additional error data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}
