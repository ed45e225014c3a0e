//! JSON-RPC error codes, response builders, and parameter extraction
//!
//! Standard JSON-RPC 2.0 error codes plus the LSP extensions the server
//! replies with, and the `req_*` helpers handlers use to pull required
//! fields out of raw params.

use crate::jsonrpc::{JsonRpcError, JsonRpcResponse};
use serde_json::Value;

/// Parse error - Invalid JSON was received
pub const PARSE_ERROR: i32 = -32700;

/// Invalid Request - The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;

/// Method not found - The method does not exist / is not available
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Invalid params - Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;

/// Internal error - Internal JSON-RPC error
pub const INTERNAL_ERROR: i32 = -32603;

/// Server not initialized - request received before `initialize`
pub const SERVER_NOT_INITIALIZED: i32 = -32002;

/// Request cancelled - client cancelled via `$/cancelRequest`
pub const REQUEST_CANCELLED: i32 = -32800;

/// Content modified - the operation was obsoleted by document changes
pub const CONTENT_MODIFIED: i32 = -32801;

/// Create an invalid-params error
pub fn invalid_params(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INVALID_PARAMS, message)
}

/// Create an internal error carrying a failure message
pub fn internal_error(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INTERNAL_ERROR, message)
}

/// Create a request cancelled error
pub fn request_cancelled_error() -> JsonRpcError {
    JsonRpcError::new(REQUEST_CANCELLED, "Request cancelled")
}

/// Create a complete cancelled response for `id`
pub fn cancelled_response(id: &Value) -> JsonRpcResponse {
    JsonRpcResponse::error(Some(id.clone()), request_cancelled_error())
}

/// Extract the required `textDocument.uri` from request params
pub fn req_uri(params: &Value) -> Result<&str, JsonRpcError> {
    params
        .pointer("/textDocument/uri")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid_params("Missing required parameter: textDocument.uri"))
}

/// Extract the required position (line, character) from request params
///
/// Returns `INVALID_PARAMS` if line or character are missing or overflow u32.
pub fn req_position(params: &Value) -> Result<(u32, u32), JsonRpcError> {
    let line = params
        .pointer("/position/line")
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid_params("Missing required parameter: position.line"))?;
    let character = params
        .pointer("/position/character")
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid_params("Missing required parameter: position.character"))?;
    Ok((line, character))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_uri_and_position() -> Result<(), JsonRpcError> {
        let params = json!({
            "textDocument": {"uri": "file:///a.swift"},
            "position": {"line": 4, "character": 11}
        });
        assert_eq!(req_uri(&params)?, "file:///a.swift");
        assert_eq!(req_position(&params)?, (4, 11));
        Ok(())
    }

    #[test]
    fn missing_fields_are_invalid_params() {
        let params = json!({"textDocument": {}});
        assert_eq!(req_uri(&params).map_err(|e| e.code), Err(INVALID_PARAMS));
        assert_eq!(req_position(&params).map_err(|e| e.code), Err(INVALID_PARAMS));
    }

    #[test]
    fn cancelled_response_carries_the_lsp_code() {
        let response = cancelled_response(&json!(9));
        assert_eq!(response.error.map(|e| e.code), Some(REQUEST_CANCELLED));
        assert_eq!(response.id, Some(json!(9)));
    }
}
