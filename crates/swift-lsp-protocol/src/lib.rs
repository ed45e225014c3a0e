//! Protocol layer for the Swift language server.
//!
//! JSON-RPC 2.0 message envelopes, LSP method name constants, error codes
//! with response builders, parameter extraction helpers, and capability
//! negotiation (what the server advertises, what the client supports).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod capabilities;
mod errors;
mod jsonrpc;
/// LSP method name constants.
pub mod methods;

pub use capabilities::{ClientCapabilities, server_capabilities};
pub use errors::{
    CONTENT_MODIFIED, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, REQUEST_CANCELLED, SERVER_NOT_INITIALIZED, cancelled_response, internal_error,
    invalid_params, req_position, req_uri, request_cancelled_error,
};
pub use jsonrpc::{JsonRpcError, JsonRpcMessage, JsonRpcResponse};
