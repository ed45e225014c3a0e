//! LSP transport layer for swift-lsp.
//!
//! Content-Length based message framing over a byte stream, per the LSP
//! Base Protocol:
//!
//! - [`read_message`] - read one framed message (decoded or malformed)
//! - [`write_message`] - write a framed response
//! - [`write_notification`] - write a framed notification
//! - [`write_request`] - write a framed server-initiated request
//! - [`log_response`] - stderr trace for outgoing responses

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod framing;

pub use framing::{
    IncomingFrame, log_response, read_message, write_message, write_notification, write_request,
};
