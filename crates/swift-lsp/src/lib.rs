//! Swift Language Server runtime
//!
//! An LSP endpoint over the native Swift semantic analyzer. The server
//! mirrors client buffers into immutable snapshots, routes JSON-RPC
//! messages to typed handlers on a single dispatcher queue, forwards
//! semantic queries through the analyzer bridge, and translates responses
//! (diagnostics, completions, symbols, folding, code actions) back into
//! LSP shapes.
//!
//! # Architecture
//!
//! - [`state`] - document manager and server configuration
//! - [`runtime`] - dispatcher loop, outbound queue, feature handlers
//! - [`commands`] - server-side command types (`swift.lsp.` prefix)
//! - [`build_system`] - collaborator yielding per-file compiler arguments
//! - [`convert`] - analyzer UID vocabulary to `lsp_types` translation
//! - [`util`] - URI helpers
//!
//! The entry point for a real transport is [`run_stdio`]; tests drive
//! [`LspServer`] directly over channel-backed queues with the bridge's
//! scripted service.

#![deny(unsafe_code)]

pub mod build_system;
pub mod commands;
pub mod convert;
mod execute_command;
pub mod runtime;
pub mod state;
pub mod util;

pub use runtime::{Event, EventSender, LspServer, Outbound, Outgoing, run, run_stdio};
pub use state::ServerConfig;
