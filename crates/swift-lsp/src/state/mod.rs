//! Server-side state: open documents and configuration.

mod config;
mod documents;

pub use config::ServerConfig;
pub use documents::{Document, DocumentError, DocumentManager, DocumentSnapshot};
