//! LSP method name constants for request/notification routing.
//!
//! Centralizes the method identifiers the server dispatches on so routing,
//! capability registration, and error reporting stay consistent.

/// Initialize request - first request from client to server
pub const INITIALIZE: &str = "initialize";

/// Initialized notification - sent after the initialize response
pub const INITIALIZED: &str = "initialized";

/// Shutdown request - graceful server shutdown
pub const SHUTDOWN: &str = "shutdown";

/// Exit notification - terminate server process
pub const EXIT: &str = "exit";

/// Request cancellation notification
pub const CANCEL_REQUEST: &str = "$/cancelRequest";

/// Document opened notification
pub const TEXT_DOCUMENT_DID_OPEN: &str = "textDocument/didOpen";

/// Document changed notification
pub const TEXT_DOCUMENT_DID_CHANGE: &str = "textDocument/didChange";

/// Document closed notification
pub const TEXT_DOCUMENT_DID_CLOSE: &str = "textDocument/didClose";

/// Document will-save notification
pub const TEXT_DOCUMENT_WILL_SAVE: &str = "textDocument/willSave";

/// Document saved notification
pub const TEXT_DOCUMENT_DID_SAVE: &str = "textDocument/didSave";

/// Code completion request
pub const TEXT_DOCUMENT_COMPLETION: &str = "textDocument/completion";

/// Hover request
pub const TEXT_DOCUMENT_HOVER: &str = "textDocument/hover";

/// Document highlight request
pub const TEXT_DOCUMENT_DOCUMENT_HIGHLIGHT: &str = "textDocument/documentHighlight";

/// Folding range request
pub const TEXT_DOCUMENT_FOLDING_RANGE: &str = "textDocument/foldingRange";

/// Document symbol request
pub const TEXT_DOCUMENT_DOCUMENT_SYMBOL: &str = "textDocument/documentSymbol";

/// Code action request
pub const TEXT_DOCUMENT_CODE_ACTION: &str = "textDocument/codeAction";

/// Symbol info extension request (single symbol under the cursor)
pub const TEXT_DOCUMENT_SYMBOL_INFO: &str = "textDocument/symbolInfo";

/// Execute a server-side command
pub const WORKSPACE_EXECUTE_COMMAND: &str = "workspace/executeCommand";

/// Server-to-client diagnostics publication
pub const TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

/// Server-to-client workspace edit application request
pub const WORKSPACE_APPLY_EDIT: &str = "workspace/applyEdit";
