//! Bridge failure modes.

/// Errors surfaced by the analyzer service.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The analyzer rejected or failed the request.
    #[error("analyzer request failed: {0}")]
    RequestFailed(String),

    /// The analyzer connection went away mid-request.
    #[error("analyzer connection interrupted")]
    ConnectionInterrupted,

    /// The request was cancelled through its handle.
    #[error("analyzer request cancelled")]
    Cancelled,
}
