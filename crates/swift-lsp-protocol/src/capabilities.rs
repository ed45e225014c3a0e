//! Capability negotiation
//!
//! What the server advertises on `initialize` and the slice of client
//! capabilities the handlers actually consult.

use serde_json::{Value, json};

/// Client capabilities the feature handlers care about.
///
/// Extracted once from the `initialize` params and kept on the server.
/// Everything defaults to the most conservative interpretation when the
/// client stays silent.
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    /// Client understands `CodeAction` literals in code action responses.
    /// When false the server falls back to the legacy `Command[]` shape.
    pub code_action_literal_support: bool,
    /// Code action kinds the client is prepared to handle, from
    /// `codeActionLiteralSupport.codeActionKind.valueSet`.
    pub code_action_value_set: Vec<String>,
    /// Client only renders whole-line folding ranges.
    pub line_folding_only: bool,
    /// Maximum number of folding ranges the client will accept.
    pub folding_range_limit: Option<usize>,
}

impl ClientCapabilities {
    /// Extract the supported subset from `initialize` request params.
    pub fn from_initialize(params: &Value) -> Self {
        let caps = params.pointer("/capabilities/textDocument").cloned().unwrap_or(Value::Null);

        let literal = caps.pointer("/codeAction/codeActionLiteralSupport");
        let value_set = literal
            .and_then(|v| v.pointer("/codeActionKind/valueSet"))
            .and_then(|v| v.as_array())
            .map(|kinds| {
                kinds.iter().filter_map(|k| k.as_str().map(str::to_owned)).collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            code_action_literal_support: literal.is_some(),
            code_action_value_set: value_set,
            line_folding_only: caps
                .pointer("/foldingRange/lineFoldingOnly")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            folding_range_limit: caps
                .pointer("/foldingRange/rangeLimit")
                .and_then(|v| v.as_u64())
                .map(|n| n as usize),
        }
    }
}

/// The capability set advertised in the `initialize` response.
pub fn server_capabilities() -> Value {
    json!({
        "textDocumentSync": {
            "openClose": true,
            "change": 2,
            "willSave": true,
            "willSaveWaitUntil": false,
            "save": { "includeText": false },
        },
        "completionProvider": {
            "resolveProvider": false,
            "triggerCharacters": ["."],
        },
        "hoverProvider": true,
        "documentHighlightProvider": true,
        "foldingRangeProvider": true,
        "documentSymbolProvider": true,
        "codeActionProvider": {
            "codeActionKinds": [],
        },
        "executeCommandProvider": {
            "commands": ["swift.lsp.semantic.refactor.command"],
        },
    })
}
