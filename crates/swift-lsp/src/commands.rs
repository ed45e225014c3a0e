//! Server-side commands
//!
//! Commands the server executes itself carry the reserved `swift.lsp.`
//! identifier prefix. Each command type serializes as a single dictionary
//! argument that the client round-trips opaquely; decoding an incoming
//! `workspace/executeCommand` tries each registered command in turn.

use lsp_types::{Command, TextDocumentIdentifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier prefix reserved for server-handled commands.
pub const COMMAND_PREFIX: &str = "swift.lsp.";

/// A decoded server-side command.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCommand {
    /// Perform an analyzer-supplied refactoring.
    SemanticRefactor(SemanticRefactorCommand),
}

/// Registry of known command decoders, keyed by each decoder checking its
/// own identifier. New commands slot in without touching call sites.
const DECODERS: &[fn(&str, Option<&[Value]>) -> Option<ServerCommand>] =
    &[decode_semantic_refactor];

fn decode_semantic_refactor(command: &str, arguments: Option<&[Value]>) -> Option<ServerCommand> {
    SemanticRefactorCommand::try_decode(command, arguments).map(ServerCommand::SemanticRefactor)
}

/// Decode `command`/`arguments` into a known server command.
///
/// Returns `None` when the identifier is unknown, the first argument is
/// not a dictionary, or the dictionary fails schema validation.
pub fn decode_server_command(command: &str, arguments: Option<&[Value]>) -> Option<ServerCommand> {
    DECODERS.iter().find_map(|decode| decode(command, arguments))
}

/// The semantic-refactor command produced by the code-action layer.
///
/// `line`/`column` are the LSP position the action was requested at,
/// carried verbatim; `length` is the byte length of the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRefactorCommand {
    /// Human-readable action title.
    pub title: String,
    /// Analyzer refactoring-kind identifier
    /// (e.g. `source.refactoring.kind.localize.string`).
    pub action_string: String,
    /// 0-based request line.
    pub line: u32,
    /// 0-based UTF-16 request column.
    pub column: u32,
    /// Byte length of the requested range.
    pub length: u32,
    /// Document the refactoring applies to.
    pub text_document: TextDocumentIdentifier,
}

impl SemanticRefactorCommand {
    /// Stable identifier: the reserved prefix plus this command's suffix.
    pub const IDENTIFIER: &'static str = "swift.lsp.semantic.refactor.command";

    /// The LSP `Command` carrying this command as its single argument.
    pub fn as_command(&self) -> Command {
        Command::new(
            self.title.clone(),
            Self::IDENTIFIER.to_owned(),
            Some(vec![serde_json::json!(self)]),
        )
    }

    /// Decode from an incoming `workspace/executeCommand`. Any mismatch
    /// (identifier, argument shape, schema) yields `None`.
    pub fn try_decode(command: &str, arguments: Option<&[Value]>) -> Option<Self> {
        if command != Self::IDENTIFIER {
            return None;
        }
        let first = arguments?.first()?;
        if !first.is_object() {
            return None;
        }
        serde_json::from_value(first.clone()).ok()
    }
}
