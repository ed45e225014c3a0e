//! `workspace/executeCommand`
//!
//! Decodes the incoming command against the registry and executes it.
//! Semantic refactorings run through the analyzer; resulting edits are
//! forwarded to the client as a `workspace/applyEdit` request whose reply
//! is not awaited.

use lsp_types::TextEdit;
use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, invalid_params, methods};
use swift_position_tracking::LineTable;
use swift_sourcekitd::{Keys, SkValue};

use crate::commands::{SemanticRefactorCommand, ServerCommand, decode_server_command};
use crate::convert::position_from_offset;
use crate::runtime::{LspServer, Responder};
use crate::util::file_path_of;

impl LspServer {
    pub(crate) fn handle_execute_command(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let Some(command) = params.get("command").and_then(Value::as_str) else {
            return responder.err(invalid_params("Missing required parameter: command"));
        };
        let arguments = params.get("arguments").and_then(Value::as_array).cloned();

        match decode_server_command(command, arguments.as_deref()) {
            Some(ServerCommand::SemanticRefactor(refactor)) => {
                self.execute_semantic_refactor(refactor, responder);
            }
            None => {
                responder.err(invalid_params(format!("unknown command: {command}")));
            }
        }
    }

    fn execute_semantic_refactor(
        &mut self,
        command: SemanticRefactorCommand,
        responder: Responder,
    ) {
        let uri = command.text_document.uri.as_str().to_owned();
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "executeCommand") else {
            return responder.ok(Value::Null);
        };
        // The command carries the LSP position verbatim; the analyzer
        // wants 1-based lines and 1-based UTF-8 columns.
        let Some(offset) = snapshot.utf8_offset_of(command.line, command.column) else {
            eprintln!(
                "[swift-lsp:executeCommand] stale position {}:{} in {uri}",
                command.line, command.column
            );
            return responder.ok(Value::Null);
        };
        let Some(line_start) = snapshot.line_table().line_start(command.line) else {
            return responder.ok(Value::Null);
        };
        let column_utf8 = (offset - line_start) as u32;

        let args = self.compiler_arguments(&uri, &snapshot.document().language);
        let action = self.bridge.intern(&command.action_string);
        let request = self.bridge.semantic_refactoring(
            action,
            &file_path_of(&uri),
            command.line + 1,
            column_utf8 + 1,
            command.length as usize,
            args.as_deref(),
        );

        let title = command.title;
        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    if responder.is_cancelled() {
                        return responder.cancelled();
                    }
                    let response = match result {
                        Ok(response) => response,
                        Err(err) => return responder.err(internal_error(err.to_string())),
                    };
                    let edits = refactoring_edits(
                        server.bridge.keys(),
                        snapshot.line_table(),
                        &response,
                    );
                    if !edits.is_empty() {
                        let mut changes = serde_json::Map::new();
                        changes.insert(uri, json!(edits));
                        let id = server.next_request_id();
                        server.outbound.request(
                            id,
                            methods::WORKSPACE_APPLY_EDIT,
                            json!({
                                "label": title,
                                "edit": { "changes": changes },
                            }),
                        );
                    }
                    responder.ok(Value::Null);
                });
            }),
        );
    }
}

/// Translate the categorized edits of a refactoring response. Native
/// coordinates are 1-based lines and UTF-8 columns; everything goes back
/// through the line table.
fn refactoring_edits(keys: &Keys, table: &LineTable, response: &SkValue) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for category in response.array(keys.categorized_edits).unwrap_or(&[]) {
        for edit in category.array(keys.edits).unwrap_or(&[]) {
            let Some(new_text) = edit.string(keys.text) else { continue };
            let Some(range) = (|| {
                let start = native_offset(keys, table, edit, keys.line, keys.column)?;
                let end = native_offset(keys, table, edit, keys.endline, keys.endcolumn)?;
                Some(lsp_types::Range {
                    start: position_from_offset(table, start)?,
                    end: position_from_offset(table, end)?,
                })
            })() else {
                continue;
            };
            edits.push(TextEdit { range, new_text: new_text.to_owned() });
        }
    }
    edits
}

fn native_offset(
    keys: &Keys,
    table: &LineTable,
    edit: &SkValue,
    line_key: swift_sourcekitd::Uid,
    column_key: swift_sourcekitd::Uid,
) -> Option<usize> {
    let line = u32::try_from(edit.int(line_key)?).ok()?.checked_sub(1)?;
    let column = usize::try_from(edit.int(column_key)?).ok()?.checked_sub(1)?;
    let start = table.line_start(line)?;
    let offset = start + column;
    // Validate the offset lands inside the line on a scalar boundary.
    table.utf16_column(line, column)?;
    Some(offset)
}
