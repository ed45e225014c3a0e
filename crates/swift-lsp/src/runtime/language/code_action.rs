//! Code actions
//!
//! Kind-tagged providers run concurrently for each request; their outputs
//! are concatenated in provider order and encoded according to the
//! client's `codeActionLiteralSupport`.

use std::sync::Arc;

use lsp_types::{CodeAction, CodeActionKind, Range};
use parking_lot::Mutex;
use serde_json::{Value, json};
use swift_lsp_protocol::{ClientCapabilities, invalid_params, req_uri};
use swift_sourcekitd::SkValue;

use crate::commands::SemanticRefactorCommand;
use crate::runtime::{LspServer, Responder};
use crate::util::{file_path_of, parse_uri};

/// One registered provider: runs iff the request's `context.only` filter
/// admits its kind.
struct CodeActionProvider {
    kind: CodeActionKind,
    run: fn(&mut LspServer, &CodeActionInputs, ProviderCallback),
}

type ProviderCallback = Box<dyn FnOnce(&mut LspServer, Vec<CodeAction>) + Send>;

const PROVIDERS: &[CodeActionProvider] = &[CodeActionProvider {
    kind: CodeActionKind::REFACTOR,
    run: LspServer::semantic_refactor_provider,
}];

#[derive(Debug, Clone)]
struct CodeActionInputs {
    uri: String,
    range: Range,
}

/// State shared by the provider callbacks until the last one lands.
struct ProviderJoin {
    slots: Vec<Option<Vec<CodeAction>>>,
    remaining: usize,
    responder: Option<Responder>,
    capabilities: ClientCapabilities,
}

impl LspServer {
    pub(crate) fn handle_code_action(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let uri = match req_uri(&params) {
            Ok(uri) => uri.to_owned(),
            Err(err) => return responder.err(err),
        };
        let range: Range = match params.get("range").cloned().map(serde_json::from_value) {
            Some(Ok(range)) => range,
            _ => return responder.err(invalid_params("Missing required parameter: range")),
        };
        let only: Option<Vec<String>> = params
            .pointer("/context/only")
            .and_then(Value::as_array)
            .map(|kinds| kinds.iter().filter_map(|k| k.as_str().map(str::to_owned)).collect());

        let inputs = CodeActionInputs { uri, range };
        let selected: Vec<&CodeActionProvider> =
            PROVIDERS.iter().filter(|provider| kind_requested(only.as_deref(), &provider.kind)).collect();

        if selected.is_empty() {
            let encoded = encode_code_actions(&self.client_capabilities, Vec::new());
            return responder.ok(encoded);
        }

        let join = Arc::new(Mutex::new(ProviderJoin {
            slots: (0..selected.len()).map(|_| None).collect(),
            remaining: selected.len(),
            responder: Some(responder),
            capabilities: self.client_capabilities.clone(),
        }));

        for (slot, provider) in selected.into_iter().enumerate() {
            let join = Arc::clone(&join);
            (provider.run)(
                self,
                &inputs,
                Box::new(move |_server, actions| {
                    let mut join = join.lock();
                    join.slots[slot] = Some(actions);
                    join.remaining -= 1;
                    if join.remaining > 0 {
                        return;
                    }
                    let actions: Vec<CodeAction> =
                        join.slots.drain(..).flatten().flatten().collect();
                    if let Some(responder) = join.responder.take() {
                        if responder.is_cancelled() {
                            responder.cancelled();
                        } else {
                            let encoded = encode_code_actions(&join.capabilities, actions);
                            responder.ok(encoded);
                        }
                    }
                }),
            );
        }
    }

    /// Provider for analyzer-supplied semantic refactorings.
    fn semantic_refactor_provider(
        &mut self,
        inputs: &CodeActionInputs,
        done: ProviderCallback,
    ) {
        let Some(snapshot) = self.documents.latest_snapshot(&inputs.uri) else {
            eprintln!("[swift-lsp:codeAction] no open document for {}", inputs.uri);
            return done(self, Vec::new());
        };
        let start =
            snapshot.utf8_offset_of(inputs.range.start.line, inputs.range.start.character);
        let Some(start) = start else {
            return done(self, Vec::new());
        };
        let end = snapshot
            .utf8_offset_of(inputs.range.end.line, inputs.range.end.character)
            .unwrap_or(start);
        let length = end.saturating_sub(start);

        let args = self.compiler_arguments(&inputs.uri, &snapshot.document().language);
        let request =
            self.bridge.cursor_info(&file_path_of(&inputs.uri), start, args.as_deref(), true);

        let events = self.events.clone();
        let inputs = inputs.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    let actions = match result {
                        Ok(response) => server.refactor_actions(&response, &inputs, length),
                        Err(err) => {
                            eprintln!("[swift-lsp:codeAction] cursor info failed: {err}");
                            Vec::new()
                        }
                    };
                    done(server, actions);
                });
            }),
        );
    }

    fn refactor_actions(
        &self,
        response: &SkValue,
        inputs: &CodeActionInputs,
        length: usize,
    ) -> Vec<CodeAction> {
        let keys = self.bridge.keys();
        response
            .array(keys.refactor_actions)
            .unwrap_or(&[])
            .iter()
            .filter_map(|entry| {
                let title = entry.string(keys.actionname)?;
                let action_string = self.bridge.uid_string(entry.uid(keys.actionuid)?)?;
                let command = SemanticRefactorCommand {
                    title: title.to_owned(),
                    action_string,
                    line: inputs.range.start.line,
                    column: inputs.range.start.character,
                    length: length as u32,
                    text_document: lsp_types::TextDocumentIdentifier {
                        uri: parse_uri(&inputs.uri),
                    },
                };
                Some(CodeAction {
                    title: title.to_owned(),
                    kind: Some(CodeActionKind::REFACTOR),
                    command: Some(command.as_command()),
                    ..CodeAction::default()
                })
            })
            .collect()
    }
}

/// Whether the request's `context.only` filter admits `kind`. An absent
/// filter admits every provider; a listed kind also admits its
/// sub-kinds (`refactor` admits `refactor.extract`).
fn kind_requested(only: Option<&[String]>, kind: &CodeActionKind) -> bool {
    let Some(only) = only else {
        return true;
    };
    only.iter().any(|requested| {
        kind.as_str() == requested
            || kind
                .as_str()
                .strip_prefix(requested.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Encode `actions` for the client.
///
/// With `codeActionLiteralSupport`, actions whose kind is unspecified or
/// listed in the client's `valueSet` are returned as `CodeAction[]`.
/// Legacy clients get the `Command[]` shape; actions without a command
/// are discarded.
pub(crate) fn encode_code_actions(
    capabilities: &ClientCapabilities,
    actions: Vec<CodeAction>,
) -> Value {
    if capabilities.code_action_literal_support {
        let value_set = &capabilities.code_action_value_set;
        let literals: Vec<CodeAction> = actions
            .into_iter()
            .filter(|action| match &action.kind {
                None => true,
                Some(kind) => value_set.iter().any(|allowed| allowed == kind.as_str()),
            })
            .collect();
        json!(literals)
    } else {
        let commands: Vec<lsp_types::Command> =
            actions.into_iter().filter_map(|action| action.command).collect();
        json!(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::Command;
    use pretty_assertions::assert_eq;

    fn action(title: &str, kind: Option<CodeActionKind>, command: Option<Command>) -> CodeAction {
        CodeAction { title: title.to_owned(), kind, command, ..CodeAction::default() }
    }

    fn literal_caps(value_set: &[&str]) -> ClientCapabilities {
        ClientCapabilities {
            code_action_literal_support: true,
            code_action_value_set: value_set.iter().map(|s| (*s).to_owned()).collect(),
            ..ClientCapabilities::default()
        }
    }

    fn matrix_actions() -> Vec<CodeAction> {
        vec![
            action("Unspecified", None, None),
            action("Refactor", Some(CodeActionKind::REFACTOR), None),
            action("Quickfix", Some(CodeActionKind::QUICKFIX), None),
        ]
    }

    #[test]
    fn empty_value_set_keeps_only_unkinded_actions() {
        let encoded = encode_code_actions(&literal_caps(&[]), matrix_actions());
        assert_eq!(encoded, json!([{ "title": "Unspecified" }]));
    }

    #[test]
    fn value_set_admits_matching_kinds() {
        let encoded = encode_code_actions(&literal_caps(&["refactor"]), matrix_actions());
        assert_eq!(
            encoded,
            json!([
                { "title": "Unspecified" },
                { "title": "Refactor", "kind": "refactor" },
            ])
        );
    }

    #[test]
    fn legacy_clients_get_commands_and_lose_commandless_actions() {
        let command = Command::new("2".to_owned(), "swift.lsp.test".to_owned(), None);
        let actions = vec![
            action("1", None, None),
            action("2", None, Some(command.clone())),
        ];
        let encoded = encode_code_actions(&ClientCapabilities::default(), actions);
        assert_eq!(encoded, json!([command]));
    }

    #[test]
    fn only_filter_selects_providers_hierarchically() {
        let refactor = CodeActionKind::REFACTOR;
        assert!(kind_requested(None, &refactor));
        assert!(kind_requested(Some(&["refactor".to_owned()]), &refactor));
        assert!(!kind_requested(Some(&["quickfix".to_owned()]), &refactor));
        let extract = CodeActionKind::REFACTOR_EXTRACT;
        assert!(kind_requested(Some(&["refactor".to_owned()]), &extract));
    }
}
