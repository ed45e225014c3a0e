//! Code completion
//!
//! The completer is offset-addressed: before asking the analyzer, the
//! requested position is rewound to the start of the identifier under the
//! cursor. Native placeholder markers (`<#…#>`) in insert texts are
//! rewritten to LSP snippet slots.

use lsp_types::{CompletionItem, InsertTextFormat};
use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, req_position, req_uri};
use swift_sourcekitd::SkValue;

use crate::convert;
use crate::runtime::{LspServer, Responder};
use crate::util::file_path_of;

impl LspServer {
    pub(crate) fn handle_completion(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let (uri, position) = match (req_uri(&params), req_position(&params)) {
            (Ok(uri), Ok(position)) => (uri.to_owned(), position),
            (Err(err), _) | (_, Err(err)) => return responder.err(err),
        };
        let empty = || json!({ "isIncomplete": false, "items": [] });
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "completion") else {
            return responder.ok(empty());
        };
        let Some(cursor) = snapshot.utf8_offset_of(position.0, position.1) else {
            eprintln!(
                "[swift-lsp:completion] position {}:{} outside {uri}",
                position.0, position.1
            );
            return responder.ok(empty());
        };

        let offset = rewind_to_identifier_start(snapshot.text(), cursor);
        let args = self.compiler_arguments(&uri, &snapshot.document().language);
        let request = self.bridge.code_complete(
            &file_path_of(&uri),
            offset,
            snapshot.text(),
            args.as_deref(),
        );

        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    if responder.is_cancelled() {
                        return responder.cancelled();
                    }
                    match result {
                        Ok(response) => {
                            let items = server.completion_items(&response);
                            responder.ok(json!({ "isIncomplete": false, "items": items }));
                        }
                        Err(err) => responder.err(internal_error(err.to_string())),
                    }
                });
            }),
        );
    }

    fn completion_items(&self, response: &SkValue) -> Vec<CompletionItem> {
        let keys = self.bridge.keys();
        let values = self.bridge.values();
        let Some(results) = response.array(keys.results) else {
            return Vec::new();
        };
        results
            .iter()
            .filter_map(|entry| {
                let label = entry.string(keys.description).or_else(|| entry.string(keys.name))?;
                let insert_text =
                    entry.string(keys.sourcetext).map(rewrite_placeholders);
                Some(CompletionItem {
                    label: label.to_owned(),
                    kind: Some(convert::completion_item_kind(values, entry.uid(keys.kind))),
                    detail: entry.string(keys.typename).map(str::to_owned),
                    filter_text: entry.string(keys.name).map(str::to_owned),
                    insert_text,
                    insert_text_format: Some(InsertTextFormat::SNIPPET),
                    ..CompletionItem::default()
                })
            })
            .collect()
    }
}

/// Rewind `offset` across identifier characters (letters, digits,
/// underscore) to the start of the identifier under the cursor.
pub(crate) fn rewind_to_identifier_start(text: &str, offset: usize) -> usize {
    let mut start = offset.min(text.len());
    while start > 0 {
        let Some(ch) = text[..start].chars().next_back() else {
            break; // not a scalar boundary; stay put
        };
        if ch.is_alphanumeric() || ch == '_' {
            start -= ch.len_utf8();
        } else {
            break;
        }
    }
    start
}

/// Rewrite `<#…#>` placeholder markers to LSP snippet slots `${n:value}`,
/// numbering from 1 left to right. A malformed marker (no closing `#>`)
/// aborts the rewrite and the input is returned unchanged.
pub(crate) fn rewrite_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut slot = 1u32;
    while let Some(start) = rest.find("<#") {
        out.push_str(&rest[..start]);
        let inner = &rest[start + 2..];
        let Some(end) = inner.find("#>") else {
            return input.to_owned();
        };
        out.push_str(&format!("${{{}:{}}}", slot, placeholder_value(&inner[..end])));
        slot += 1;
        rest = &inner[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Display portion of a raw placeholder: `T##display##type` markers show
/// their display component, anything else shows verbatim.
fn placeholder_value(raw: &str) -> &str {
    let rest = raw.strip_prefix("T##").unwrap_or(raw);
    rest.split("##").next().unwrap_or(rest)
}
