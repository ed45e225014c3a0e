//! Symbol info and document symbols.

use lsp_types::DocumentSymbol;
use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, req_position, req_uri};
use swift_position_tracking::LineTable;
use swift_sourcekitd::{Keys, SkValue, Values};

use crate::convert::{self, range_from_byte_span};
use crate::runtime::{LspServer, Responder};
use crate::util::file_path_of;

impl LspServer {
    /// `textDocument/symbolInfo`: the single symbol at the cursor, or an
    /// empty list when the cursor is not on one.
    pub(crate) fn handle_symbol_info(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let (uri, position) = match (req_uri(&params), req_position(&params)) {
            (Ok(uri), Ok(position)) => (uri.to_owned(), position),
            (Err(err), _) | (_, Err(err)) => return responder.err(err),
        };
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "symbolInfo") else {
            return responder.ok(json!([]));
        };
        let Some(offset) = snapshot.utf8_offset_of(position.0, position.1) else {
            return responder.ok(json!([]));
        };

        let args = self.compiler_arguments(&uri, &snapshot.document().language);
        let request =
            self.bridge.cursor_info(&file_path_of(&uri), offset, args.as_deref(), false);

        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    if responder.is_cancelled() {
                        return responder.cancelled();
                    }
                    match result {
                        Ok(response) => responder.ok(server.symbol_details(&response)),
                        Err(err) => responder.err(internal_error(err.to_string())),
                    }
                });
            }),
        );
    }

    fn symbol_details(&self, response: &SkValue) -> Value {
        let keys = self.bridge.keys();
        let Some(name) = response.string(keys.name) else {
            return json!([]);
        };
        let kind = response.uid(keys.kind).and_then(|uid| self.bridge.uid_string(uid));
        json!([{
            "name": name,
            "kind": kind,
            "usr": response.string(keys.usr),
        }])
    }

    /// `textDocument/documentSymbol`: a syntactic-only open under a
    /// synthetic name, then a recursive substructure walk.
    pub(crate) fn handle_document_symbol(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let uri = match req_uri(&params) {
            Ok(uri) => uri.to_owned(),
            Err(err) => return responder.err(err),
        };
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "documentSymbol") else {
            return responder.ok(json!([]));
        };

        // The synthetic name keeps this open from colliding with the real
        // editor state for the document.
        let name = format!("DocumentSymbols:{uri}");
        let request = self.bridge.editor_open(&name, snapshot.text(), None, true);

        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    server.close_synthetic_document(&name);
                    if responder.is_cancelled() {
                        return responder.cancelled();
                    }
                    match result {
                        Ok(response) => {
                            let keys = server.bridge.keys();
                            let values = server.bridge.values();
                            let symbols = response
                                .array(keys.substructure)
                                .map(|items| {
                                    document_symbols(keys, values, snapshot.line_table(), items)
                                })
                                .unwrap_or_default();
                            responder.ok(json!(symbols));
                        }
                        Err(err) => responder.err(internal_error(err.to_string())),
                    }
                });
            }),
        );
    }

    /// Release a `DocumentSymbols:`/`FoldingRanges:` scratch session.
    pub(crate) fn close_synthetic_document(&self, name: &str) {
        let request = self.bridge.editor_close(name);
        let name = name.to_owned();
        self.bridge.send(
            request,
            Box::new(move |result| {
                if let Err(err) = result {
                    eprintln!("[swift-lsp:syntactic] close of {name} failed: {err}");
                }
            }),
        );
    }
}

/// Walk a substructure level. Items without a mappable kind (or without
/// the fields a symbol needs) are skipped, but their children are still
/// visited and surface at the skipped parent's level.
#[allow(deprecated)] // DocumentSymbol::deprecated must still be populated
fn document_symbols(
    keys: &Keys,
    values: &Values,
    table: &LineTable,
    items: &[SkValue],
) -> Vec<DocumentSymbol> {
    let mut out = Vec::new();
    for item in items {
        let children = item
            .array(keys.substructure)
            .map(|nested| document_symbols(keys, values, table, nested))
            .unwrap_or_default();

        let kind = item.uid(keys.kind).and_then(|uid| convert::symbol_kind(values, uid));
        let name = item.string(keys.name);
        let range = item
            .offset(keys.offset)
            .zip(item.offset(keys.length))
            .and_then(|(offset, length)| range_from_byte_span(table, offset, length));

        match (kind, name, range) {
            (Some(kind), Some(name), Some(range)) => {
                let selection_range = item
                    .offset(keys.nameoffset)
                    .zip(item.offset(keys.namelength))
                    .and_then(|(offset, length)| range_from_byte_span(table, offset, length))
                    .unwrap_or(range);
                out.push(DocumentSymbol {
                    name: name.to_owned(),
                    detail: None,
                    kind,
                    tags: None,
                    deprecated: None,
                    range,
                    selection_range,
                    children: if children.is_empty() { None } else { Some(children) },
                });
            }
            _ => out.extend(children),
        }
    }
    out
}
