//! Document highlight
//!
//! Related-identifier occurrences, all reported as reads.

use lsp_types::{DocumentHighlight, DocumentHighlightKind};
use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, req_position, req_uri};

use crate::convert::range_from_byte_span;
use crate::runtime::{LspServer, Responder};
use crate::util::file_path_of;

impl LspServer {
    pub(crate) fn handle_document_highlight(
        &mut self,
        params: Option<Value>,
        responder: Responder,
    ) {
        let params = params.unwrap_or(Value::Null);
        let (uri, position) = match (req_uri(&params), req_position(&params)) {
            (Ok(uri), Ok(position)) => (uri.to_owned(), position),
            (Err(err), _) | (_, Err(err)) => return responder.err(err),
        };
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "documentHighlight") else {
            return responder.ok(json!([]));
        };
        let Some(offset) = snapshot.utf8_offset_of(position.0, position.1) else {
            return responder.ok(json!([]));
        };

        let args = self.compiler_arguments(&uri, &snapshot.document().language);
        let request = self.bridge.related_idents(&file_path_of(&uri), offset, args.as_deref());

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
                    let keys = server.bridge.keys();
                    let highlights: Vec<DocumentHighlight> = response
                        .array(keys.results)
                        .unwrap_or(&[])
                        .iter()
                        .filter_map(|entry| {
                            let offset = entry.offset(keys.offset)?;
                            let length = entry.offset(keys.length)?;
                            let range = range_from_byte_span(snapshot.line_table(), offset, length)?;
                            Some(DocumentHighlight {
                                range,
                                kind: Some(DocumentHighlightKind::READ),
                            })
                        })
                        .collect();
                    responder.ok(json!(highlights));
                });
            }),
        );
    }
}
