//! Hover
//!
//! Delegates to cursor info and renders markdown: an H1 with the symbol
//! name, then the converted documentation XML, else the annotated
//! declaration. Conversion failures fall back to the raw XML string.

use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, req_position, req_uri};
use swift_sourcekitd::SkValue;

use crate::runtime::{LspServer, Responder};
use crate::util::file_path_of;

use super::markup::xml_to_markdown;

impl LspServer {
    pub(crate) fn handle_hover(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let (uri, position) = match (req_uri(&params), req_position(&params)) {
            (Ok(uri), Ok(position)) => (uri.to_owned(), position),
            (Err(err), _) | (_, Err(err)) => return responder.err(err),
        };
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "hover") else {
            return responder.ok(Value::Null);
        };
        let Some(offset) = snapshot.utf8_offset_of(position.0, position.1) else {
            eprintln!("[swift-lsp:hover] position {}:{} outside {uri}", position.0, position.1);
            return responder.ok(Value::Null);
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
                        Ok(response) => responder.ok(server.hover_contents(&response)),
                        Err(err) => responder.err(internal_error(err.to_string())),
                    }
                });
            }),
        );
    }

    fn hover_contents(&self, response: &SkValue) -> Value {
        let keys = self.bridge.keys();
        let Some(name) = response.string(keys.name) else {
            return Value::Null;
        };
        let mut markdown = format!("# {name}\n\n");
        if let Some(xml) = response.string(keys.doc_full_as_xml) {
            markdown.push_str(&xml_to_markdown(xml).unwrap_or_else(|| xml.to_owned()));
        } else if let Some(declaration) = response.string(keys.annotated_decl) {
            markdown
                .push_str(&xml_to_markdown(declaration).unwrap_or_else(|| declaration.to_owned()));
        }
        json!({
            "contents": {
                "kind": "markdown",
                "value": markdown,
            },
        })
    }
}
