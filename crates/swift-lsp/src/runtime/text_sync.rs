//! Text document synchronization
//!
//! Mirrors `didOpen`/`didChange`/`didClose` into the document manager and
//! synthesizes the parallel `editor.open`/`editor.replacetext`/
//! `editor.close` mutations against the analyzer. Diagnostics ride along
//! on the editor responses and are published from here.

use lsp_types::{Diagnostic, TextDocumentContentChangeEvent};
use serde_json::{Value, json};
use swift_lsp_protocol::methods;
use swift_sourcekitd::{Request, SkValue};

use crate::convert;
use crate::state::DocumentError;

use super::LspServer;

impl LspServer {
    pub(crate) fn handle_did_open(&mut self, params: Option<Value>) {
        let params = params.unwrap_or(Value::Null);
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            eprintln!("[swift-lsp:didOpen] missing textDocument.uri");
            return;
        };
        let language = params
            .pointer("/textDocument/languageId")
            .and_then(Value::as_str)
            .unwrap_or("swift");
        let version = params
            .pointer("/textDocument/version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0);
        let Some(text) = params.pointer("/textDocument/text").and_then(Value::as_str) else {
            eprintln!("[swift-lsp:didOpen] missing textDocument.text for {uri}");
            return;
        };

        let snapshot = match self.documents.open(uri, language, version, text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                eprintln!("[swift-lsp:didOpen] {err}");
                return;
            }
        };

        let args = self.compiler_arguments(uri, language);
        let request = self.bridge.editor_open(uri, snapshot.text(), args.as_deref(), false);
        self.send_editor_request_and_publish(uri.to_owned(), request);
    }

    pub(crate) fn handle_did_change(&mut self, params: Option<Value>) {
        let params = params.unwrap_or(Value::Null);
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            eprintln!("[swift-lsp:didChange] missing textDocument.uri");
            return;
        };
        let version = params
            .pointer("/textDocument/version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0);
        let changes: Vec<TextDocumentContentChangeEvent> = match params
            .get("contentChanges")
            .cloned()
            .map(serde_json::from_value)
        {
            Some(Ok(changes)) => changes,
            _ => {
                eprintln!("[swift-lsp:didChange] undecodable contentChanges for {uri}");
                return;
            }
        };

        let result = self.documents.edit(uri, version, &changes, |before, change| {
            let (offset, length) = match change.range {
                Some(range) => {
                    let start = before.utf8_offset_of(range.start.line, range.start.character);
                    let end = before.utf8_offset_of(range.end.line, range.end.character);
                    match (start, end) {
                        (Some(start), Some(end)) if start <= end => (start, end - start),
                        // The manager will fail on the same range; skip the
                        // native mutation so both sides stay in step.
                        _ => return,
                    }
                }
                None => (0, before.text().len()),
            };
            let request = self.bridge.editor_replace_text(uri, offset, length, &change.text);
            self.send_editor_request_logged(uri, request);
        });

        match result {
            Err(err @ DocumentError::Unknown(_)) => {
                eprintln!("[swift-lsp:didChange] {err}");
            }
            result => {
                if let Err(err) = result {
                    eprintln!("[swift-lsp:didChange] fatal, edit sequence aborted: {err}");
                }
                // The batch was applied (possibly partially, possibly
                // empty); every batch gets exactly one diagnostics
                // publication, pulled with the canonical zero-length
                // replacement after the batch's own replacements.
                let refresh = self.bridge.diagnostics_refresh(uri);
                self.send_editor_request_and_publish(uri.to_owned(), refresh);
            }
        }
    }

    pub(crate) fn handle_did_close(&mut self, params: Option<Value>) {
        let params = params.unwrap_or(Value::Null);
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            eprintln!("[swift-lsp:didClose] missing textDocument.uri");
            return;
        };
        if self.documents.close(uri).is_some() {
            let request = self.bridge.editor_close(uri);
            self.send_editor_request_logged(uri, request);
        }
    }

    pub(crate) fn handle_will_save(&mut self, _params: Option<Value>) {
        // Advertised so clients send it; the analyzer has nothing to do.
        if self.config.verbose {
            eprintln!("[swift-lsp:willSave] noted");
        }
    }

    pub(crate) fn handle_did_save(&mut self, _params: Option<Value>) {
        if self.config.verbose {
            eprintln!("[swift-lsp:didSave] noted");
        }
    }

    /// The analyzer reported new state for `name`; request a refreshed
    /// diagnostics batch with the canonical zero-length replacement.
    /// Batches are published as observed, without deduplication against
    /// the preceding edit's diagnostics.
    pub(crate) fn handle_document_update(&mut self, name: &str) {
        if self.documents.latest_snapshot(name).is_none() {
            // Synthetic or already-closed document; nothing to refresh.
            return;
        }
        let refresh = self.bridge.diagnostics_refresh(name);
        self.send_editor_request_and_publish(name.to_owned(), refresh);
    }

    /// Issue an editor-class request whose response carries diagnostics,
    /// and publish them once observed.
    fn send_editor_request_and_publish(&self, uri: String, request: Request) {
        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| match result {
                    Ok(response) => server.publish_diagnostics_from(&uri, &response),
                    Err(err) => {
                        eprintln!("[swift-lsp:text-sync] editor request for {uri} failed: {err}");
                    }
                });
            }),
        );
    }

    /// Issue an editor-class request where only failures matter.
    fn send_editor_request_logged(&self, uri: &str, request: Request) {
        let uri = uri.to_owned();
        self.bridge.send(
            request,
            Box::new(move |result| {
                if let Err(err) = result {
                    eprintln!("[swift-lsp:text-sync] editor request for {uri} failed: {err}");
                }
            }),
        );
    }

    pub(crate) fn publish_diagnostics_from(&mut self, uri: &str, response: &SkValue) {
        let Some(snapshot) = self.documents.latest_snapshot(uri) else {
            return; // Closed between the request and its response.
        };
        let diagnostics = convert::diagnostics_from_response(
            self.bridge.keys(),
            self.bridge.values(),
            response,
            snapshot.line_table(),
        );
        self.publish_diagnostics(uri, diagnostics);
    }

    /// Publish `diagnostics`, always including the empty array so prior
    /// client state is cleared.
    pub(crate) fn publish_diagnostics(&self, uri: &str, diagnostics: Vec<Diagnostic>) {
        self.outbound.notify(
            methods::TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS,
            json!({ "uri": uri, "diagnostics": diagnostics }),
        );
    }
}
