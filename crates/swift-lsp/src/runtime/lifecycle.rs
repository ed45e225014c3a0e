//! Server lifecycle: initialize, initialized, shutdown, exit.

use std::sync::Arc;

use serde_json::{Value, json};
use swift_lsp_protocol::{ClientCapabilities, server_capabilities};
use swift_sourcekitd::SkValue;

use super::{LspServer, Responder};

impl LspServer {
    pub(crate) fn handle_initialize(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        self.client_capabilities = ClientCapabilities::from_initialize(&params);
        if let Some(options) = params.get("initializationOptions") {
            self.config.merge_initialization_options(options);
        }

        self.subscribe_to_document_updates();
        self.bridge.install_notification_handler();
        self.initialized = true;

        responder.ok(json!({
            "capabilities": server_capabilities(),
            "serverInfo": {
                "name": "swift-lsp",
                "version": env!("CARGO_PKG_VERSION"),
            },
        }));
    }

    pub(crate) fn handle_initialized(&mut self) {
        if self.config.verbose {
            eprintln!("[swift-lsp:lifecycle] client initialized");
        }
    }

    /// Analyzer notifications arrive on a bridge thread; re-enter the
    /// dispatcher queue before touching any state.
    fn subscribe_to_document_updates(&self) {
        let events = self.events.clone();
        let keys = *self.bridge.keys();
        let values = *self.bridge.values();
        self.bridge.add_notification_subscriber(Arc::new(move |notification: &SkValue| {
            let Some(kind) = notification.uid(keys.notification) else {
                eprintln!("[swift-lsp:notification] undecodable analyzer notification, dropped");
                return;
            };
            if kind != values.notification_document_update {
                return;
            }
            let Some(name) = notification.string(keys.name).map(str::to_owned) else {
                eprintln!("[swift-lsp:notification] document update without a name, dropped");
                return;
            };
            events.task(move |server| server.handle_document_update(&name));
        }));
    }

    pub(crate) fn handle_shutdown(&mut self, responder: Responder) {
        // Release every analyzer session before the reply; editor state
        // must not outlive the server.
        for uri in self.documents.open_uris() {
            if self.documents.close(&uri).is_some() {
                let request = self.bridge.editor_close(&uri);
                self.bridge.send(
                    request,
                    Box::new(move |result| {
                        if let Err(err) = result {
                            eprintln!("[swift-lsp:shutdown] editor close for {uri} failed: {err}");
                        }
                    }),
                );
            }
        }
        self.bridge.shutdown();
        self.shutdown_received = true;
        responder.ok(Value::Null);
    }

    pub(crate) fn handle_exit(&mut self) {
        let code = if self.shutdown_received { 0 } else { 1 };
        self.stop(code);
    }
}
