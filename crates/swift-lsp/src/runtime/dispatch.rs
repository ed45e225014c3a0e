//! Message routing
//!
//! Decoded envelopes land here. Requests get a [`Responder`] and are
//! matched to typed handlers; notifications are applied directly; replies
//! to server-initiated requests are logged and dropped.

use serde_json::Value;
use swift_lsp_protocol::{
    JsonRpcError, JsonRpcMessage, METHOD_NOT_FOUND, SERVER_NOT_INITIALIZED, methods,
};

use super::{LspServer, RequestKey};

impl LspServer {
    /// Route one decoded client message.
    pub fn handle_message(&mut self, message: JsonRpcMessage) {
        let Some(method) = message.method else {
            // A reply to a server-initiated request (workspace/applyEdit).
            // Nothing awaits it; log and drop.
            if self.config.verbose {
                eprintln!("[swift-lsp:rx] reply to server request {:?} dropped", message.id);
            }
            return;
        };
        if self.config.verbose {
            eprintln!("[swift-lsp:rx] method={method} id={:?}", message.id);
        }
        match message.id {
            Some(id) => self.handle_request(&method, id, message.params),
            None => self.handle_notification(&method, message.params),
        }
    }

    fn handle_request(&mut self, method: &str, id: Value, params: Option<Value>) {
        let responder = self.make_responder(id, method);

        if !self.initialized && !matches!(method, methods::INITIALIZE | methods::SHUTDOWN) {
            responder.err(JsonRpcError::new(SERVER_NOT_INITIALIZED, "Server not initialized"));
            return;
        }

        match method {
            methods::INITIALIZE => self.handle_initialize(params, responder),
            methods::SHUTDOWN => self.handle_shutdown(responder),
            methods::TEXT_DOCUMENT_COMPLETION => self.handle_completion(params, responder),
            methods::TEXT_DOCUMENT_HOVER => self.handle_hover(params, responder),
            methods::TEXT_DOCUMENT_DOCUMENT_HIGHLIGHT => {
                self.handle_document_highlight(params, responder)
            }
            methods::TEXT_DOCUMENT_FOLDING_RANGE => self.handle_folding_range(params, responder),
            methods::TEXT_DOCUMENT_DOCUMENT_SYMBOL => {
                self.handle_document_symbol(params, responder)
            }
            methods::TEXT_DOCUMENT_CODE_ACTION => self.handle_code_action(params, responder),
            methods::TEXT_DOCUMENT_SYMBOL_INFO => self.handle_symbol_info(params, responder),
            methods::WORKSPACE_EXECUTE_COMMAND => self.handle_execute_command(params, responder),
            _ => {
                responder.err(JsonRpcError::new(
                    METHOD_NOT_FOUND,
                    format!("Method '{method}' not found or not supported"),
                ));
            }
        }
    }

    fn handle_notification(&mut self, method: &str, params: Option<Value>) {
        match method {
            methods::CANCEL_REQUEST => self.handle_cancel(params),
            methods::EXIT => self.handle_exit(),
            methods::INITIALIZED => self.handle_initialized(),
            _ if !self.initialized => {
                eprintln!("[swift-lsp:rx] notification {method} before initialize, dropped");
            }
            methods::TEXT_DOCUMENT_DID_OPEN => self.handle_did_open(params),
            methods::TEXT_DOCUMENT_DID_CHANGE => self.handle_did_change(params),
            methods::TEXT_DOCUMENT_DID_CLOSE => self.handle_did_close(params),
            methods::TEXT_DOCUMENT_WILL_SAVE => self.handle_will_save(params),
            methods::TEXT_DOCUMENT_DID_SAVE => self.handle_did_save(params),
            _ => {
                eprintln!("[swift-lsp:rx] unhandled notification: {method}");
            }
        }
    }

    fn handle_cancel(&mut self, params: Option<Value>) {
        let Some(id) = params.as_ref().and_then(|p| p.get("id")) else {
            eprintln!("[swift-lsp:cancel] $/cancelRequest without id");
            return;
        };
        let key = RequestKey::new(self.client_id, id);
        if self.requests.cancel(&key) {
            if self.config.verbose {
                eprintln!("[swift-lsp:cancel] request {id} cancelled");
            }
        } else {
            // Already replied or never seen; nothing to do.
            eprintln!("[swift-lsp:cancel] request {id} not active");
        }
    }
}
