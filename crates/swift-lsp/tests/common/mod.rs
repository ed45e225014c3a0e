//! Shared harness: a server wired to channel-backed queues and the
//! bridge's scripted analyzer service.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use serde_json::{Value, json};
use swift_lsp::{Event, EventSender, LspServer, Outbound, Outgoing, ServerConfig};
use swift_sourcekitd::SourceKitService;
use swift_sourcekitd::testing::ScriptedSourceKit;

pub struct TestServer {
    pub service: Arc<ScriptedSourceKit>,
    pub server: LspServer,
    events_rx: Receiver<Event>,
    out_rx: Receiver<Outgoing>,
    next_id: i64,
}

impl TestServer {
    pub fn new() -> Self {
        let (events, events_rx) = EventSender::channel();
        let (outbound, out_rx) = Outbound::channel();
        let service = Arc::new(ScriptedSourceKit::new());
        let server = LspServer::new(
            Arc::clone(&service) as Arc<dyn SourceKitService>,
            ServerConfig::default(),
            outbound,
            events,
        );
        Self { service, server, events_rx, out_rx, next_id: 0 }
    }

    /// A server already initialized with the given client capabilities.
    pub fn initialized(capabilities: Value) -> Result<Self, serde_json::Error> {
        let mut harness = Self::new();
        harness.send(json!({
            "jsonrpc": "2.0",
            "id": "init",
            "method": "initialize",
            "params": { "capabilities": capabilities },
        }))?;
        harness.send(json!({ "jsonrpc": "2.0", "method": "initialized" }))?;
        harness.drain();
        harness.take_outgoing();
        Ok(harness)
    }

    /// Feed one raw message to the dispatcher.
    pub fn send(&mut self, message: Value) -> Result<(), serde_json::Error> {
        let message = serde_json::from_value(message)?;
        self.server.handle_message(message);
        Ok(())
    }

    /// Send a request with an auto-assigned id; returns the id.
    pub fn request(&mut self, method: &str, params: Value) -> Result<i64, serde_json::Error> {
        self.next_id += 1;
        let id = self.next_id;
        self.send(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))?;
        Ok(id)
    }

    /// Run queued continuations (bridge completions) to quiescence.
    pub fn drain(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.server.dispatch_event(event);
        }
    }

    /// Collect everything queued for the client, rendered as JSON values:
    /// responses as their wire object, notifications and requests with
    /// `method`/`params` (requests also carry `id`).
    pub fn take_outgoing(&mut self) -> Vec<Value> {
        self.out_rx
            .try_iter()
            .filter_map(|outgoing| match outgoing {
                Outgoing::Response(response) => serde_json::to_value(&response).ok(),
                Outgoing::Notification { method, params } => {
                    Some(json!({ "method": method, "params": params }))
                }
                Outgoing::Request { id, method, params } => {
                    Some(json!({ "id": id, "method": method, "params": params }))
                }
            })
            .collect()
    }

    /// Drain continuations, then fetch the reply to `id`.
    pub fn response_for(&mut self, id: i64) -> Option<Value> {
        self.drain();
        self.take_outgoing()
            .into_iter()
            .find(|message| message.get("id") == Some(&json!(id)) && message.get("method").is_none())
    }

    /// Open a document and swallow the resulting diagnostics traffic.
    pub fn open_document(&mut self, uri: &str, text: &str) -> Result<(), serde_json::Error> {
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": uri,
                    "languageId": "swift",
                    "version": 1,
                    "text": text,
                },
            },
        }))?;
        self.drain();
        self.take_outgoing();
        Ok(())
    }
}

/// Messages with the given method name.
pub fn with_method<'a>(messages: &'a [Value], method: &str) -> Vec<&'a Value> {
    messages.iter().filter(|m| m.get("method").and_then(Value::as_str) == Some(method)).collect()
}
