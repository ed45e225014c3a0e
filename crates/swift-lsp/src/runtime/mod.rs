//! Server core: dispatcher queue, outbound queue, reply routing,
//! cancellation.
//!
//! The server is logically single-threaded: one dispatcher thread owns all
//! mutable state. Incoming messages and bridge completion callbacks are
//! both posted onto the same [`Event`] queue, so handlers never race. The
//! outbound side is a FIFO queue drained by a writer thread, preserving
//! reply order.

mod dispatch;
pub(crate) mod language;
mod lifecycle;
mod text_sync;

use std::io::{BufRead, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use swift_lsp_protocol::{
    ClientCapabilities, INTERNAL_ERROR, JsonRpcError, JsonRpcMessage, JsonRpcResponse,
    PARSE_ERROR, request_cancelled_error,
};
use swift_lsp_transport::{
    IncomingFrame, log_response, read_message, write_message, write_notification, write_request,
};
use swift_sourcekitd::{Bridge, SourceKitService};

use crate::build_system::{BuildSystem, FallbackBuildSystem};
use crate::state::{DocumentManager, DocumentSnapshot, ServerConfig};

/// A unit of work for the dispatcher thread.
pub enum Event {
    /// A decoded client message.
    Message(JsonRpcMessage),
    /// A deferred continuation (bridge completions, notification fan-in).
    Task(Task),
}

/// Boxed continuation executed on the dispatcher thread.
pub type Task = Box<dyn FnOnce(&mut LspServer) + Send>;

/// Handle for posting events onto the dispatcher queue.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// A fresh queue plus its sending handle.
    pub fn channel() -> (Self, Receiver<Event>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }

    /// Post an event; silently dropped once the dispatcher is gone.
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Post a continuation to run on the dispatcher thread.
    pub fn task(&self, task: impl FnOnce(&mut LspServer) + Send + 'static) {
        self.send(Event::Task(Box::new(task)));
    }
}

/// An outbound message awaiting serialization.
pub enum Outgoing {
    /// Reply to a client request.
    Response(JsonRpcResponse),
    /// Server-emitted notification.
    Notification {
        /// LSP method name.
        method: &'static str,
        /// Notification params.
        params: Value,
    },
    /// Server-initiated request (e.g. `workspace/applyEdit`).
    Request {
        /// Server-assigned id.
        id: Value,
        /// LSP method name.
        method: &'static str,
        /// Request params.
        params: Value,
    },
}

/// FIFO queue of outbound messages.
#[derive(Clone)]
pub struct Outbound {
    tx: Sender<Outgoing>,
}

impl Outbound {
    /// A fresh queue plus its receiving end (drained by the writer thread
    /// or, in tests, inspected directly).
    pub fn channel() -> (Self, Receiver<Outgoing>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }

    /// Queue a response.
    pub fn respond(&self, response: JsonRpcResponse) {
        let _ = self.tx.send(Outgoing::Response(response));
    }

    /// Queue a notification.
    pub fn notify(&self, method: &'static str, params: Value) {
        let _ = self.tx.send(Outgoing::Notification { method, params });
    }

    /// Queue a server-initiated request.
    pub fn request(&self, id: Value, method: &'static str, params: Value) {
        let _ = self.tx.send(Outgoing::Request { id, method, params });
    }
}

/// Thread-safe cancellation flag observed at handler checkpoints.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the token has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Key into the active-request registry: the connection plus the client's
/// request id in canonical JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    client: u64,
    id: String,
}

impl RequestKey {
    /// Key for `id` on connection `client`.
    pub fn new(client: u64, id: &Value) -> Self {
        Self { client, id: id.to_string() }
    }
}

/// Registry of in-flight requests and their cancellation tokens.
#[derive(Clone, Default)]
pub struct ActiveRequests {
    inner: Arc<Mutex<FxHashMap<RequestKey, CancellationToken>>>,
}

impl ActiveRequests {
    /// Register `key`, returning its token.
    pub fn register(&self, key: RequestKey) -> CancellationToken {
        let token = CancellationToken::new();
        self.inner.lock().insert(key, token.clone());
        token
    }

    /// Fire the token for `key`. Returns whether the request was live.
    pub fn cancel(&self, key: &RequestKey) -> bool {
        match self.inner.lock().get(key) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop `key` from the registry (the request replied).
    pub fn remove(&self, key: &RequestKey) {
        self.inner.lock().remove(key);
    }

    /// Number of live requests.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no request is live.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Single-use reply channel for one client request.
///
/// Every request gets exactly one reply: success, error, or cancellation.
/// Dropping a responder without replying is a handler bug and produces an
/// internal error so the client is never left hanging.
pub struct Responder {
    id: Value,
    method: String,
    key: RequestKey,
    token: CancellationToken,
    outbound: Outbound,
    requests: ActiveRequests,
    replied: bool,
}

impl Responder {
    fn new(
        id: Value,
        method: &str,
        outbound: Outbound,
        requests: ActiveRequests,
        client: u64,
    ) -> Self {
        let key = RequestKey::new(client, &id);
        let token = requests.register(key.clone());
        Self { id, method: method.to_owned(), key, token, outbound, requests, replied: false }
    }

    /// The request's cancellation token, for checkpoints inside
    /// continuations that do not own the responder.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether the client cancelled this request.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reply with a success result.
    pub fn ok(mut self, result: Value) {
        let response = JsonRpcResponse::success(Some(self.id.clone()), result);
        self.finish(response);
    }

    /// Reply with an error.
    pub fn err(mut self, error: JsonRpcError) {
        eprintln!("[swift-lsp:{}] error reply: {}", self.method, error);
        let response = JsonRpcResponse::error(Some(self.id.clone()), error);
        self.finish(response);
    }

    /// Reply with the LSP cancellation error.
    pub fn cancelled(mut self) {
        let response = JsonRpcResponse::error(Some(self.id.clone()), request_cancelled_error());
        self.finish(response);
    }

    fn finish(&mut self, response: JsonRpcResponse) {
        self.requests.remove(&self.key);
        self.outbound.respond(response);
        self.replied = true;
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if !self.replied {
            eprintln!("[swift-lsp:{}] handler produced no reply for {:?}", self.method, self.id);
            let error = JsonRpcError::new(INTERNAL_ERROR, "handler produced no reply");
            let response = JsonRpcResponse::error(Some(self.id.clone()), error);
            self.finish(response);
        }
    }
}

/// The language server.
///
/// Owns the document manager, the analyzer bridge, and the active-request
/// registry. All methods run on the dispatcher thread.
pub struct LspServer {
    pub(crate) documents: DocumentManager,
    pub(crate) bridge: Arc<Bridge>,
    pub(crate) build_system: Arc<dyn BuildSystem>,
    pub(crate) config: ServerConfig,
    pub(crate) client_capabilities: ClientCapabilities,
    pub(crate) initialized: bool,
    pub(crate) shutdown_received: bool,
    running: bool,
    exit_code: i32,
    pub(crate) outbound: Outbound,
    pub(crate) events: EventSender,
    pub(crate) requests: ActiveRequests,
    client_id: u64,
    next_outgoing_request: i64,
}

impl LspServer {
    /// Build a server over `service`, posting continuations to `events`
    /// and replies to `outbound`.
    pub fn new(
        service: Arc<dyn SourceKitService>,
        config: ServerConfig,
        outbound: Outbound,
        events: EventSender,
    ) -> Self {
        let build_system: Arc<dyn BuildSystem> =
            Arc::new(FallbackBuildSystem::new(config.default_compiler_arguments.clone()));
        Self {
            documents: DocumentManager::new(),
            bridge: Arc::new(Bridge::new(service)),
            build_system,
            config,
            client_capabilities: ClientCapabilities::default(),
            initialized: false,
            shutdown_received: false,
            running: true,
            exit_code: 1,
            outbound,
            events,
            requests: ActiveRequests::default(),
            client_id: 1,
            next_outgoing_request: 0,
        }
    }

    /// Replace the build-system collaborator.
    pub fn with_build_system(mut self, build_system: Arc<dyn BuildSystem>) -> Self {
        self.build_system = build_system;
        self
    }

    /// The analyzer bridge (UID tables and request constructors).
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Whether the dispatcher loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Process exit code once the loop stops.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Apply one queued event.
    pub fn dispatch_event(&mut self, event: Event) {
        match event {
            Event::Message(message) => self.handle_message(message),
            Event::Task(task) => task(self),
        }
    }

    pub(crate) fn stop(&mut self, exit_code: i32) {
        self.running = false;
        self.exit_code = exit_code;
    }

    pub(crate) fn make_responder(&self, id: Value, method: &str) -> Responder {
        Responder::new(id, method, self.outbound.clone(), self.requests.clone(), self.client_id)
    }

    /// Next id for a server-initiated request.
    pub(crate) fn next_request_id(&mut self) -> Value {
        self.next_outgoing_request += 1;
        Value::from(self.next_outgoing_request)
    }

    pub(crate) fn latest_snapshot_or_log(
        &self,
        uri: &str,
        method: &str,
    ) -> Option<DocumentSnapshot> {
        let snapshot = self.documents.latest_snapshot(uri);
        if snapshot.is_none() {
            eprintln!("[swift-lsp:{method}] no open document for {uri}");
        }
        snapshot
    }

    /// Compiler arguments for `uri` from the build-system collaborator.
    pub(crate) fn compiler_arguments(&self, uri: &str, language: &str) -> Option<Vec<String>> {
        self.build_system.settings(uri, language).map(|settings| settings.compiler_arguments)
    }
}

/// Run the server over arbitrary transport endpoints until `exit`.
///
/// Spawns the reader and writer threads and drives the dispatcher loop on
/// the calling thread. Returns the process exit code.
pub fn run<R, W>(
    service: Arc<dyn SourceKitService>,
    config: ServerConfig,
    reader: R,
    writer: W,
) -> anyhow::Result<i32>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let (events, event_rx) = EventSender::channel();
    let (outbound, outbound_rx) = Outbound::channel();
    let verbose = config.verbose;

    let writer_handle = thread::spawn(move || drain_outbound(outbound_rx, writer, verbose));

    {
        let events = events.clone();
        thread::spawn(move || {
            let mut reader = reader;
            loop {
                match read_message(&mut reader) {
                    Ok(Some(IncomingFrame::Message(message))) => {
                        events.send(Event::Message(message));
                    }
                    Ok(Some(IncomingFrame::Malformed(detail))) => {
                        // Invalid JSON still gets a protocol-level reply;
                        // the connection stays open.
                        events.task(move |server| {
                            let error = JsonRpcError::new(PARSE_ERROR, detail);
                            server.outbound.respond(JsonRpcResponse::error(None, error));
                        });
                    }
                    Ok(None) => break,
                    Err(err) => {
                        eprintln!("[swift-lsp:rx] transport error: {err}");
                        break;
                    }
                }
            }
            // Client hung up; stop the dispatcher.
            events.task(|server| {
                let code = if server.shutdown_received { 0 } else { 1 };
                server.stop(code);
            });
        });
    }

    let mut server = LspServer::new(service, config, outbound, events);
    while let Ok(event) = event_rx.recv() {
        server.dispatch_event(event);
        if !server.is_running() {
            break;
        }
    }
    let exit_code = server.exit_code();
    drop(server);
    // Undelivered events may hold responders (and with them outbound
    // handles); release them so the writer can finish.
    drop(event_rx);
    let _ = writer_handle.join();
    Ok(exit_code)
}

/// Run over stdio, the standard client transport.
pub fn run_stdio(service: Arc<dyn SourceKitService>, config: ServerConfig) -> anyhow::Result<i32> {
    run(service, config, BufReader::new(std::io::stdin()), std::io::stdout())
}

fn drain_outbound<W: Write>(rx: Receiver<Outgoing>, mut writer: W, verbose: bool) {
    while let Ok(outgoing) = rx.recv() {
        let written = match outgoing {
            Outgoing::Response(response) => {
                if verbose {
                    log_response(&response);
                }
                write_message(&mut writer, &response)
            }
            Outgoing::Notification { method, params } => {
                write_notification(&mut writer, method, params)
            }
            Outgoing::Request { id, method, params } => {
                write_request(&mut writer, id, method, params)
            }
        };
        if let Err(err) = written {
            eprintln!("[swift-lsp:tx] write failed: {err}");
            break;
        }
    }
}
