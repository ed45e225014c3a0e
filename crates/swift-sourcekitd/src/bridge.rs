//! The bridge proper: UID tables, request constructors, notification
//! fan-out.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::request::{Request, RequestBuilder};
use crate::service::{CompletionFn, RequestHandle, ResponseResult, SourceKitService};
use crate::tables::{Keys, RequestNames, Values};
use crate::uid::Uid;
use crate::value::SkValue;

/// Callback registered by a bridge subscriber for analyzer notifications.
pub type NotificationSubscriber = Arc<dyn Fn(&SkValue) + Send + Sync>;

/// Typed façade over a [`SourceKitService`].
///
/// Owns the cached UID tables and the single process-wide notification
/// handler; subscribers register here and the bridge multiplexes among
/// them. Request constructors cover the known request classes.
pub struct Bridge {
    service: Arc<dyn SourceKitService>,
    keys: Keys,
    values: Values,
    requests: RequestNames,
    subscribers: Arc<Mutex<Vec<NotificationSubscriber>>>,
}

impl Bridge {
    /// Wrap `service`, interning the well-known UID tables once.
    pub fn new(service: Arc<dyn SourceKitService>) -> Self {
        let keys = Keys::new(service.as_ref());
        let values = Values::new(service.as_ref());
        let requests = RequestNames::new(service.as_ref());
        Self { service, keys, values, requests, subscribers: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Cached request/response dictionary keys.
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Cached well-known response values.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Cached request-class names.
    pub fn request_names(&self) -> &RequestNames {
        &self.requests
    }

    /// Intern an arbitrary string (used for refactoring action UIDs).
    pub fn intern(&self, name: &str) -> Uid {
        self.service.intern(name)
    }

    /// Recover the string behind `uid`, if known.
    pub fn uid_string(&self, uid: Uid) -> Option<String> {
        self.service.uid_string(uid)
    }

    /// Issue a request asynchronously.
    pub fn send(&self, request: Request, on_done: CompletionFn) -> RequestHandle {
        self.service.send(request, on_done)
    }

    /// Issue a request and block for its response.
    pub fn send_sync(&self, request: Request) -> ResponseResult {
        self.service.send_sync(request)
    }

    /// Best-effort cancellation.
    pub fn cancel(&self, handle: RequestHandle) {
        self.service.cancel(handle)
    }

    /// Register a subscriber for analyzer notifications.
    pub fn add_notification_subscriber(&self, subscriber: NotificationSubscriber) {
        self.subscribers.lock().push(subscriber);
    }

    /// Install the single notification handler into the service. Called
    /// once at initialize time.
    pub fn install_notification_handler(&self) {
        let subscribers = Arc::clone(&self.subscribers);
        self.service.set_notification_handler(Some(Box::new(move |value: &SkValue| {
            for subscriber in subscribers.lock().iter() {
                subscriber(value);
            }
        })));
    }

    /// Clear the handler slot and all subscribers. Called on shutdown.
    pub fn shutdown(&self) {
        self.service.set_notification_handler(None);
        self.subscribers.lock().clear();
    }

    fn args_value(args: &[String]) -> SkValue {
        SkValue::Array(args.iter().map(|arg| SkValue::String(arg.clone())).collect())
    }

    /// `editor.open`: create analyzer state for `name` with `text`.
    pub fn editor_open(
        &self,
        name: &str,
        text: &str,
        compiler_args: Option<&[String]>,
        syntactic_only: bool,
    ) -> Request {
        let mut builder = RequestBuilder::new(self.keys.request, self.requests.editor_open)
            .set(self.keys.name, name)
            .set(self.keys.sourcetext, text)
            .set(self.keys.enable_syntaxmap, true)
            .set(self.keys.enable_substructure, true)
            .set_opt(self.keys.compilerargs, compiler_args.map(Self::args_value));
        if syntactic_only {
            builder = builder.set(self.keys.syntactic_only, 1i64);
        }
        builder.build()
    }

    /// `editor.close`: release analyzer state for `name`.
    pub fn editor_close(&self, name: &str) -> Request {
        RequestBuilder::new(self.keys.request, self.requests.editor_close)
            .set(self.keys.name, name)
            .build()
    }

    /// `editor.replacetext`: splice `text` over `offset..offset+length`.
    pub fn editor_replace_text(
        &self,
        name: &str,
        offset: usize,
        length: usize,
        text: &str,
    ) -> Request {
        RequestBuilder::new(self.keys.request, self.requests.editor_replacetext)
            .set(self.keys.name, name)
            .set(self.keys.offset, offset)
            .set(self.keys.length, length)
            .set(self.keys.sourcetext, text)
            .build()
    }

    /// The canonical diagnostics refresh: a zero-length replacement at
    /// offset 0 with empty text.
    pub fn diagnostics_refresh(&self, name: &str) -> Request {
        self.editor_replace_text(name, 0, 0, "")
    }

    /// `codecomplete`: completions at a byte offset.
    pub fn code_complete(
        &self,
        file: &str,
        offset: usize,
        text: &str,
        compiler_args: Option<&[String]>,
    ) -> Request {
        RequestBuilder::new(self.keys.request, self.requests.codecomplete)
            .set(self.keys.sourcefile, file)
            .set(self.keys.offset, offset)
            .set(self.keys.sourcetext, text)
            .set_opt(self.keys.compilerargs, compiler_args.map(Self::args_value))
            .build()
    }

    /// `cursorinfo`: symbol details at a byte offset; optionally lists the
    /// refactoring actions available there.
    pub fn cursor_info(
        &self,
        file: &str,
        offset: usize,
        compiler_args: Option<&[String]>,
        retrieve_refactor_actions: bool,
    ) -> Request {
        let mut builder = RequestBuilder::new(self.keys.request, self.requests.cursorinfo)
            .set(self.keys.sourcefile, file)
            .set(self.keys.offset, offset)
            .set_opt(self.keys.compilerargs, compiler_args.map(Self::args_value));
        if retrieve_refactor_actions {
            builder = builder.set(self.keys.retrieve_refactor_actions, 1i64);
        }
        builder.build()
    }

    /// `relatedidents`: occurrences of the identifier at a byte offset.
    pub fn related_idents(
        &self,
        file: &str,
        offset: usize,
        compiler_args: Option<&[String]>,
    ) -> Request {
        RequestBuilder::new(self.keys.request, self.requests.relatedidents)
            .set(self.keys.sourcefile, file)
            .set(self.keys.offset, offset)
            .set_opt(self.keys.compilerargs, compiler_args.map(Self::args_value))
            .build()
    }

    /// `semantic.refactoring`: perform `action` at a 1-based line/column.
    pub fn semantic_refactoring(
        &self,
        action: Uid,
        file: &str,
        line: u32,
        column: u32,
        length: usize,
        compiler_args: Option<&[String]>,
    ) -> Request {
        RequestBuilder::new(self.keys.request, self.requests.semantic_refactoring)
            .set(self.keys.actionuid, action)
            .set(self.keys.sourcefile, file)
            .set(self.keys.name, file)
            .set(self.keys.line, i64::from(line))
            .set(self.keys.column, i64::from(column))
            .set(self.keys.length, length)
            .set_opt(self.keys.compilerargs, compiler_args.map(Self::args_value))
            .build()
    }
}
