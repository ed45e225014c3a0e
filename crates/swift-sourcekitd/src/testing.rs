//! Scripted in-process analyzer service.
//!
//! Drives the server in tests without a loaded library: responses are
//! scripted per request class, every request is recorded for inspection,
//! and notifications are emitted by hand. Asynchronous sends complete
//! inline on the caller's thread, which keeps tests deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::request::Request;
use crate::service::{CompletionFn, NotificationFn, RequestHandle, ResponseResult, SourceKitService};
use crate::uid::Uid;
use crate::value::SkValue;

type Responder = Box<dyn FnMut(&SkValue) -> ResponseResult + Send>;

#[derive(Default)]
struct Interner {
    by_name: FxHashMap<String, Uid>,
    names: Vec<String>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> Uid {
        if let Some(uid) = self.by_name.get(name) {
            return *uid;
        }
        let uid = Uid::from_raw(self.names.len() as u64);
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), uid);
        uid
    }

    fn name(&self, uid: Uid) -> Option<String> {
        self.names.get(uid.raw() as usize).cloned()
    }
}

/// A [`SourceKitService`] whose behavior is scripted by the test.
pub struct ScriptedSourceKit {
    interner: Mutex<Interner>,
    responders: Mutex<FxHashMap<Uid, Responder>>,
    recorded: Mutex<Vec<SkValue>>,
    cancelled: Mutex<Vec<RequestHandle>>,
    handler: Mutex<Option<NotificationFn>>,
    next_handle: AtomicU64,
    request_key: Uid,
}

impl Default for ScriptedSourceKit {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSourceKit {
    /// A service that answers every request with an empty dictionary.
    pub fn new() -> Self {
        let mut interner = Interner::default();
        let request_key = interner.intern("key.request");
        Self {
            interner: Mutex::new(interner),
            responders: Mutex::new(FxHashMap::default()),
            recorded: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            handler: Mutex::new(None),
            next_handle: AtomicU64::new(1),
            request_key,
        }
    }

    /// Script the response for one request class (e.g.
    /// `"source.request.codecomplete"`). Replaces any previous script.
    pub fn on_request(
        &self,
        class: &str,
        responder: impl FnMut(&SkValue) -> ResponseResult + Send + 'static,
    ) {
        let class = self.interner.lock().intern(class);
        self.responders.lock().insert(class, Box::new(responder));
    }

    /// Every request payload seen so far, in order.
    pub fn recorded(&self) -> Vec<SkValue> {
        self.recorded.lock().clone()
    }

    /// Recorded requests of one class, in order.
    pub fn requests_of(&self, class: &str) -> Vec<SkValue> {
        let class = self.interner.lock().intern(class);
        self.recorded
            .lock()
            .iter()
            .filter(|request| request.uid(self.request_key) == Some(class))
            .cloned()
            .collect()
    }

    /// Handles cancelled so far.
    pub fn cancelled(&self) -> Vec<RequestHandle> {
        self.cancelled.lock().clone()
    }

    /// Whether the notification handler slot is occupied.
    pub fn has_notification_handler(&self) -> bool {
        self.handler.lock().is_some()
    }

    /// Deliver `notification` through the installed handler, if any.
    pub fn emit(&self, notification: SkValue) {
        if let Some(handler) = self.handler.lock().as_ref() {
            handler(&notification);
        }
    }

    /// Build a dictionary value, interning the key names.
    pub fn dict(&self, entries: &[(&str, SkValue)]) -> SkValue {
        let mut interner = self.interner.lock();
        let mut map = FxHashMap::default();
        for (key, value) in entries {
            map.insert(interner.intern(key), value.clone());
        }
        SkValue::Dictionary(map)
    }

    /// A UID value for `name`, interned on the spot.
    pub fn uid_value(&self, name: &str) -> SkValue {
        SkValue::Uid(self.interner.lock().intern(name))
    }

    fn respond(&self, request: &SkValue) -> ResponseResult {
        let class = request.uid(self.request_key);
        if let Some(class) = class {
            if let Some(responder) = self.responders.lock().get_mut(&class) {
                return responder(request);
            }
        }
        Ok(SkValue::dictionary())
    }
}

impl SourceKitService for ScriptedSourceKit {
    fn intern(&self, name: &str) -> Uid {
        self.interner.lock().intern(name)
    }

    fn uid_string(&self, uid: Uid) -> Option<String> {
        self.interner.lock().name(uid)
    }

    fn send_sync(&self, request: Request) -> ResponseResult {
        let payload = request.into_value();
        self.recorded.lock().push(payload.clone());
        self.respond(&payload)
    }

    fn send(&self, request: Request, on_done: CompletionFn) -> RequestHandle {
        let handle = RequestHandle::from_raw(self.next_handle.fetch_add(1, Ordering::SeqCst));
        let result = self.send_sync(request);
        on_done(result);
        handle
    }

    fn cancel(&self, handle: RequestHandle) {
        self.cancelled.lock().push(handle);
    }

    fn set_notification_handler(&self, handler: Option<NotificationFn>) {
        *self.handler.lock() = handler;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scripted_responses_are_keyed_by_request_class() {
        let service = ScriptedSourceKit::new();
        let class = service.intern("source.request.cursorinfo");
        let name_key = service.intern("key.name");
        {
            let response = service.dict(&[("key.name", SkValue::from("foo"))]);
            service.on_request("source.request.cursorinfo", move |_request| Ok(response.clone()));
        }

        let request_key = service.intern("key.request");
        let request = crate::request::RequestBuilder::new(request_key, class).build();
        let response = service.send_sync(request);
        assert_eq!(
            response.ok().and_then(|r| r.string(name_key).map(str::to_owned)),
            Some("foo".to_owned())
        );

        assert_eq!(service.requests_of("source.request.cursorinfo").len(), 1);
        assert_eq!(service.requests_of("source.request.codecomplete").len(), 0);
    }

    #[test]
    fn unscripted_requests_get_an_empty_dictionary() {
        let service = ScriptedSourceKit::new();
        let request_key = service.intern("key.request");
        let class = service.intern("source.request.editor.open");
        let request = crate::request::RequestBuilder::new(request_key, class).build();
        assert_eq!(service.send_sync(request), Ok(SkValue::dictionary()));
    }
}
