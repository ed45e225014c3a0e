//! Service façade implemented by platform adapters.

use crate::error::BridgeError;
use crate::request::Request;
use crate::uid::Uid;
use crate::value::SkValue;

/// Outcome of an analyzer request.
pub type ResponseResult = Result<SkValue, BridgeError>;

/// One-shot completion callback for an asynchronous request.
pub type CompletionFn = Box<dyn FnOnce(ResponseResult) + Send>;

/// Callback invoked for unsolicited analyzer notifications.
pub type NotificationFn = Box<dyn Fn(&SkValue) + Send + Sync>;

/// Handle to an in-flight asynchronous request.
///
/// The service owns the underlying resource; the handle is only good for a
/// best-effort [`SourceKitService::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestHandle(u64);

impl RequestHandle {
    /// Mint a handle from a service-assigned serial.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The service-assigned serial.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The loaded analyzer library, seen through its typed façade.
///
/// Implementations are internally synchronized: concurrent `send` and
/// `send_sync` calls are permitted. The notification handler slot is owned
/// by the [`Bridge`](crate::Bridge), which installs exactly one handler per
/// process lifetime and multiplexes subscribers itself.
pub trait SourceKitService: Send + Sync {
    /// Intern `name`, returning its stable UID.
    fn intern(&self, name: &str) -> Uid;

    /// Recover the string a UID interns, if the service knows it.
    fn uid_string(&self, uid: Uid) -> Option<String>;

    /// Issue `request` and block until its response arrives.
    fn send_sync(&self, request: Request) -> ResponseResult;

    /// Issue `request` asynchronously; `on_done` is invoked exactly once
    /// with the outcome.
    fn send(&self, request: Request, on_done: CompletionFn) -> RequestHandle;

    /// Best-effort cancellation of an in-flight request.
    fn cancel(&self, handle: RequestHandle);

    /// Install or clear the process-wide notification handler.
    fn set_notification_handler(&self, handler: Option<NotificationFn>);
}
