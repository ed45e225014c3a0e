//! Typed bridge to the native Swift semantic analyzer.
//!
//! The analyzer is an opaque request/response oracle: requests are UID-keyed
//! dictionaries, responses are traversed by key lookup, and asynchronous
//! notifications (for example "document updated") arrive through a single
//! process-wide handler slot. This crate provides:
//!
//! - [`SourceKitService`] - the service façade a platform adapter implements
//! - [`SkValue`] / [`Request`] / [`RequestBuilder`] - typed request building
//!   and faultless response traversal
//! - [`Bridge`] - UID tables, request constructors for the known request
//!   classes, and notification fan-out to any number of subscribers
//! - [`testing`] - a scripted in-process service for driving the server in
//!   tests
//!
//! Platform adapters that bind a loaded `sourcekitd` library to
//! [`SourceKitService`] live outside this crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod error;
mod request;
mod service;
mod tables;
/// Scripted in-process service implementation for tests.
pub mod testing;
mod uid;
mod value;

pub use bridge::{Bridge, NotificationSubscriber};
pub use error::BridgeError;
pub use request::{Request, RequestBuilder};
pub use service::{CompletionFn, NotificationFn, RequestHandle, ResponseResult, SourceKitService};
pub use tables::{Keys, RequestNames, Values};
pub use uid::Uid;
pub use value::SkValue;
