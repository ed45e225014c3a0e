//! Typed request construction.

use rustc_hash::FxHashMap;

use crate::uid::Uid;
use crate::value::SkValue;

/// A complete analyzer request: a UID-keyed dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Request(SkValue);

impl Request {
    /// The request's dictionary payload.
    pub fn value(&self) -> &SkValue {
        &self.0
    }

    /// Consume the request, yielding its payload.
    pub fn into_value(self) -> SkValue {
        self.0
    }
}

/// Builder assembling a request dictionary from heterogeneous values.
///
/// Every entry goes through `Into<SkValue>`, so integers, strings, UIDs,
/// booleans, and arrays all read the same at the call site.
#[derive(Debug)]
pub struct RequestBuilder {
    entries: FxHashMap<Uid, SkValue>,
}

impl RequestBuilder {
    /// Start a request of the class named by `request_uid`, stored under
    /// the `request_key` dictionary key.
    pub fn new(request_key: Uid, request_uid: Uid) -> Self {
        let mut entries = FxHashMap::default();
        entries.insert(request_key, SkValue::Uid(request_uid));
        Self { entries }
    }

    /// Set `key` to `value`.
    pub fn set(mut self, key: Uid, value: impl Into<SkValue>) -> Self {
        self.entries.insert(key, value.into());
        self
    }

    /// Set `key` to `value` when present; absent values leave the key out.
    pub fn set_opt(self, key: Uid, value: Option<impl Into<SkValue>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Finish the request.
    pub fn build(self) -> Request {
        Request(SkValue::Dictionary(self.entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_a_uid_keyed_dictionary() {
        let request_key = Uid::from_raw(0);
        let class = Uid::from_raw(1);
        let name = Uid::from_raw(2);
        let offset = Uid::from_raw(3);

        let request = RequestBuilder::new(request_key, class)
            .set(name, "file:///a.swift")
            .set(offset, 42usize)
            .set_opt(Uid::from_raw(4), None::<&str>)
            .build();

        assert_eq!(request.value().uid(request_key), Some(class));
        assert_eq!(request.value().string(name), Some("file:///a.swift"));
        assert_eq!(request.value().int(offset), Some(42));
        assert_eq!(request.value().get(Uid::from_raw(4)), None);
    }
}
