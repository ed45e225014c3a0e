//! Analyzer value trees.
//!
//! Requests and responses share one shape: a dictionary keyed by [`Uid`]
//! whose values are scalars, arrays, or nested dictionaries. Traversal is
//! faultless by contract: a missing key and a type mismatch both yield an
//! absent `Option`.

use rustc_hash::FxHashMap;

use crate::uid::Uid;

/// A value in an analyzer request or response.
#[derive(Debug, Clone, PartialEq)]
pub enum SkValue {
    /// Absent/null marker
    Null,
    /// Boolean scalar
    Bool(bool),
    /// 64-bit integer scalar
    Int(i64),
    /// UTF-8 string scalar
    String(String),
    /// Interned identifier
    Uid(Uid),
    /// Ordered sequence
    Array(Vec<SkValue>),
    /// UID-keyed dictionary
    Dictionary(FxHashMap<Uid, SkValue>),
}

impl SkValue {
    /// Empty dictionary value.
    pub fn dictionary() -> Self {
        SkValue::Dictionary(FxHashMap::default())
    }

    /// String payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SkValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SkValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SkValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// UID payload, if this is a UID.
    pub fn as_uid(&self) -> Option<Uid> {
        match self {
            SkValue::Uid(uid) => Some(*uid),
            _ => None,
        }
    }

    /// Array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[SkValue]> {
        match self {
            SkValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Dictionary entries, if this is a dictionary.
    pub fn as_dictionary(&self) -> Option<&FxHashMap<Uid, SkValue>> {
        match self {
            SkValue::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up `key` in a dictionary value.
    pub fn get(&self, key: Uid) -> Option<&SkValue> {
        self.as_dictionary()?.get(&key)
    }

    /// String at `key`.
    pub fn string(&self, key: Uid) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Integer at `key`.
    pub fn int(&self, key: Uid) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// Non-negative integer at `key`, as a byte count/offset.
    pub fn offset(&self, key: Uid) -> Option<usize> {
        usize::try_from(self.int(key)?).ok()
    }

    /// UID at `key`.
    pub fn uid(&self, key: Uid) -> Option<Uid> {
        self.get(key)?.as_uid()
    }

    /// Array at `key`.
    pub fn array(&self, key: Uid) -> Option<&[SkValue]> {
        self.get(key)?.as_array()
    }
}

impl From<bool> for SkValue {
    fn from(b: bool) -> Self {
        SkValue::Bool(b)
    }
}

impl From<i64> for SkValue {
    fn from(n: i64) -> Self {
        SkValue::Int(n)
    }
}

impl From<usize> for SkValue {
    fn from(n: usize) -> Self {
        SkValue::Int(n as i64)
    }
}

impl From<&str> for SkValue {
    fn from(s: &str) -> Self {
        SkValue::String(s.to_owned())
    }
}

impl From<String> for SkValue {
    fn from(s: String) -> Self {
        SkValue::String(s)
    }
}

impl From<Uid> for SkValue {
    fn from(uid: Uid) -> Self {
        SkValue::Uid(uid)
    }
}

impl From<Vec<SkValue>> for SkValue {
    fn from(items: Vec<SkValue>) -> Self {
        SkValue::Array(items)
    }
}
