//! Opaque interned identifiers shared with the analyzer.

/// A stable identifier interned by the analyzer service.
///
/// UIDs support equality only; the string they intern is owned by the
/// service and can be recovered through
/// [`SourceKitService::uid_string`](crate::SourceKitService::uid_string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl Uid {
    /// Wrap a raw service-assigned value. Only service implementations
    /// should mint these.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw service-assigned value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}
