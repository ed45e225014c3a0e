//! Line table and position mapping for LSP coordinate translation.
//!
//! LSP positions are `(line, UTF-16 code unit)` pairs while the native
//! analyzer speaks UTF-8 byte offsets. [`LineTable`] reconciles the two:
//! it indexes a text buffer by line and converts in both directions.
//! Conversions are strict: out-of-range lines or columns and offsets that
//! land in the middle of a scalar return `None` instead of clamping.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod line_table;

pub use line_table::LineTable;
