//! Errors surfaced by descriptor building, decoding and encoding.

use thiserror::Error;

use crate::{codec::CodecError, range::TagError};

/// A malformed column-range declaration, found while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid column range `{tag}` on field `{field}`: {reason}.")]
pub struct InvalidTag {
    /// Name of the declaring field.
    pub field: &'static str,
    /// The declaration as written.
    pub tag: &'static str,
    pub reason: TagError,
}

/// Errors occurring while decoding or encoding records.
#[derive(Debug, Error)]
pub enum Error {
    /// The record type declares a malformed column range.
    #[error(transparent)]
    InvalidTag(#[from] InvalidTag),
    /// A single record was requested from input without any data lines.
    #[error("No data to decode.")]
    NoData,
    /// A field's text could not be converted.
    #[error("Failed to decode field `{field}` on line {line}: {source}.")]
    Decode {
        /// Physical line number in the input, counting from one.
        line: usize,
        field: &'static str,
        source: CodecError,
    },
    /// A field's value could not be written within its columns.
    #[error("Failed to encode field `{field}` of record {record}: {source}.")]
    Encode {
        /// Position of the record in the source, counting from zero.
        record: usize,
        field: &'static str,
        source: CodecError,
    },
}
