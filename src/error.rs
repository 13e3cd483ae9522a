//! # Field-Level Error Taxonomy
//!
//! Every fallible per-field operation returns a [`FieldError`] so that
//! ingestion pipelines can match on the failure kind and decide per record
//! whether to skip, default, or abort the batch. Batch-level APIs wrap these
//! in `eyre::Report` with added context.
//!
//! Schema construction violations (offset mismatch, duplicate field names,
//! oversized layouts) are deliberately *not* represented here: a schema is
//! built once, trusted, and reused for the life of the process, so those are
//! programmer errors that panic at build time.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// A numeric value does not fit the target field's byte width.
    #[error("value {value} does not fit an unsigned field of {width} bytes")]
    OutOfRange { value: u64, width: u8 },

    /// A non-digit character in an integer/timestamp token, or a non-hex
    /// character in a hex token.
    #[error("invalid digit 0x{byte:02x} in numeric token")]
    InvalidDigit { byte: u8 },

    /// A second `.` encountered while parsing a fixed-point token.
    #[error("duplicate decimal point in fixed-point token")]
    DuplicateDecimalPoint,

    /// Fixed-string input exceeds the field's declared width.
    #[error("input of {len} bytes exceeds fixed string width {width}")]
    TooLong { len: usize, width: usize },

    /// Hex-string input exceeds `2 * width` digits.
    #[error("hex token of {len} digits exceeds field capacity of {max} digits")]
    InvalidSize { len: usize, max: usize },

    /// A descriptor's extent lies outside the owning record's buffer; the
    /// descriptor belongs to a different schema.
    #[error("descriptor [{offset}..{end}) lies outside a record of {size} bytes")]
    OutOfBounds { offset: u16, end: usize, size: usize },

    /// An external value of the wrong kind was offered to a numeric field.
    #[error("{expected} value required for this field")]
    TypeMismatch { expected: &'static str },

    /// A record or batch operation was given an instance built from a
    /// different schema.
    #[error("record belongs to a different schema")]
    SchemaMismatch,

    /// A raw field image has the wrong length for the field's width.
    #[error("raw field image must be exactly {width} bytes, got {len}")]
    WidthMismatch { len: usize, width: u8 },

    /// A whole-record image has the wrong length for the schema's size.
    #[error("record image must be exactly {size} bytes, got {len}")]
    LengthMismatch { len: usize, size: usize },
}
