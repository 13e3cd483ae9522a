//! # Layout and Ingestion Limits
//!
//! ## Dependency Graph
//!
//! ```text
//! FieldDescriptor.offset (u16)
//!       │
//!       └─> MAX_RECORD_SIZE (must fit the u16 offset space; the schema
//!           builder rejects layouts whose running offset would overflow)
//!
//! FieldType::Str(n) / FieldType::HexStr(n)  (n: u8)
//!       │
//!       └─> MAX_STRING_WIDTH (a single string field never exceeds the u8
//!           width space; HexStr externalizes as 2n hex digits)
//!
//! TIMESTAMP_PRECISION (3)
//!       └─> Timestamp text tokens carry 3 implied decimal digits; the
//!           fractional part is padded or truncated to exactly this many.
//! ```

/// Upper bound on a schema's total record size in bytes. Field offsets are
/// stored as `u16`, so the final field must end within this space.
pub const MAX_RECORD_SIZE: usize = u16::MAX as usize;

/// Upper bound on a single fixed/hex string field's byte width.
pub const MAX_STRING_WIDTH: usize = u8::MAX as usize;

/// Implied decimal digits in millisecond-precision timestamp text.
pub const TIMESTAMP_PRECISION: u32 = 3;

/// Default capacity (in records) for [`crate::RecordArray`] batches created
/// without an explicit size.
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

const _: () = assert!(MAX_RECORD_SIZE <= u16::MAX as usize);
const _: () = assert!(MAX_STRING_WIDTH <= MAX_RECORD_SIZE);
const _: () = assert!(DEFAULT_BATCH_CAPACITY > 0);
