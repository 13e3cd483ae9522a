//! # rowpack - Fixed-Layout Sortable Records
//!
//! rowpack defines fixed-layout binary records whose fields are described
//! by a small closed schema language, and provides typed, order-aware
//! access to those fields for use as sortable keys and aggregable values
//! in a storage or query engine. The engine itself (indexing, persistence,
//! scanning) is the caller's business; rowpack is the record format and the
//! comparator framework under it.
//!
//! ## Quick Start
//!
//! ```
//! use rowpack::{FieldType, RecordSchema, Value};
//!
//! let schema = RecordSchema::builder()
//!     .key("account", FieldType::UInt32)
//!     .key("at", FieldType::Timestamp)
//!     .value("amount", FieldType::Double)
//!     .build();
//!
//! let mut rec = schema.new_record();
//! rec.set(schema.field("account").unwrap(), 42u64)?;
//! rec.set(schema.field("at").unwrap(), 1_700_000_000_500u64)?;
//! rec.set(schema.field("amount").unwrap(), 9.75f64)?;
//!
//! assert_eq!(rec.get(schema.field("amount").unwrap())?, Value::Double(9.75));
//! # Ok::<(), rowpack::FieldError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------+
//! |  ingest  (LineParser, bulk text loading) |
//! +------------------------------------------+
//! |  array   (packed same-schema batches)    |
//! +------------------------------------------+
//! |  record  (buffer lifecycle, field access)|
//! +------------------------------------------+
//! |  schema  (layout engine, key comparators)|
//! +------------------------------------------+
//! |  fields  (types, descriptors, codecs)    |
//! +------------------------------------------+
//! ```
//!
//! Control flows strictly downward; a codec never sees more than the
//! field-sized slot it operates on.
//!
//! ## Ordering
//!
//! Every field variant defines a three-way comparison consistent with its
//! sort direction, an inclusive `between` range test, sort-order extrema,
//! and a saturating increment-to-successor. Composite keys compare field by
//! field in declared order, so an external engine can order, bound, and
//! skip-scan encoded records without knowing field types.
//!
//! ## Raw Interchange
//!
//! Field and record images are exchanged in native in-memory
//! representation; no byte-order transformation is applied. Encoded images
//! are therefore host-endianness-dependent and not a portable wire format.
//!
//! ## Module Overview
//!
//! - [`fields`]: field type enum, descriptors, per-variant codecs
//! - [`schema`]: layout engine and raw-slice key comparators
//! - [`record`]: record instances and per-field operations
//! - [`array`]: contiguous record batches for bulk loading
//! - [`ingest`]: delimited-text ingestion
//! - [`config`]: centralized limits
//! - [`error`]: the field-level error taxonomy

pub mod array;
pub mod config;
pub mod error;
pub mod fields;
pub mod ingest;
pub mod record;
pub mod schema;
pub mod types;

pub use array::RecordArray;
pub use error::FieldError;
pub use fields::descriptor::FieldDescriptor;
pub use fields::types::FieldType;
pub use ingest::{ColumnSpec, ImportStats, LineParser, ParsePolicy};
pub use record::{KeyBound, Record};
pub use schema::{RecordSchema, SchemaBuilder, SchemaField};
pub use types::Value;
