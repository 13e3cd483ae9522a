//! # Record Schema and Layout Engine
//!
//! A [`RecordSchema`] packs an ordered list of key fields followed by an
//! ordered list of value fields into one contiguous byte layout, assigning
//! every field its offset at build time. Records never store type
//! information per row; all interpretation comes from the schema.
//!
//! ## Record Binary Layout
//!
//! ```text
//! +--------------------------+--------------------------+
//! | Key Region               | Value Region             |
//! | [field 0][field 1]...    | [field k][field k+1]...  |
//! +--------------------------+--------------------------+
//! 0                          key_size                   size
//! ```
//!
//! Offsets are contiguous: each field starts exactly where the previous one
//! ends, keys first, values continuing from `key_size`.
//!
//! ## Construction Contract
//!
//! Schemas are built once through [`SchemaBuilder`], then shared read-only
//! behind an `Arc` by every record created from them. Construction-time
//! violations are programmer errors and panic:
//!
//! - a caller-asserted offset that disagrees with the computed layout
//! - a duplicate field name
//! - a zero-width string field
//! - a layout exceeding [`MAX_RECORD_SIZE`]
//!
//! ## Key Comparators
//!
//! The schema also exposes raw-slice comparators ([`RecordSchema::compare_keys`],
//! [`RecordSchema::keys_in_range`]) so an external engine can order and
//! range-filter encoded records without materializing instances.

use std::cmp::Ordering;
use std::sync::Arc;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::MAX_RECORD_SIZE;
use crate::fields::codec;
use crate::fields::descriptor::FieldDescriptor;
use crate::fields::types::FieldType;
use crate::record::Record;

/// One named field of a schema together with its assigned descriptor.
#[derive(Debug, Clone)]
pub struct SchemaField {
    name: String,
    desc: FieldDescriptor,
}

impl SchemaField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        self.desc
    }

    pub fn ty(&self) -> FieldType {
        self.desc.ty()
    }
}

/// An immutable record layout: ordered key fields, ordered value fields,
/// and the sizes derived from them.
#[derive(Debug)]
pub struct RecordSchema {
    keys: SmallVec<[SchemaField; 4]>,
    values: SmallVec<[SchemaField; 4]>,
    by_name: HashMap<String, FieldDescriptor>,
    key_size: usize,
    size: usize,
}

impl RecordSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Total record size in bytes (key region plus value region).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Size of the leading key region in bytes.
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn key_fields(&self) -> &[SchemaField] {
        &self.keys
    }

    pub fn value_fields(&self) -> &[SchemaField] {
        &self.values
    }

    /// All fields in layout order: keys first, then values.
    pub fn fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.keys.iter().chain(self.values.iter())
    }

    /// Looks up a field's descriptor by name.
    pub fn field(&self, name: &str) -> Option<FieldDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Allocates a zero-initialized record bound to this schema.
    pub fn new_record(self: &Arc<Self>) -> Record {
        Record::new(Arc::clone(self))
    }

    /// Compares two encoded records (or bare key regions) field by field in
    /// declared key order. The slices must hold at least `key_size` bytes.
    pub fn compare_keys(&self, a: &[u8], b: &[u8]) -> Ordering {
        assert!(a.len() >= self.key_size && b.len() >= self.key_size);
        for field in &self.keys {
            let desc = field.desc;
            let ord = codec::compare(
                desc.ty(),
                &a[desc.start()..desc.end()],
                &b[desc.start()..desc.end()],
            );
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Inclusive per-field range membership over the key region: `Less`
    /// when the first decisive field sorts before its low bound, `Greater`
    /// when it sorts after its high bound, `Equal` when every key field
    /// lies within its bounds. This is the box-style membership test a
    /// cursor skip-scan uses to reject records outside a query window.
    pub fn keys_in_range(&self, v: &[u8], lo: &[u8], hi: &[u8]) -> Ordering {
        assert!(
            v.len() >= self.key_size && lo.len() >= self.key_size && hi.len() >= self.key_size
        );
        for field in &self.keys {
            let desc = field.desc;
            let span = desc.start()..desc.end();
            let ord = codec::between(desc.ty(), &v[span.clone()], &lo[span.clone()], &hi[span]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[derive(Debug, Clone)]
struct PendingField {
    name: String,
    ty: FieldType,
    asserted_offset: Option<u16>,
}

/// Fluent schema construction: declare key fields, then value fields, in
/// the order they should be laid out.
///
/// ```
/// use rowpack::{FieldType, RecordSchema};
///
/// let schema = RecordSchema::builder()
///     .key("account", FieldType::UInt32)
///     .key("at", FieldType::Timestamp)
///     .value("amount", FieldType::Double)
///     .build();
///
/// assert_eq!(schema.key_size(), 12);
/// assert_eq!(schema.size(), 20);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    keys: Vec<PendingField>,
    values: Vec<PendingField>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key field with an auto-assigned offset.
    pub fn key(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.keys.push(PendingField {
            name: name.into(),
            ty,
            asserted_offset: None,
        });
        self
    }

    /// Appends a key field whose offset the caller asserts. Building panics
    /// if the asserted offset disagrees with the computed layout.
    pub fn key_at(mut self, name: impl Into<String>, offset: u16, ty: FieldType) -> Self {
        self.keys.push(PendingField {
            name: name.into(),
            ty,
            asserted_offset: Some(offset),
        });
        self
    }

    /// Appends a value field with an auto-assigned offset.
    pub fn value(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.values.push(PendingField {
            name: name.into(),
            ty,
            asserted_offset: None,
        });
        self
    }

    /// Appends a value field whose offset the caller asserts.
    pub fn value_at(mut self, name: impl Into<String>, offset: u16, ty: FieldType) -> Self {
        self.values.push(PendingField {
            name: name.into(),
            ty,
            asserted_offset: Some(offset),
        });
        self
    }

    /// Computes the layout and freezes the schema.
    ///
    /// # Panics
    ///
    /// On any construction contract violation; see the module docs. Schemas
    /// are authored once and trusted, so violations are fatal rather than
    /// recoverable errors.
    pub fn build(self) -> Arc<RecordSchema> {
        let mut by_name = HashMap::with_capacity(self.keys.len() + self.values.len());
        let mut offset = 0usize;

        let mut place = |pending: &PendingField, offset: &mut usize| -> SchemaField {
            let width = pending.ty.width() as usize;
            assert!(
                width > 0,
                "field '{}' has zero width; string fields need a declared size",
                pending.name
            );
            if let Some(asserted) = pending.asserted_offset {
                assert_eq!(
                    asserted as usize, *offset,
                    "field '{}' asserts offset {} but the layout places it at {}",
                    pending.name, asserted, offset
                );
            }
            assert!(
                *offset + width <= MAX_RECORD_SIZE,
                "record layout exceeds {} bytes at field '{}'",
                MAX_RECORD_SIZE,
                pending.name
            );

            let desc = FieldDescriptor::new(pending.ty, *offset as u16);
            let prev = by_name.insert(pending.name.clone(), desc);
            assert!(prev.is_none(), "duplicate field name '{}'", pending.name);

            *offset += width;
            SchemaField {
                name: pending.name.clone(),
                desc,
            }
        };

        let keys: SmallVec<[SchemaField; 4]> =
            self.keys.iter().map(|p| place(p, &mut offset)).collect();
        let key_size = offset;
        let values: SmallVec<[SchemaField; 4]> =
            self.values.iter().map(|p| place(p, &mut offset)).collect();

        Arc::new(RecordSchema {
            keys,
            values,
            by_name,
            key_size,
            size: offset,
        })
    }
}
