//! # Record Instances
//!
//! A [`Record`] is a fixed-size byte buffer bound to the [`RecordSchema`]
//! that defines how to interpret it. Every field access dispatches through
//! the codec selected by a [`FieldDescriptor`], using the descriptor's
//! offset to locate the field slot within the buffer.
//!
//! ## Lifecycle
//!
//! ```text
//! create -> {zero | set*} -> {get | set | sum_from | duplicate}* -> drop
//! ```
//!
//! Records are allocated zero-initialized. Each field write is atomic with
//! respect to that field's bytes; there is no partially-written field state
//! observable through the API.
//!
//! ## Descriptor Validation
//!
//! `get`/`set` and friends re-validate the descriptor extent against the
//! buffer on every call, so a descriptor taken from a different schema
//! fails with [`FieldError::OutOfBounds`] instead of reading foreign bytes.
//!
//! ## Thread Safety
//!
//! A record exclusively owns its buffer: one writer or many readers, never
//! both. The schema behind the `Arc` is immutable and freely shared.

use std::cmp::Ordering;
use std::sync::Arc;

use eyre::Result;

use crate::error::FieldError;
use crate::fields::codec;
use crate::fields::descriptor::FieldDescriptor;
use crate::schema::RecordSchema;
use crate::types::Value;

/// One inclusive per-field constraint used by [`Record::build_range`].
#[derive(Debug, Clone)]
pub enum KeyBound<'a> {
    /// No constraint: the field spans its full sort-order domain.
    Any,
    /// The field must equal this value.
    Exact(Value<'a>),
    /// The field must lie within `[low, high]` in sort order.
    Range(Value<'a>, Value<'a>),
}

/// A fixed-size record buffer plus the schema that interprets it.
#[derive(Debug)]
pub struct Record {
    schema: Arc<RecordSchema>,
    buf: Box<[u8]>,
}

impl Record {
    pub(crate) fn new(schema: Arc<RecordSchema>) -> Self {
        let buf = vec![0u8; schema.size()].into_boxed_slice();
        Self { schema, buf }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub(crate) fn schema_arc(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// The full encoded record image (native in-memory representation).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The leading key region.
    pub fn key_bytes(&self) -> &[u8] {
        &self.buf[..self.schema.key_size()]
    }

    /// The trailing value region.
    pub fn value_bytes(&self) -> &[u8] {
        &self.buf[self.schema.key_size()..]
    }

    /// Replaces the whole buffer with an encoded record image of exactly
    /// `schema.size()` bytes.
    pub fn load_bytes(&mut self, src: &[u8]) -> Result<(), FieldError> {
        if src.len() != self.buf.len() {
            return Err(FieldError::LengthMismatch {
                len: src.len(),
                size: self.buf.len(),
            });
        }
        self.buf.copy_from_slice(src);
        Ok(())
    }

    /// Resets every field to its default (all defaults are zero-valued, so
    /// this is a whole-buffer zero fill).
    pub fn zero(&mut self) {
        self.buf.fill(0);
    }

    /// Allocates a new record under the same schema holding a byte-for-byte
    /// copy of this one.
    pub fn duplicate(&self) -> Record {
        Record {
            schema: Arc::clone(&self.schema),
            buf: self.buf.clone(),
        }
    }

    fn slot(&self, desc: FieldDescriptor) -> Result<&[u8], FieldError> {
        if desc.end() > self.buf.len() {
            return Err(FieldError::OutOfBounds {
                offset: desc.offset(),
                end: desc.end(),
                size: self.buf.len(),
            });
        }
        Ok(&self.buf[desc.start()..desc.end()])
    }

    fn slot_mut(&mut self, desc: FieldDescriptor) -> Result<&mut [u8], FieldError> {
        if desc.end() > self.buf.len() {
            return Err(FieldError::OutOfBounds {
                offset: desc.offset(),
                end: desc.end(),
                size: self.buf.len(),
            });
        }
        Ok(&mut self.buf[desc.start()..desc.end()])
    }

    /// Decodes one field into its external representation.
    pub fn get(&self, desc: FieldDescriptor) -> Result<Value<'_>, FieldError> {
        Ok(codec::decode(desc.ty(), self.slot(desc)?))
    }

    /// Encodes an external value into one field.
    pub fn set<'v>(
        &mut self,
        desc: FieldDescriptor,
        value: impl Into<Value<'v>>,
    ) -> Result<(), FieldError> {
        let value = value.into();
        codec::encode(desc.ty(), self.slot_mut(desc)?, &value)
    }

    /// Parses a textual token into one field; the bulk-ingestion entry
    /// point and the only one that can fail with a parse error.
    pub fn parse_text(&mut self, desc: FieldDescriptor, token: &[u8]) -> Result<(), FieldError> {
        codec::parse_text(desc.ty(), self.slot_mut(desc)?, token)
    }

    /// Copies exactly `desc.width()` raw bytes into the field.
    pub fn load_field(&mut self, desc: FieldDescriptor, src: &[u8]) -> Result<(), FieldError> {
        codec::load_raw(desc.ty(), self.slot_mut(desc)?, src)
    }

    /// Copies exactly `desc.width()` raw bytes out of the field.
    pub fn store_field(&self, desc: FieldDescriptor, dst: &mut [u8]) -> Result<(), FieldError> {
        codec::store_raw(desc.ty(), self.slot(desc)?, dst)
    }

    /// Resets one field to its default value.
    pub fn set_default(&mut self, desc: FieldDescriptor) -> Result<(), FieldError> {
        codec::write_default(desc.ty(), self.slot_mut(desc)?);
        Ok(())
    }

    /// Writes the field's sort-order minimum (for descending fields, the
    /// numeric maximum).
    pub fn set_min(&mut self, desc: FieldDescriptor) -> Result<(), FieldError> {
        codec::write_min(desc.ty(), self.slot_mut(desc)?);
        Ok(())
    }

    /// Writes the field's sort-order maximum.
    pub fn set_max(&mut self, desc: FieldDescriptor) -> Result<(), FieldError> {
        codec::write_max(desc.ty(), self.slot_mut(desc)?);
        Ok(())
    }

    /// Advances the field to its sort-order successor (saturating).
    pub fn increment_field(&mut self, desc: FieldDescriptor) -> Result<(), FieldError> {
        codec::increment(desc.ty(), self.slot_mut(desc)?);
        Ok(())
    }

    /// Three-way comparison of one field against the same field of another
    /// record, under the field's sort direction.
    pub fn compare_field(
        &self,
        desc: FieldDescriptor,
        other: &Record,
    ) -> Result<Ordering, FieldError> {
        Ok(codec::compare(desc.ty(), self.slot(desc)?, other.slot(desc)?))
    }

    /// Like [`Record::compare_field`], but the right-hand operand is the
    /// field's raw encoded image (no temporary record needed when comparing
    /// against an encoded bound).
    pub fn compare_field_raw(
        &self,
        desc: FieldDescriptor,
        raw: &[u8],
    ) -> Result<Ordering, FieldError> {
        if raw.len() != desc.width() as usize {
            return Err(FieldError::WidthMismatch {
                len: raw.len(),
                width: desc.width(),
            });
        }
        Ok(codec::compare(desc.ty(), self.slot(desc)?, raw))
    }

    /// Inclusive range membership of one field between the same field of
    /// two bound records.
    pub fn field_between(
        &self,
        desc: FieldDescriptor,
        lo: &Record,
        hi: &Record,
    ) -> Result<Ordering, FieldError> {
        Ok(codec::between(
            desc.ty(),
            self.slot(desc)?,
            lo.slot(desc)?,
            hi.slot(desc)?,
        ))
    }

    /// Raw-operand overload of [`Record::field_between`].
    pub fn field_between_raw(
        &self,
        desc: FieldDescriptor,
        lo: &[u8],
        hi: &[u8],
    ) -> Result<Ordering, FieldError> {
        let width = desc.width() as usize;
        if lo.len() != width || hi.len() != width {
            return Err(FieldError::WidthMismatch {
                len: if lo.len() != width { lo.len() } else { hi.len() },
                width: desc.width(),
            });
        }
        Ok(codec::between(desc.ty(), self.slot(desc)?, lo, hi))
    }

    /// Whole-key comparison against another record of the same schema,
    /// field by field in declared order.
    pub fn compare_keys(&self, other: &Record) -> Ordering {
        debug_assert!(Arc::ptr_eq(&self.schema, &other.schema));
        self.schema.compare_keys(&self.buf, &other.buf)
    }

    /// Whole-key range membership between two bound records.
    pub fn keys_in_range(&self, lo: &Record, hi: &Record) -> Ordering {
        debug_assert!(
            Arc::ptr_eq(&self.schema, &lo.schema) && Arc::ptr_eq(&self.schema, &hi.schema)
        );
        self.schema.keys_in_range(&self.buf, &lo.buf, &hi.buf)
    }

    /// Adds every field of `other` into this record, field by field across
    /// both regions. Intended for aggregating value fields across records
    /// whose key fields are equal; no key-equality check is performed here.
    ///
    /// Fails when `other` belongs to a different schema. Panics if the
    /// schema contains string fields, which do not support aggregation.
    pub fn sum_from(&mut self, other: &Record) -> Result<()> {
        eyre::ensure!(
            Arc::ptr_eq(&self.schema, &other.schema),
            FieldError::SchemaMismatch
        );
        let schema = Arc::clone(&self.schema);
        for field in schema.fields() {
            let desc = field.descriptor();
            codec::add_assign(
                desc.ty(),
                &mut self.buf[desc.start()..desc.end()],
                &other.buf[desc.start()..desc.end()],
            );
        }
        Ok(())
    }

    /// Builds the low/high boundary records for a key-range query: one
    /// [`KeyBound`] per key field in declared order. Unconstrained fields
    /// span their full sort-order domain; value fields stay at their
    /// defaults.
    pub fn build_range(
        schema: &Arc<RecordSchema>,
        bounds: &[KeyBound<'_>],
    ) -> Result<(Record, Record)> {
        eyre::ensure!(
            bounds.len() == schema.key_fields().len(),
            "expected {} key bounds, got {}",
            schema.key_fields().len(),
            bounds.len()
        );

        let mut lo = schema.new_record();
        let mut hi = schema.new_record();
        for (field, bound) in schema.key_fields().iter().zip(bounds) {
            let desc = field.descriptor();
            match bound {
                KeyBound::Any => {
                    lo.set_min(desc)?;
                    hi.set_max(desc)?;
                }
                KeyBound::Exact(v) => {
                    lo.set(desc, v.clone())?;
                    hi.set(desc, v.clone())?;
                }
                KeyBound::Range(a, b) => {
                    lo.set(desc, a.clone())?;
                    hi.set(desc, b.clone())?;
                }
            }
        }
        Ok((lo, hi))
    }
}
