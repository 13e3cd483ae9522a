//! # Packed Record Batches
//!
//! A [`RecordArray`] holds many records of one schema back to back in a
//! single contiguous buffer, the shape a bulk loader hands to a storage
//! engine in one call. Pushing copies the record image; the array can be
//! reset and refilled without reallocating, so two arrays can ping-pong
//! between a parser thread and a writer thread.
//!
//! ```text
//! +----------+----------+----------+---     ---+
//! | record 0 | record 1 | record 2 |    ...    |
//! +----------+----------+----------+---     ---+
//! each slot exactly schema.size() bytes
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use eyre::Result;

use crate::config::DEFAULT_BATCH_CAPACITY;
use crate::error::FieldError;
use crate::record::Record;
use crate::schema::RecordSchema;

/// A contiguous batch of same-schema records.
#[derive(Debug)]
pub struct RecordArray {
    schema: Arc<RecordSchema>,
    buf: Vec<u8>,
    len: usize,
    capacity: usize,
    expandable: bool,
}

impl RecordArray {
    /// Creates a batch with room for `capacity` records. A non-expandable
    /// batch rejects pushes once full; an expandable one grows.
    pub fn new(schema: Arc<RecordSchema>, capacity: usize, expandable: bool) -> Self {
        let buf = Vec::with_capacity(capacity * schema.size());
        Self {
            schema,
            buf,
            len: 0,
            capacity,
            expandable,
        }
    }

    /// Creates an expandable batch with the default capacity.
    pub fn expandable(schema: Arc<RecordSchema>) -> Self {
        Self::new(schema, DEFAULT_BATCH_CAPACITY, true)
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once `len` has reached capacity. An expandable batch reports
    /// full too; pushing to it grows the capacity instead of failing.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a copy of `rec`'s buffer.
    pub fn push(&mut self, rec: &Record) -> Result<()> {
        eyre::ensure!(
            Arc::ptr_eq(&self.schema, rec.schema_arc()),
            FieldError::SchemaMismatch
        );
        if self.is_full() {
            eyre::ensure!(
                self.expandable,
                "batch is full ({} records) and not expandable",
                self.capacity
            );
            self.capacity = (self.capacity * 2).max(1);
        }
        self.buf.extend_from_slice(rec.as_bytes());
        self.len += 1;
        Ok(())
    }

    /// Raw image of the record at `idx`.
    pub fn record_bytes(&self, idx: usize) -> Option<&[u8]> {
        if idx >= self.len {
            return None;
        }
        let size = self.schema.size();
        Some(&self.buf[idx * size..(idx + 1) * size])
    }

    /// Copies the record at `idx` into `out`.
    pub fn copy_into(&self, idx: usize, out: &mut Record) -> Result<()> {
        eyre::ensure!(
            Arc::ptr_eq(&self.schema, out.schema_arc()),
            FieldError::SchemaMismatch
        );
        let bytes = self
            .record_bytes(idx)
            .ok_or_else(|| eyre::eyre!("record index {} out of bounds (len {})", idx, self.len))?;
        out.load_bytes(bytes)?;
        Ok(())
    }

    /// Iterates the raw record images in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.buf.chunks_exact(self.schema.size()).take(self.len)
    }

    /// Clears the batch, keeping the allocation for reuse.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.len = 0;
    }

    /// Reorders the batch by the schema's key comparator (stable), the
    /// order a sorted store expects bulk input in.
    pub fn sort_by_key(&mut self) {
        let size = self.schema.size();
        let mut order: Vec<usize> = (0..self.len).collect();
        {
            let buf = &self.buf;
            let schema = &self.schema;
            order.sort_by(|&a, &b| {
                schema.compare_keys(&buf[a * size..(a + 1) * size], &buf[b * size..(b + 1) * size])
            });
        }

        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return;
        }
        let mut sorted = Vec::with_capacity(self.buf.len());
        for idx in order {
            sorted.extend_from_slice(&self.buf[idx * size..(idx + 1) * size]);
        }
        self.buf = sorted;
    }

    /// First index whose record key is not less than `probe`'s key, assuming
    /// the batch is sorted by [`RecordArray::sort_by_key`].
    pub fn lower_bound(&self, probe: &Record) -> usize {
        let size = self.schema.size();
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let mid_bytes = &self.buf[mid * size..(mid + 1) * size];
            if self.schema.compare_keys(mid_bytes, probe.as_bytes()) == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}
