//! # Delimited-Text Bulk Ingestion
//!
//! Turns separator-delimited text lines into records by driving each
//! field's textual codec. One [`ColumnSpec`] per input column maps the line
//! onto the schema; columns carrying data the schema does not store are
//! skipped, and unsigned fields fed from fixed-point sources can rescale at
//! any precision (timestamps at millisecond precision being the common
//! case).
//!
//! ## Error Policy
//!
//! Parsing a line is all-or-nothing per record but the batch policy is
//! configurable:
//!
//! - [`ParsePolicy::Lenient`] (default): an unparseable line is skipped,
//!   counted, and logged at debug level; loading continues.
//! - [`ParsePolicy::Strict`]: the first unparseable line aborts the batch
//!   with the line number attached.
//!
//! Lenient double parsing (a non-numeric token yielding 0.0) is not an
//! error under either policy; it is the documented behavior of the double
//! codec itself.

use std::io::BufRead;
use std::sync::Arc;

use eyre::{Result, WrapErr};
use tracing::{debug, trace};

use crate::array::RecordArray;
use crate::error::FieldError;
use crate::fields::descriptor::FieldDescriptor;
use crate::fields::text;
use crate::record::Record;
use crate::schema::RecordSchema;

/// How one input column maps onto the schema.
#[derive(Debug, Clone, Copy)]
pub enum ColumnSpec {
    /// Discard the column.
    Skip,
    /// Parse the column with the field's standard textual codec.
    Field(FieldDescriptor),
    /// Parse the column as a fixed-point decimal with `precision` implied
    /// fractional digits into an unsigned field.
    FixedPoint {
        field: FieldDescriptor,
        precision: u32,
    },
}

/// Batch behavior on unparseable lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Skip and count bad lines (the bulk-load default).
    #[default]
    Lenient,
    /// Abort the batch on the first bad line.
    Strict,
}

/// Counters returned by [`LineParser::load_from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub lines_read: u64,
    pub lines_ok: u64,
}

/// A reusable line-to-record parser for one schema and column mapping.
#[derive(Debug)]
pub struct LineParser {
    schema: Arc<RecordSchema>,
    columns: Vec<ColumnSpec>,
    separator: u8,
    policy: ParsePolicy,
}

impl LineParser {
    pub fn new(schema: Arc<RecordSchema>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            schema,
            columns,
            separator: b'\t',
            policy: ParsePolicy::default(),
        }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Parses one line into `out`. The record is zeroed first, so columns
    /// missing from a short line leave their fields at the default value;
    /// surplus columns are ignored.
    pub fn parse_line(&self, line: &[u8], out: &mut Record) -> Result<(), FieldError> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        out.zero();
        for (spec, token) in self
            .columns
            .iter()
            .zip(line.split(|&b| b == self.separator))
        {
            match spec {
                ColumnSpec::Skip => {}
                ColumnSpec::Field(desc) => out.parse_text(*desc, token)?,
                ColumnSpec::FixedPoint { field, precision } => {
                    let v = text::parse_scaled(token, *precision)?;
                    out.set(*field, v)?;
                }
            }
        }
        Ok(())
    }

    /// Reads newline-delimited records from `reader` into `batch`,
    /// applying the configured policy to unparseable lines.
    pub fn load_from<R: BufRead>(&self, reader: R, batch: &mut RecordArray) -> Result<ImportStats> {
        eyre::ensure!(
            std::ptr::eq(self.schema.as_ref(), batch.schema()),
            FieldError::SchemaMismatch
        );

        let mut stats = ImportStats::default();
        let mut rec = self.schema.new_record();

        for line in reader.split(b'\n') {
            let line = line.wrap_err("reading input line")?;
            stats.lines_read += 1;

            match self.parse_line(&line, &mut rec) {
                Ok(()) => {
                    batch.push(&rec)?;
                    stats.lines_ok += 1;
                }
                Err(err) => match self.policy {
                    ParsePolicy::Strict => {
                        return Err(eyre::Report::new(err))
                            .wrap_err(format!("line {}", stats.lines_read));
                    }
                    ParsePolicy::Lenient => {
                        debug!(line = stats.lines_read, %err, "skipping unparseable line");
                    }
                },
            }
        }

        trace!(
            lines_read = stats.lines_read,
            lines_ok = stats.lines_ok,
            "bulk load finished"
        );
        Ok(stats)
    }
}
