//! # Per-Variant Field Operations
//!
//! The uniform operation set every field variant implements, dispatched by
//! exhaustive `match` over [`FieldType`]. All functions operate on a *slot*:
//! the exact field-sized subslice of a record buffer, produced by the record
//! layer after validating the descriptor against the buffer
//! (`slot.len() == ty.width()` is the contract here).
//!
//! ## Operation Set
//!
//! | Operation | Purpose |
//! |-----------|---------|
//! | [`write_default`] | zero value / all-zero bytes |
//! | [`decode`] / [`encode`] | external value exchange |
//! | [`parse_text`] | textual ingestion (the fallible bulk-load path) |
//! | [`load_raw`] / [`store_raw`] | verbatim in-memory field image |
//! | [`write_min`] / [`write_max`] | ordering extrema (swapped for descending variants) |
//! | [`add_assign`] | field aggregation |
//! | [`increment`] | sort-order successor, saturating |
//! | [`compare`] / [`between`] | direction-aware ordering and range membership |
//!
//! Because every operand is a raw slice, the same `compare`/`between`
//! functions serve both instance-to-instance and instance-to-encoded-bound
//! comparisons; no temporary record is ever needed.
//!
//! ## Encoding
//!
//! Numeric slots hold the native in-memory representation (no byte-order
//! transformation). Raw interchange is therefore host-endianness-dependent;
//! the sort-order contract is still met because comparisons decode before
//! comparing rather than relying on memcmp.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::config::TIMESTAMP_PRECISION;
use crate::error::FieldError;
use crate::fields::text;
use crate::fields::types::FieldType;
use crate::types::Value;

fn read_u16(slot: &[u8]) -> u16 {
    let mut b = [0u8; 2];
    b.copy_from_slice(slot);
    u16::from_ne_bytes(b)
}

fn read_u32(slot: &[u8]) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(slot);
    u32::from_ne_bytes(b)
}

fn read_u64(slot: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(slot);
    u64::from_ne_bytes(b)
}

fn read_f64(slot: &[u8]) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(slot);
    f64::from_ne_bytes(b)
}

fn write_f64(slot: &mut [u8], v: f64) {
    slot.copy_from_slice(&v.to_ne_bytes());
}

/// Reads an unsigned slot as a widened `u64`. Only meaningful for the
/// unsigned variants; the public operations never route other types here.
fn read_uint(ty: FieldType, slot: &[u8]) -> u64 {
    match ty {
        FieldType::UInt8 => slot[0] as u64,
        FieldType::UInt16 => read_u16(slot) as u64,
        FieldType::UInt32 => read_u32(slot) as u64,
        FieldType::UInt64 | FieldType::Timestamp | FieldType::TimestampDesc => read_u64(slot),
        FieldType::Double | FieldType::Str(_) | FieldType::HexStr(_) => {
            unreachable!("unsigned read on non-unsigned field")
        }
    }
}

/// Writes a `u64` into an unsigned slot, truncating to the field width
/// (the caller range-checks first where truncation would lose bits).
fn write_uint(ty: FieldType, slot: &mut [u8], v: u64) {
    match ty {
        FieldType::UInt8 => slot[0] = v as u8,
        FieldType::UInt16 => slot.copy_from_slice(&(v as u16).to_ne_bytes()),
        FieldType::UInt32 => slot.copy_from_slice(&(v as u32).to_ne_bytes()),
        FieldType::UInt64 | FieldType::Timestamp | FieldType::TimestampDesc => {
            slot.copy_from_slice(&v.to_ne_bytes())
        }
        FieldType::Double | FieldType::Str(_) | FieldType::HexStr(_) => {
            unreachable!("unsigned write on non-unsigned field")
        }
    }
}

fn store_uint_checked(ty: FieldType, slot: &mut [u8], v: u64) -> Result<(), FieldError> {
    if v > ty.uint_max() {
        return Err(FieldError::OutOfRange {
            value: v,
            width: ty.width(),
        });
    }
    write_uint(ty, slot, v);
    Ok(())
}

/// Writes the variant's default: 0 for numerics, all-zero bytes for
/// strings. Every defined variant's default is zero-valued, so this is a
/// plain fill regardless of type.
pub fn write_default(_ty: FieldType, slot: &mut [u8]) {
    slot.fill(0);
}

/// Decodes a slot into its external representation.
pub fn decode(ty: FieldType, slot: &[u8]) -> Value<'_> {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp
        | FieldType::TimestampDesc => Value::UInt(read_uint(ty, slot)),
        FieldType::Double => Value::Double(read_f64(slot)),
        FieldType::Str(_) => Value::Bytes(Cow::Borrowed(slot)),
        FieldType::HexStr(_) => Value::Text(Cow::Owned(text::encode_hex(slot))),
    }
}

/// Encodes an external value into a slot.
///
/// Numeric variants fail with [`FieldError::OutOfRange`] when the value does
/// not fit the field width and [`FieldError::TypeMismatch`] for non-numeric
/// values. String variants accept text/byte values and treat any other value
/// kind as a successful no-op.
pub fn encode(ty: FieldType, slot: &mut [u8], value: &Value<'_>) -> Result<(), FieldError> {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp
        | FieldType::TimestampDesc => match value {
            Value::UInt(v) => store_uint_checked(ty, slot, *v),
            _ => Err(FieldError::TypeMismatch {
                expected: "unsigned integer",
            }),
        },
        FieldType::Double => match value {
            Value::Double(f) => {
                write_f64(slot, *f);
                Ok(())
            }
            Value::UInt(v) => {
                write_f64(slot, *v as f64);
                Ok(())
            }
            _ => Err(FieldError::TypeMismatch { expected: "double" }),
        },
        FieldType::Str(_) => match value {
            Value::Bytes(b) => text::copy_padded(slot, b),
            Value::Text(s) => text::copy_padded(slot, s.as_bytes()),
            _ => Ok(()),
        },
        FieldType::HexStr(_) => match value {
            Value::Text(s) => text::parse_hex(slot, s.as_bytes()),
            Value::Bytes(b) => text::parse_hex(slot, b),
            _ => Ok(()),
        },
    }
}

/// Parses a textual token into a slot; the contract behind bulk ingestion.
pub fn parse_text(ty: FieldType, slot: &mut [u8], token: &[u8]) -> Result<(), FieldError> {
    match ty {
        FieldType::UInt8 | FieldType::UInt16 | FieldType::UInt32 | FieldType::UInt64 => {
            let v = text::parse_uint(token)?;
            store_uint_checked(ty, slot, v)
        }
        FieldType::Timestamp | FieldType::TimestampDesc => {
            let v = text::parse_scaled(token, TIMESTAMP_PRECISION)?;
            store_uint_checked(ty, slot, v)
        }
        FieldType::Double => {
            write_f64(slot, text::parse_double_lenient(token));
            Ok(())
        }
        FieldType::Str(_) => text::copy_padded(slot, token),
        FieldType::HexStr(_) => text::parse_hex(slot, token),
    }
}

/// Copies exactly `width` raw bytes into the slot.
pub fn load_raw(ty: FieldType, slot: &mut [u8], src: &[u8]) -> Result<(), FieldError> {
    if src.len() != slot.len() {
        return Err(FieldError::WidthMismatch {
            len: src.len(),
            width: ty.width(),
        });
    }
    slot.copy_from_slice(src);
    Ok(())
}

/// Copies exactly `width` raw bytes out of the slot.
pub fn store_raw(ty: FieldType, slot: &[u8], dst: &mut [u8]) -> Result<(), FieldError> {
    if dst.len() != slot.len() {
        return Err(FieldError::WidthMismatch {
            len: dst.len(),
            width: ty.width(),
        });
    }
    dst.copy_from_slice(slot);
    Ok(())
}

/// Writes the variant's sort-order minimum. For descending variants the
/// numeric roles are swapped: their sort-order minimum is the numeric
/// maximum.
pub fn write_min(ty: FieldType, slot: &mut [u8]) {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp => write_uint(ty, slot, 0),
        FieldType::TimestampDesc => write_uint(ty, slot, u64::MAX),
        FieldType::Double => write_f64(slot, f64::MIN),
        FieldType::Str(_) | FieldType::HexStr(_) => slot.fill(0x00),
    }
}

/// Writes the variant's sort-order maximum.
pub fn write_max(ty: FieldType, slot: &mut [u8]) {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp => write_uint(ty, slot, ty.uint_max()),
        FieldType::TimestampDesc => write_uint(ty, slot, 0),
        FieldType::Double => write_f64(slot, f64::MAX),
        FieldType::Str(_) | FieldType::HexStr(_) => slot.fill(0xFF),
    }
}

/// `dst += src`. Unsigned variants wrap at the field width, matching
/// fixed-width arithmetic; doubles use IEEE addition.
///
/// # Panics
///
/// Panics for string variants: aggregation over strings is not a supported
/// operation and must fail fast.
pub fn add_assign(ty: FieldType, dst: &mut [u8], src: &[u8]) {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp
        | FieldType::TimestampDesc => {
            let sum = read_uint(ty, dst).wrapping_add(read_uint(ty, src));
            write_uint(ty, dst, sum);
        }
        FieldType::Double => write_f64(dst, read_f64(dst) + read_f64(src)),
        FieldType::Str(_) | FieldType::HexStr(_) => {
            panic!("aggregation is not supported for string fields")
        }
    }
}

/// Moves the value to its immediate sort-order successor, saturating at the
/// variant's sort-order maximum. Doubles have no discrete successor; the
/// call is a no-op for them.
pub fn increment(ty: FieldType, slot: &mut [u8]) {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp => {
            let v = read_uint(ty, slot);
            if v < ty.uint_max() {
                write_uint(ty, slot, v + 1);
            }
        }
        FieldType::TimestampDesc => {
            let v = read_uint(ty, slot);
            if v > 0 {
                write_uint(ty, slot, v - 1);
            }
        }
        FieldType::Double => {}
        FieldType::Str(_) | FieldType::HexStr(_) => {
            // Big-endian-style increment with carry; all-0xFF saturates.
            if let Some(i) = slot.iter().rposition(|&b| b != 0xFF) {
                slot[i] += 1;
                for b in &mut slot[i + 1..] {
                    *b = 0;
                }
            }
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Three-way comparison under the variant's sort direction. Strings compare
/// as unsigned byte-lexicographic sequences; NaN doubles flatten to
/// `Equal` against everything.
pub fn compare(ty: FieldType, a: &[u8], b: &[u8]) -> Ordering {
    match ty {
        FieldType::UInt8
        | FieldType::UInt16
        | FieldType::UInt32
        | FieldType::UInt64
        | FieldType::Timestamp => read_uint(ty, a).cmp(&read_uint(ty, b)),
        FieldType::TimestampDesc => read_uint(ty, b).cmp(&read_uint(ty, a)),
        FieldType::Double => cmp_f64(read_f64(a), read_f64(b)),
        FieldType::Str(_) | FieldType::HexStr(_) => a.cmp(b),
    }
}

/// Inclusive range membership under the variant's sort direction: `Less`
/// when `v` sorts before `lo`, `Greater` when it sorts after `hi`, `Equal`
/// when `lo <= v <= hi` in sort order.
pub fn between(ty: FieldType, v: &[u8], lo: &[u8], hi: &[u8]) -> Ordering {
    if compare(ty, v, lo) == Ordering::Less {
        return Ordering::Less;
    }
    if compare(ty, v, hi) == Ordering::Greater {
        return Ordering::Greater;
    }
    Ordering::Equal
}
