//! Composite-key ordering semantics across ascending and descending
//! fields: comparison, range membership, sentinel bounds, and
//! successor-based exclusive upper bounds — the operations a sorted store
//! drives through the schema comparators.

use std::cmp::Ordering;
use std::sync::Arc;

use rowpack::{FieldType, KeyBound, Record, RecordSchema, Value};

/// Newest-first event log keyed by (stream, reverse timestamp).
fn feed_schema() -> Arc<RecordSchema> {
    RecordSchema::builder()
        .key("stream", FieldType::UInt32)
        .key("at", FieldType::TimestampDesc)
        .value("payload", FieldType::HexStr(8))
        .build()
}

#[test]
fn descending_key_sorts_newest_first() {
    let schema = feed_schema();
    let stream = schema.field("stream").unwrap();
    let at = schema.field("at").unwrap();

    let mut newer = schema.new_record();
    newer.set(stream, 1u64).unwrap();
    newer.set(at, 2_000u64).unwrap();

    let mut older = schema.new_record();
    older.set(stream, 1u64).unwrap();
    older.set(at, 1_000u64).unwrap();

    assert_eq!(newer.compare_keys(&older), Ordering::Less);

    // The stream field still dominates in declared order.
    let mut other_stream = schema.new_record();
    other_stream.set(stream, 0u64).unwrap();
    other_stream.set(at, 1u64).unwrap();
    assert_eq!(other_stream.compare_keys(&newer), Ordering::Less);
}

#[test]
fn range_over_descending_field_takes_newest_bound_first() {
    let schema = feed_schema();
    let at = schema.field("at").unwrap();

    // "Events in stream 3 between t=500 and t=100, newest first":
    // the low bound of a descending field is the numerically larger time.
    let (lo, hi) = Record::build_range(
        &schema,
        &[
            KeyBound::Exact(Value::UInt(3)),
            KeyBound::Range(Value::UInt(500), Value::UInt(100)),
        ],
    )
    .unwrap();

    let stream = schema.field("stream").unwrap();
    let mut probe = schema.new_record();
    probe.set(stream, 3u64).unwrap();

    for (t, expect) in [
        (501u64, Ordering::Less),
        (500, Ordering::Equal),
        (300, Ordering::Equal),
        (100, Ordering::Equal),
        (99, Ordering::Greater),
    ] {
        probe.set(at, t).unwrap();
        assert_eq!(probe.keys_in_range(&lo, &hi), expect, "t={t}");
    }
}

#[test]
fn unconstrained_descending_field_spans_whole_domain() {
    let schema = feed_schema();
    let (lo, hi) = Record::build_range(
        &schema,
        &[KeyBound::Exact(Value::UInt(3)), KeyBound::Any],
    )
    .unwrap();

    let at = schema.field("at").unwrap();
    // Sort-order min of a descending timestamp is the numeric maximum.
    assert_eq!(lo.get(at).unwrap(), Value::UInt(u64::MAX));
    assert_eq!(hi.get(at).unwrap(), Value::UInt(0));
}

#[test]
fn increment_builds_exclusive_upper_bounds() {
    let schema = RecordSchema::builder()
        .key("bucket", FieldType::Str(4))
        .build();
    let bucket = schema.field("bucket").unwrap();

    // Successor of a string prefix: all keys starting with "abc\0" up to
    // but excluding the next prefix.
    let mut bound = schema.new_record();
    bound.set(bucket, &b"abc"[..]).unwrap();
    let inclusive = bound.duplicate();
    bound.increment_field(bucket).unwrap();

    assert_eq!(bound.compare_keys(&inclusive), Ordering::Greater);
    assert_eq!(
        bound.get(bucket).unwrap(),
        Value::from(&[0x61, 0x62, 0x63, 0x01][..])
    );
}

#[test]
fn schema_comparators_work_on_raw_images() {
    let schema = feed_schema();
    let stream = schema.field("stream").unwrap();
    let at = schema.field("at").unwrap();

    let mut a = schema.new_record();
    a.set(stream, 1u64).unwrap();
    a.set(at, 10u64).unwrap();
    let mut b = schema.new_record();
    b.set(stream, 1u64).unwrap();
    b.set(at, 20u64).unwrap();

    // The engine sees only encoded byte slices.
    assert_eq!(
        schema.compare_keys(b.as_bytes(), a.as_bytes()),
        Ordering::Less
    );
    assert_eq!(
        schema.keys_in_range(a.as_bytes(), b.as_bytes(), a.as_bytes()),
        Ordering::Equal
    );
}

#[test]
fn min_max_sentinels_bracket_every_key() {
    let schema = feed_schema();
    let mut lo = schema.new_record();
    let mut hi = schema.new_record();
    for field in schema.key_fields() {
        lo.set_min(field.descriptor()).unwrap();
        hi.set_max(field.descriptor()).unwrap();
    }

    let mut probe = schema.new_record();
    probe.set(schema.field("stream").unwrap(), 77u64).unwrap();
    probe.set(schema.field("at").unwrap(), 123_456u64).unwrap();

    assert_ne!(probe.compare_keys(&lo), Ordering::Less);
    assert_ne!(probe.compare_keys(&hi), Ordering::Greater);
    assert_eq!(probe.keys_in_range(&lo, &hi), Ordering::Equal);
}
