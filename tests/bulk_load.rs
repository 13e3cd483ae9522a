//! End-to-end bulk-load scenario: delimited text on disk, parsed into a
//! batch, sorted by key, and aggregated across records sharing a key.

use std::io::{BufReader, Seek, Write};
use std::sync::Arc;

use rowpack::{
    ColumnSpec, FieldType, LineParser, ParsePolicy, Record, RecordArray, RecordSchema, Value,
};

fn event_schema() -> Arc<RecordSchema> {
    RecordSchema::builder()
        .key("campaign", FieldType::UInt32)
        .key("at", FieldType::Timestamp)
        .value("clicks", FieldType::UInt32)
        .value("revenue", FieldType::Double)
        .build()
}

fn event_parser(schema: &Arc<RecordSchema>) -> LineParser {
    LineParser::new(
        Arc::clone(schema),
        vec![
            ColumnSpec::Field(schema.field("campaign").unwrap()),
            ColumnSpec::Field(schema.field("at").unwrap()),
            ColumnSpec::Field(schema.field("clicks").unwrap()),
            ColumnSpec::Field(schema.field("revenue").unwrap()),
        ],
    )
}

#[test]
fn load_from_file_sort_and_aggregate() {
    let schema = event_schema();
    let parser = event_parser(&schema);

    let mut file = tempfile::tempfile().unwrap();
    // Deliberately out of key order, with one unparseable line.
    write!(
        file,
        "7\t1700000000.250\t3\t0.30\n\
         2\t1700000000.125\t1\t0.10\n\
         seven\t1700000000.0\t1\t0.00\n\
         7\t1700000000.125\t2\t0.20\n"
    )
    .unwrap();
    file.rewind().unwrap();

    let mut batch = RecordArray::new(Arc::clone(&schema), 16, true);
    let stats = parser
        .load_from(BufReader::new(file), &mut batch)
        .unwrap();
    assert_eq!(stats.lines_read, 4);
    assert_eq!(stats.lines_ok, 3);
    assert_eq!(batch.len(), 3);

    batch.sort_by_key();
    let campaign = schema.field("campaign").unwrap();
    let at = schema.field("at").unwrap();

    let mut rec = schema.new_record();
    let keys: Vec<(u64, u64)> = (0..batch.len())
        .map(|i| {
            batch.copy_into(i, &mut rec).unwrap();
            (
                rec.get(campaign).unwrap().as_uint().unwrap(),
                rec.get(at).unwrap().as_uint().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (2, 1_700_000_000_125),
            (7, 1_700_000_000_125),
            (7, 1_700_000_000_250),
        ]
    );

    // Aggregate the two campaign-7 records into a running total.
    let clicks = schema.field("clicks").unwrap();
    let revenue = schema.field("revenue").unwrap();

    let mut total = schema.new_record();
    batch.copy_into(1, &mut total).unwrap();
    batch.copy_into(2, &mut rec).unwrap();

    // Value fields accumulate; callers guarantee key equality beforehand.
    let mut addend = rec.duplicate();
    addend.set(campaign, 0u64).unwrap();
    addend.set(at, 0u64).unwrap();
    total.sum_from(&addend).unwrap();

    assert_eq!(total.get(clicks).unwrap(), Value::UInt(5));
    assert_eq!(total.get(revenue).unwrap(), Value::Double(0.5));
    assert_eq!(total.get(campaign).unwrap(), Value::UInt(7));
}

#[test]
fn strict_policy_reports_the_failing_line() {
    let schema = event_schema();
    let parser = event_parser(&schema).with_policy(ParsePolicy::Strict);
    let mut batch = RecordArray::new(Arc::clone(&schema), 4, true);

    let input: &[u8] = b"1\t100\t1\t0.1\n1\tnot-a-time\t1\t0.1\n";
    let err = parser.load_from(input, &mut batch).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err:?}");
}

#[test]
fn batches_round_trip_through_raw_images() {
    let schema = event_schema();
    let parser = event_parser(&schema);
    let mut batch = RecordArray::new(Arc::clone(&schema), 4, false);

    let input: &[u8] = b"5\t1700000001.000\t10\t1.5\n";
    parser.load_from(input, &mut batch).unwrap();

    // An engine hands back the raw image; reloading it reproduces the record.
    let image = batch.record_bytes(0).unwrap().to_vec();
    let mut rec: Record = schema.new_record();
    rec.load_bytes(&image).unwrap();
    assert_eq!(
        rec.get(schema.field("at").unwrap()).unwrap(),
        Value::UInt(1_700_000_001_000)
    );
    assert_eq!(
        rec.get(schema.field("clicks").unwrap()).unwrap(),
        Value::UInt(10)
    );
}
