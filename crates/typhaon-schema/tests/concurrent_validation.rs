//! Integration test: one compiled schema shared across threads.
//!
//! Each evaluation carries its own diagnostics, so concurrent callers must
//! see exactly what a sequential caller sees for the same record.

use std::sync::Arc;
use std::thread;

use serde_json::json;
use typhaon_schema::{Record, Schema};

fn schema() -> Schema {
    Schema::compile(&json!({
        "fields": [
            {"name": "id", "type": "string", "format": "[a-z]+-[0-9]+"},
            {"name": "size", "type": "numeric", "min": 1, "max": 10},
            {"name": "flag", "type": ["boolean", "null"]}
        ]
    }))
    .unwrap()
}

fn record(i: usize) -> Record {
    // Every third record has an out-of-range size, every fifth a bad id.
    let id = if i % 5 == 0 { format!("ID{i}") } else { format!("rec-{i}") };
    let size = if i % 3 == 0 { 50 } else { (i % 10 + 1) as i64 };
    Record::new().with("id", id).with("size", size).with("flag", "yes")
}

#[test]
fn test_shared_schema_matches_sequential_results() {
    let schema = Arc::new(schema());
    let expected: Vec<_> = (0..200).map(|i| schema.validate(&record(i))).collect();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                (0..200)
                    .filter(|i| i % 4 == t)
                    .map(|i| (i, schema.validate(&record(i))))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = 0;
    for handle in handles {
        for (i, verdict) in handle.join().unwrap() {
            assert_eq!(verdict, expected[i], "record {i} diverged");
            seen += 1;
        }
    }
    assert_eq!(seen, 200);
}

#[test]
fn test_scoped_threads_borrow_schema() {
    let schema = schema();
    let failures: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let schema = &schema;
                s.spawn(move || {
                    (t * 25..(t + 1) * 25)
                        .filter(|i| !schema.is_valid(&record(*i)))
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });
    let sequential = (0..100).filter(|i| !schema.is_valid(&record(*i))).count();
    assert_eq!(failures, sequential);
    assert!(failures > 0);
}
